/// An operation an authorization rule can be scoped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthorizationOperation {
    Aggregate,
    Create,
    CreateRelationship,
    Delete,
    DeleteRelationship,
    Read,
    Subscribe,
    Update,
}
impl AuthorizationOperation {
    pub const ALL: [AuthorizationOperation; 8] = [
        Self::Read,
        Self::Aggregate,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::CreateRelationship,
        Self::DeleteRelationship,
        Self::Subscribe,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aggregate => "AGGREGATE",
            Self::Create => "CREATE",
            Self::CreateRelationship => "CREATE_RELATIONSHIP",
            Self::Delete => "DELETE",
            Self::DeleteRelationship => "DELETE_RELATIONSHIP",
            Self::Read => "READ",
            Self::Subscribe => "SUBSCRIBE",
            Self::Update => "UPDATE",
        }
    }

    /// Operations that write to the database and therefore distinguish
    /// `BEFORE` from `AFTER` validation.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::Create | Self::CreateRelationship | Self::DeleteRelationship | Self::Update,
        )
    }
}
impl std::fmt::Display for AuthorizationOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
