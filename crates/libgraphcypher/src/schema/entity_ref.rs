/// A reference to something a relationship can point at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Concrete(String),
    Interface(String),
    Union(String),
}
impl EntityRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Concrete(name) | Self::Interface(name) | Self::Union(name) => name.as_str(),
        }
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Concrete(_))
    }
}
