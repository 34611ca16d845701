use crate::authorization::AuthorizationAnnotation;
use crate::loc;
use crate::schema::EntityRef;

/// Direction of a relationship as seen from the entity that declares it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}
impl Direction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "IN" => Some(Self::In),
            "OUT" => Some(Self::Out),
            _ => None,
        }
    }

    /// Renders `(<from>)-[<rel>]->(<to>)` or the incoming equivalent.
    pub fn pattern(&self, from: &str, rel: &str, to: &str) -> String {
        match self {
            Self::In => format!("({from})<-[{rel}]-({to})"),
            Self::Out => format!("({from})-[{rel}]->({to})"),
        }
    }
}

/// A field annotated with `@relationship`.
#[derive(Clone, Debug, PartialEq)]
pub struct Relationship {
    pub(crate) aggregate: bool,
    pub(crate) authorization: Option<AuthorizationAnnotation>,
    pub(crate) def_location: loc::FilePosition,
    pub(crate) direction: Direction,
    pub(crate) field_name: String,
    pub(crate) list: bool,
    pub(crate) nullable: bool,
    pub(crate) properties: Option<String>,
    pub(crate) rel_type: String,
    pub(crate) source: String,
    pub(crate) target: EntityRef,
}
impl Relationship {
    /// Whether `<field>Aggregate` is generated.
    pub fn aggregate(&self) -> bool {
        self.aggregate && self.target.is_concrete()
    }

    pub fn authorization(&self) -> Option<&AuthorizationAnnotation> {
        self.authorization.as_ref()
    }

    pub fn def_location(&self) -> &loc::FilePosition {
        &self.def_location
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn field_name(&self) -> &str {
        self.field_name.as_str()
    }

    pub fn is_list(&self) -> bool {
        self.list
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// A singleton, non-null relationship must be satisfied exactly once when
    /// its source node is created.
    pub fn is_required(&self) -> bool {
        !self.list && !self.nullable
    }

    /// Name of the `@relationshipProperties` type carried by the edge.
    pub fn properties(&self) -> Option<&str> {
        self.properties.as_deref()
    }

    pub fn rel_type(&self) -> &str {
        self.rel_type.as_str()
    }

    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    pub fn target(&self) -> &EntityRef {
        &self.target
    }
}

/// An interface field annotated with `@declareRelationship`; each
/// implementing type provides the concrete `@relationship`.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclaredRelationship {
    pub(crate) field_name: String,
    pub(crate) list: bool,
    pub(crate) nullable: bool,
    pub(crate) target: EntityRef,
}
impl DeclaredRelationship {
    pub fn field_name(&self) -> &str {
        self.field_name.as_str()
    }

    pub fn is_list(&self) -> bool {
        self.list
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn target(&self) -> &EntityRef {
        &self.target
    }
}
