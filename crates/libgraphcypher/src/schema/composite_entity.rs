use crate::loc;
use crate::schema::Attribute;
use crate::schema::DeclaredRelationship;
use crate::schema::LimitAnnotation;
use indexmap::IndexMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeKind {
    Interface,
    Union,
}

/// A union or interface over concrete entities. Reads against it fan out
/// into one branch per member.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeEntity {
    pub(crate) attributes: IndexMap<String, Attribute>,
    pub(crate) declared_relationships: IndexMap<String, DeclaredRelationship>,
    pub(crate) def_location: loc::FilePosition,
    pub(crate) kind: CompositeKind,
    pub(crate) limit: Option<LimitAnnotation>,
    pub(crate) members: Vec<String>,
    pub(crate) name: String,
    pub(crate) plural: String,
}
impl CompositeEntity {
    /// Fields shared by all implementers; always empty for unions.
    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn declared_relationship(&self, field_name: &str) -> Option<&DeclaredRelationship> {
        self.declared_relationships.get(field_name)
    }

    pub fn declared_relationships(&self) -> &IndexMap<String, DeclaredRelationship> {
        &self.declared_relationships
    }

    pub fn def_location(&self) -> &loc::FilePosition {
        &self.def_location
    }

    pub fn is_interface(&self) -> bool {
        self.kind == CompositeKind::Interface
    }

    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    pub fn limit(&self) -> Option<&LimitAnnotation> {
        self.limit.as_ref()
    }

    /// Names of the concrete member entities, in declaration order.
    pub fn members(&self) -> &[String] {
        self.members.as_slice()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn plural(&self) -> &str {
        self.plural.as_str()
    }
}
