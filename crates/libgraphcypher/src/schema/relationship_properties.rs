use crate::loc;
use crate::schema::Attribute;
use indexmap::IndexMap;

/// A `@relationshipProperties` type: the property bag stored on edges.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipProperties {
    pub(crate) attributes: IndexMap<String, Attribute>,
    pub(crate) def_location: loc::FilePosition,
    pub(crate) name: String,
}
impl RelationshipProperties {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    pub fn def_location(&self) -> &loc::FilePosition {
        &self.def_location
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
