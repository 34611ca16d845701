use crate::authorization::AuthenticationAnnotation;
use crate::authorization::AuthorizationAnnotation;
use crate::cypher::escape_label;
use crate::loc;
use crate::schema::Attribute;
use crate::schema::LimitAnnotation;
use crate::schema::Relationship;
use indexmap::IndexMap;

/// An object type stored as nodes in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ConcreteEntity {
    pub(crate) attributes: IndexMap<String, Attribute>,
    pub(crate) authentication: Option<AuthenticationAnnotation>,
    pub(crate) authorization: Option<AuthorizationAnnotation>,
    pub(crate) def_location: loc::FilePosition,
    pub(crate) interfaces: Vec<String>,
    pub(crate) labels: Vec<String>,
    pub(crate) limit: Option<LimitAnnotation>,
    pub(crate) name: String,
    pub(crate) plural: String,
    pub(crate) relationships: IndexMap<String, Relationship>,
}
impl ConcreteEntity {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    pub fn authentication(&self) -> Option<&AuthenticationAnnotation> {
        self.authentication.as_ref()
    }

    pub fn authorization(&self) -> Option<&AuthorizationAnnotation> {
        self.authorization.as_ref()
    }

    pub fn def_location(&self) -> &loc::FilePosition {
        &self.def_location
    }

    pub fn implements(&self, interface_name: &str) -> bool {
        self.interfaces.iter().any(|name| name == interface_name)
    }

    pub fn interfaces(&self) -> &[String] {
        self.interfaces.as_slice()
    }

    pub fn labels(&self) -> &[String] {
        self.labels.as_slice()
    }

    /// `:Label1:Label2`, ready to follow a node variable in a pattern.
    pub fn label_string(&self) -> String {
        self.labels.iter()
            .map(|label| format!(":{}", escape_label(label)))
            .collect()
    }

    pub fn limit(&self) -> Option<&LimitAnnotation> {
        self.limit.as_ref()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn plural(&self) -> &str {
        self.plural.as_str()
    }

    pub fn primary_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or(self.name.as_str())
    }

    pub fn relationship(&self, field_name: &str) -> Option<&Relationship> {
        self.relationships.get(field_name)
    }

    pub fn relationships(&self) -> &IndexMap<String, Relationship> {
        &self.relationships
    }

    pub fn unique_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values().filter(|attr| attr.is_unique())
    }
}
