use crate::authorization::AuthorizationAnnotation;
use crate::loc;
use crate::schema::AttributeType;
use crate::schema::CypherAnnotation;
use crate::schema::PopulatedBy;
use crate::schema::WriteOperation;
use serde_json::Value as JsonValue;

/// A scalar-valued field of a node, relationship-properties type or
/// interface.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub(crate) attr_type: AttributeType,
    pub(crate) authorization: Option<AuthorizationAnnotation>,
    pub(crate) cypher: Option<CypherAnnotation>,
    pub(crate) db_name: String,
    pub(crate) def_location: loc::FilePosition,
    pub(crate) default: Option<JsonValue>,
    pub(crate) id_autogenerate: Option<bool>,
    pub(crate) name: String,
    pub(crate) populated_by: Option<PopulatedBy>,
    pub(crate) timestamp: Vec<WriteOperation>,
    pub(crate) unique: Option<Option<String>>,
}
impl Attribute {
    pub fn attr_type(&self) -> &AttributeType {
        &self.attr_type
    }

    pub fn authorization(&self) -> Option<&AuthorizationAnnotation> {
        self.authorization.as_ref()
    }

    pub fn cypher(&self) -> Option<&CypherAnnotation> {
        self.cypher.as_ref()
    }

    /// The database property name (`@alias(property: ...)`, otherwise the
    /// field name).
    pub fn db_name(&self) -> &str {
        self.db_name.as_str()
    }

    pub fn def_location(&self) -> &loc::FilePosition {
        &self.def_location
    }

    pub fn default_value(&self) -> Option<&JsonValue> {
        self.default.as_ref()
    }

    pub fn is_id(&self) -> bool {
        self.id_autogenerate.is_some()
    }

    pub fn is_autogenerated(&self) -> bool {
        self.id_autogenerate == Some(true)
    }

    /// Both `@unique` and `@id` fields are backed by a uniqueness constraint.
    pub fn is_unique(&self) -> bool {
        self.unique.is_some() || self.is_id()
    }

    pub fn is_computed(&self) -> bool {
        self.cypher.is_some()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn populated_by(&self) -> Option<&PopulatedBy> {
        self.populated_by.as_ref()
    }

    pub fn timestamp_operations(&self) -> &[WriteOperation] {
        self.timestamp.as_slice()
    }

    pub fn unique_constraint_name(&self) -> Option<&str> {
        self.unique.as_ref().and_then(|name| name.as_deref())
    }

    /// Whether clients may set this attribute in create/update inputs.
    /// Computed, generated, timestamped and callback-populated values are
    /// written by the engine only.
    pub fn is_client_writable(&self) -> bool {
        self.cypher.is_none()
            && !self.is_autogenerated()
            && self.populated_by.is_none()
            && self.timestamp.is_empty()
    }
}
