use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// One selected field with its arguments resolved to JSON (variables
/// substituted) and its sub-selections grouped by the type they apply to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldSelection {
    pub(crate) alias: Option<String>,
    pub(crate) arguments: IndexMap<String, JsonValue>,
    /// Keyed by the parent type the fields were selected on: the field's own
    /// type for plain selections, a member type for `... on Member`.
    pub(crate) fields_by_type: IndexMap<String, Vec<FieldSelection>>,
    pub(crate) name: String,
}
impl FieldSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    pub fn with_fields(mut self, type_name: impl Into<String>, fields: Vec<FieldSelection>) -> Self {
        self.fields_by_type.entry(type_name.into()).or_default().extend(fields);
        self
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn argument(&self, name: &str) -> Option<&JsonValue> {
        self.arguments.get(name).filter(|value| !value.is_null())
    }

    pub fn arguments(&self) -> &IndexMap<String, JsonValue> {
        &self.arguments
    }

    pub fn fields_by_type(&self) -> &IndexMap<String, Vec<FieldSelection>> {
        &self.fields_by_type
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The alias if one was given, otherwise the field name.
    pub fn response_key(&self) -> &str {
        self.alias().unwrap_or(self.name.as_str())
    }

    /// Sub-selections that apply to a value of the concrete type
    /// `type_name`. `applies` tells whether fields selected on a given type
    /// condition apply to it.
    pub fn fields_for<F>(&self, type_name: &str, applies: F) -> Vec<&FieldSelection>
    where
        F: Fn(&str, &str) -> bool,
    {
        self.fields_by_type.iter()
            .filter(|(condition, _)| applies(condition, type_name))
            .flat_map(|(_, fields)| fields.iter())
            .collect()
    }

    /// Every sub-selection regardless of type condition, in order.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldSelection> {
        self.fields_by_type.values().flat_map(|fields| fields.iter())
    }

    /// The first sub-selection named `name` on any type condition.
    pub fn child(&self, name: &str) -> Option<&FieldSelection> {
        self.all_fields().find(|field| field.name == name)
    }

    pub fn children<'s>(&'s self, name: &str) -> impl Iterator<Item = &'s FieldSelection> {
        self.all_fields().filter(move |field| field.name == name)
    }
}
