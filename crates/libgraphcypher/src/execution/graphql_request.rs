use serde::Deserialize;
use serde::Serialize;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

/// A GraphQL request as posted by clients.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub operation_name: Option<String>,
    pub query: String,
    pub variables: JsonMap<String, JsonValue>,
}
impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    /// Replaces the variables with the entries of `variables`; anything but
    /// a JSON object clears them.
    pub fn with_variables(mut self, variables: JsonValue) -> Self {
        self.variables = match variables {
            JsonValue::Object(entries) => entries,
            _ => JsonMap::new(),
        };
        self
    }
}
