use crate::shaper::FieldError;
use crate::shaper::PathSegment;
use serde::Serialize;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

/// An entry of a response's `errors`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    pub extensions: JsonMap<String, JsonValue>,
}
impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: JsonMap::new(),
        }
    }

    /// Sets `extensions.code`.
    pub fn with_code(mut self, code: &str) -> Self {
        self.extensions.insert("code".to_string(), JsonValue::String(code.to_string()));
        self
    }

    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = Some(path);
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code").and_then(JsonValue::as_str)
    }
}
impl From<FieldError> for GraphQLError {
    fn from(error: FieldError) -> Self {
        Self::new(error.message).with_path(error.path)
    }
}
