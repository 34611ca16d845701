use crate::execution::GraphQLError;
use futures::Stream;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::pin::Pin;

/// Responses of a subscription, one per delivered event.
pub type GraphQLResponseStream = Pin<Box<dyn Stream<Item = GraphQLResponse> + Send>>;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphQLResponse {
    /// Absent when the request failed before execution; `Some(Null)` when
    /// a non-null root field failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}
impl GraphQLResponse {
    /// A response for a request that failed before execution.
    pub fn error(error: GraphQLError) -> Self {
        Self {
            data: None,
            errors: vec![error],
        }
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|error| error.message.as_str()).collect()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
