use crate::execution::ExecutorError;
use crate::execution::GraphQLError;
use crate::operation::OperationError;
use crate::shaper::PathSegment;
use crate::translate::TranslateError;
use regex::Regex;
use std::sync::LazyLock;

/// The message raised by a failed required-relationship check inside the
/// database, e.g. `Movie.director required exactly once`.
static REQUIRED_RELATIONSHIP: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\w+\.\w+ required exactly once)").ok());

pub(crate) fn operation_error(error: &OperationError) -> GraphQLError {
    let code = match error {
        OperationError::ParseError(_) => "GRAPHQL_PARSE_FAILED",
        _ => "GRAPHQL_VALIDATION_FAILED",
    };
    GraphQLError::new(error.to_string()).with_code(code)
}

pub(crate) fn translate_error(error: &TranslateError, path: &str) -> GraphQLError {
    let code = match error {
        TranslateError::Forbidden => "FORBIDDEN",
        TranslateError::Unauthenticated => "UNAUTHENTICATED",
        TranslateError::Internal { .. } => "INTERNAL_SERVER_ERROR",
        _ => "BAD_USER_INPUT",
    };
    GraphQLError::new(error.to_string())
        .with_path(vec![PathSegment::from(path)])
        .with_code(code)
}

/// Failed `apoc.util.validate` calls surface as wrapped procedure errors;
/// clients only see the validation message.
pub(crate) fn executor_error(error: &ExecutorError, path: &str) -> GraphQLError {
    let message = error.to_string();
    let error = if message.contains("Forbidden") {
        GraphQLError::new("Forbidden").with_code("FORBIDDEN")
    } else if let Some(captured) = REQUIRED_RELATIONSHIP.as_ref()
        .and_then(|regex| regex.captures(&message))
        .and_then(|captures| captures.get(1))
    {
        GraphQLError::new(captured.as_str()).with_code("BAD_USER_INPUT")
    } else {
        GraphQLError::new(message).with_code("INTERNAL_SERVER_ERROR")
    };
    error.with_path(vec![PathSegment::from(path)])
}
