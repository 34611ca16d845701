use crate::value::CoercionError;
use thiserror::Error;

/// Raised while turning a resolved operation into Cypher.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TranslateError {
    #[error("{0}")]
    Coercion(#[from] CoercionError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },

    #[error("Argument \"{argument}\" has invalid value {value}: {detail}")]
    InvalidArgument {
        argument: String,
        detail: String,
        value: String,
    },

    #[error("Invalid cursor: {cursor}")]
    InvalidCursor {
        cursor: String,
    },

    #[error("Expected value of type \"{type_name}\", found {value}.")]
    InvalidInputShape {
        type_name: String,
        value: String,
    },

    #[error("Field \"{type_name}.{field_name}\" of required type \"{field_type}\" was not provided.")]
    MissingRequiredField {
        field_name: String,
        field_type: String,
        type_name: String,
    },

    #[error("{type_name}.{field_name} required exactly once")]
    RequiredRelationship {
        field_name: String,
        type_name: String,
    },

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Field \"{field_name}\" is not defined by type \"{type_name}\".")]
    UnknownField {
        field_name: String,
        type_name: String,
    },

    #[error("Cannot translate root field \"{field_name}\": {detail}")]
    UnsupportedRootField {
        detail: String,
        field_name: String,
    },

    #[error("Exactly one of {expected} must be provided for \"{type_name}\".")]
    AmbiguousInput {
        expected: String,
        type_name: String,
    },
}
impl TranslateError {
    pub(crate) fn unknown_field(field_name: &str, type_name: impl Into<String>) -> Self {
        Self::UnknownField {
            field_name: field_name.to_string(),
            type_name: type_name.into(),
        }
    }

    pub(crate) fn shape(type_name: impl Into<String>, value: &serde_json::Value) -> Self {
        Self::InvalidInputShape {
            type_name: type_name.into(),
            value: value.to_string(),
        }
    }
}
