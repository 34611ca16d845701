use thiserror::Error;

/// Raised when a value cannot be represented by the GraphQL scalar it is
/// declared as, either on the way in (arguments, callback results) or on the
/// way out (records).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CoercionError {
    #[error("{scalar} cannot represent {description} value: {value}")]
    CannotRepresent {
        scalar: String,
        description: &'static str,
        value: String,
    },

    #[error("Value {value} does not exist in \"{enum_name}\" enum.")]
    UnknownEnumValue {
        enum_name: String,
        value: String,
    },

    #[error("Expected a list for a list-typed {scalar} value but got: {value}")]
    ExpectedList {
        scalar: String,
        value: String,
    },

    #[error("Expected non-nullable type \"{scalar}\" not to be null.")]
    UnexpectedNull {
        scalar: String,
    },
}
impl CoercionError {
    pub(crate) fn cannot_represent(
        scalar: impl Into<String>,
        description: &'static str,
        value: &serde_json::Value,
    ) -> Self {
        Self::CannotRepresent {
            scalar: scalar.into(),
            description,
            value: value.to_string(),
        }
    }
}
