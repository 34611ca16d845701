use thiserror::Error;

/// Raised while resolving an executable document against the generated
/// surface.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OperationError {
    #[error("Syntax Error: {0}")]
    ParseError(String),

    #[error("Unknown operation named \"{0}\".")]
    UnknownOperation(String),

    #[error("Must provide operation name if query contains multiple operations.")]
    AmbiguousOperation,

    #[error("Must provide an operation.")]
    NoOperation,

    #[error("Schema is not configured to execute {0} operation.")]
    UnsupportedOperationKind(String),

    #[error("Cannot query field \"{field_name}\" on type \"{type_name}\".")]
    UnknownField {
        field_name: String,
        type_name: String,
    },

    #[error("Unknown argument \"{argument}\" on field \"{type_name}.{field_name}\".")]
    UnknownArgument {
        argument: String,
        field_name: String,
        type_name: String,
    },

    #[error("Field \"{type_name}.{field_name}\" argument \"{argument}\" of type \"{argument_type}\" is required, but it was not provided.")]
    MissingArgument {
        argument: String,
        argument_type: String,
        field_name: String,
        type_name: String,
    },

    #[error("Unknown fragment \"{0}\".")]
    UnknownFragment(String),

    #[error("Unknown type \"{0}\".")]
    UnknownType(String),

    #[error("Fragment cannot be spread here as objects of type \"{parent_type}\" can never be of type \"{condition}\".")]
    ImpossibleFragment {
        condition: String,
        parent_type: String,
    },

    #[error("Cannot spread fragment \"{0}\" within itself.")]
    FragmentCycle(String),

    #[error("Field \"{field_name}\" of type \"{field_type}\" must have a selection of subfields.")]
    MissingSelection {
        field_name: String,
        field_type: String,
    },

    #[error("Field \"{field_name}\" must not have a selection since type \"{field_type}\" has no subfields.")]
    UnexpectedSelection {
        field_name: String,
        field_type: String,
    },

    #[error("Fields \"{response_key}\" conflict because they select different fields or arguments.")]
    ConflictingFields {
        response_key: String,
    },

    #[error("Variable \"${name}\" is not defined.")]
    UndefinedVariable {
        name: String,
    },

    #[error("Variable \"${name}\" of required type \"{var_type}\" was not provided.")]
    MissingVariable {
        name: String,
        var_type: String,
    },

    #[error("Variable \"${name}\" of non-null type \"{var_type}\" must not be null.")]
    NullVariable {
        name: String,
        var_type: String,
    },

    #[error("Subscription operations must select exactly one top level field.")]
    SubscriptionFieldCount,
}
