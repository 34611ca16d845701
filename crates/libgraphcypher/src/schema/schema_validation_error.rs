use crate::loc;
use thiserror::Error;

/// A problem with the type definitions found while building the
/// [`SchemaModel`](crate::schema::SchemaModel).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaValidationError {
    #[error(
        "{type_name}.{field_name}: Directive \"@populatedBy\" cannot be used in \
        combination with \"@{other_directive}\""
    )]
    PopulatedByConflict {
        field_name: String,
        loc: loc::FilePosition,
        other_directive: String,
        type_name: String,
    },

    #[error("PopulatedBy callback '{callback}' must be of type function")]
    UnknownCallback {
        callback: String,
        loc: loc::FilePosition,
    },

    #[error(
        "Invalid @{directive} directive on `{location}`: {detail}"
    )]
    InvalidDirective {
        detail: String,
        directive: String,
        loc: loc::FilePosition,
        location: String,
    },

    #[error(
        "Relationship field `{type_name}.{field_name}` must target a node, \
        union or interface type, but `{target}` is not one"
    )]
    InvalidRelationshipTarget {
        field_name: String,
        loc: loc::FilePosition,
        target: String,
        type_name: String,
    },

    #[error(
        "The properties type `{properties}` of relationship \
        `{type_name}.{field_name}` must be an object type annotated with \
        @relationshipProperties"
    )]
    InvalidRelationshipProperties {
        field_name: String,
        loc: loc::FilePosition,
        properties: String,
        type_name: String,
    },

    #[error(
        "Field `{type_name}.{field_name}` references the type `{target}` \
        without a @relationship directive"
    )]
    MissingRelationshipDirective {
        field_name: String,
        loc: loc::FilePosition,
        target: String,
        type_name: String,
    },

    #[error(
        "Directive \"@{directive}\" cannot be used in combination with \
        \"@{other_directive}\" on `{type_name}.{field_name}`"
    )]
    DirectiveConflict {
        directive: String,
        field_name: String,
        loc: loc::FilePosition,
        other_directive: String,
        type_name: String,
    },

    #[error(
        "Type `{implementer}` implements interface `{interface_name}` but does \
        not define the {kind} field `{field_name}`"
    )]
    MissingInterfaceField {
        field_name: String,
        implementer: String,
        interface_name: String,
        kind: &'static str,
        loc: loc::FilePosition,
    },

    #[error(
        "Only one type may be annotated with @jwt, found `{first}` and `{second}`"
    )]
    MultipleJwtTypes {
        first: String,
        loc: loc::FilePosition,
        second: String,
    },

    #[error("Invalid @authorization on `{location}`: {detail}")]
    InvalidAuthorization {
        detail: String,
        loc: loc::FilePosition,
        location: String,
    },

    #[error(
        "Field `{type_name}.{field_name}` has type `{undefined_type}`, which is \
        not defined"
    )]
    UndefinedFieldType {
        field_name: String,
        loc: loc::FilePosition,
        type_name: String,
        undefined_type: String,
    },

    #[error("Field `{type_name}.{field_name}` has an unsupported type: {detail}")]
    UnsupportedFieldType {
        detail: String,
        field_name: String,
        loc: loc::FilePosition,
        type_name: String,
    },

    #[error("Union `{union_name}` has member `{member}`, which is not a node type")]
    InvalidUnionMember {
        loc: loc::FilePosition,
        member: String,
        union_name: String,
    },

    #[error(
        "Type `{type_name}` is generated from the type definitions and cannot \
        be defined manually"
    )]
    ReservedTypeName {
        loc: loc::FilePosition,
        type_name: String,
    },

    #[error("{kind} definitions are not supported (`{name}`)")]
    UnsupportedDefinition {
        kind: &'static str,
        loc: loc::FilePosition,
        name: String,
    },

    #[error("Cannot extend `{type_name}`: no object type with that name is defined")]
    UndefinedExtensionTarget {
        loc: loc::FilePosition,
        type_name: String,
    },
}
