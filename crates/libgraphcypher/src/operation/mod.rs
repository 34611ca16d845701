//! Resolution of executable GraphQL documents against the generated surface.

mod field_selection;
mod operation_error;
mod operation_kind;
mod operation_resolver;
mod resolved_operation;

pub use field_selection::FieldSelection;
pub use operation_error::OperationError;
pub use operation_kind::OperationKind;
pub use operation_resolver::OperationResolver;
pub use resolved_operation::ResolvedOperation;

#[cfg(test)]
mod tests;
