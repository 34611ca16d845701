//! Maps records returned for a statement back into the GraphQL response
//! shape: scalar serialization, union/interface discrimination, cursors,
//! mutation `info` and null propagation.

mod exact_average;
mod field_error;
mod result_shaper;

pub use exact_average::exact_average;
pub use field_error::FieldError;
pub use field_error::PathSegment;
pub use result_shaper::ResultShaper;
pub use result_shaper::ShapedField;

#[cfg(test)]
mod tests;
