//! Typed values exchanged with the database.
//!
//! [`DbValue`] is the single value model used both for statement parameters
//! (after input coercion) and for records returned by an
//! [`Executor`](crate::execution::Executor).

mod coercion_error;
mod db_value;
mod duration;
mod input_coercion;
mod output_coercion;
mod point;
mod temporal;

pub use coercion_error::CoercionError;
pub use db_value::DbValue;
pub use db_value::TimeWithOffset;
pub use duration::CypherDuration;
pub use input_coercion::coerce_input;
pub use input_coercion::coerce_scalar_input;
pub use output_coercion::serialize_output;
pub use point::Point;
pub use point::PointKind;

#[cfg(test)]
mod tests;
