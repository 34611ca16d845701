//! Turns generated GraphQL inputs into predicate trees, read options and
//! mutation write plans.

pub(crate) mod cursor;
pub(crate) mod memory_filter;
pub(crate) mod mutation_input;
pub(crate) mod operator;
mod options;
mod predicate;
mod translate_error;
pub(crate) mod where_translator;

pub use cursor::cursor_to_offset;
pub use cursor::offset_to_cursor;
pub use mutation_input::CreateNode;
pub use mutation_input::NestedWrite;
pub use mutation_input::NodeTarget;
pub use mutation_input::PropertyWrite;
pub use mutation_input::RelationshipWrite;
pub use mutation_input::UpdateNode;
pub use mutation_input::WriteOp;
pub use mutation_input::WriteValue;
pub use operator::AggregateFn;
pub use operator::CompareOp;
pub use operator::FilterOperator;
pub use operator::Quantifier;
pub(crate) use options::LimitPolicy;
pub use options::ReadOptions;
pub use options::SortField;
pub(crate) use options::connection_window;
pub(crate) use options::read_options;
pub(crate) use options::sort_fields;
pub use predicate::AggregateCondition;
pub use predicate::AggregatePredicate;
pub use predicate::Comparison;
pub use predicate::CypherComparison;
pub use predicate::Predicate;
pub use predicate::RelationshipPattern;
pub use predicate::RelationshipPredicate;
pub use predicate::Scope;
pub use translate_error::TranslateError;

#[cfg(test)]
mod tests;
