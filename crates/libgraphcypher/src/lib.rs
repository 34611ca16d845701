//! Compiles GraphQL type definitions annotated with graph directives
//! (`@relationship`, `@cypher`, `@authorization`, `@populatedBy`, ...) into
//! an immutable schema model plus a generated GraphQL surface, and serves
//! GraphQL operations against it by translating every root field into one
//! parameterized Cypher statement.
//!
//! The database is reached through the [`Executor`](execution::Executor)
//! trait; everything else is a pure request-to-statement compiler that is
//! safe to share across concurrent requests.

pub(crate) mod ast;
pub mod authorization;
pub mod cypher;
pub mod execution;
pub(crate) mod file_reader;
pub mod loc;
pub mod operation;
pub mod schema;
pub mod shaper;
pub mod subscriptions;
pub mod translate;
pub mod value;

pub use execution::GraphCypher;
pub use execution::GraphCypherBuilder;

#[cfg(test)]
mod test;
