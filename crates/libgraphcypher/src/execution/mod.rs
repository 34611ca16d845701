//! Request execution: operation resolution, `@populatedBy` callbacks,
//! translation, the host-provided [`Executor`] and response shaping.

mod access_mode;
mod engine_config;
mod error_mapping;
mod execution_error;
mod executor;
mod executor_error;
mod graph_cypher;
mod graphql_error;
mod graphql_request;
mod graphql_response;
mod mock_executor;
mod populated_by_runner;
mod query_result;
mod request_context;

pub use access_mode::AccessMode;
pub use engine_config::EngineConfig;
pub use engine_config::JwtConfig;
pub use execution_error::ExecutionError;
pub use executor::Executor;
pub use executor_error::ExecutorError;
pub use graph_cypher::GraphCypher;
pub use graph_cypher::GraphCypherBuilder;
pub use graphql_error::GraphQLError;
pub use graphql_request::GraphQLRequest;
pub use graphql_response::GraphQLResponse;
pub use graphql_response::GraphQLResponseStream;
pub use mock_executor::MockExecutor;
pub use query_result::QueryCounters;
pub use query_result::QueryResult;
pub use query_result::Record;
pub use request_context::RequestContext;

#[cfg(test)]
mod tests;
