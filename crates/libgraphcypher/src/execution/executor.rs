use crate::cypher::CypherStatement;
use crate::execution::AccessMode;
use crate::execution::ExecutorError;
use crate::execution::QueryResult;
use async_trait::async_trait;

/// Runs statements against the database. Implemented by the host over its
/// driver; each call is one transaction, so a failing statement (including
/// a failed `apoc.util.validate`) leaves no partial writes behind.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run(&self, statement: &CypherStatement, mode: AccessMode) -> Result<QueryResult, ExecutorError>;
}
