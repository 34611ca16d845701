use crate::cypher::CypherStatement;
use crate::execution::AccessMode;
use crate::execution::Executor;
use crate::execution::ExecutorError;
use crate::execution::QueryResult;
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// An [`Executor`] that records every statement and answers with scripted
/// results, in order. Once the script runs out every statement gets an
/// empty result.
#[derive(Debug, Default)]
pub struct MockExecutor {
    results: Mutex<VecDeque<Result<QueryResult, ExecutorError>>>,
    statements: Mutex<Vec<(CypherStatement, AccessMode)>>,
}
impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, result: QueryResult) -> Self {
        self.results.get_mut().push_back(Ok(result));
        self
    }

    pub fn with_error(mut self, error: ExecutorError) -> Self {
        self.results.get_mut().push_back(Err(error));
        self
    }

    /// Statements run so far, with the access mode each asked for.
    pub async fn statements(&self) -> Vec<(CypherStatement, AccessMode)> {
        self.statements.lock().await.clone()
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn run(&self, statement: &CypherStatement, mode: AccessMode) -> Result<QueryResult, ExecutorError> {
        self.statements.lock().await.push((statement.clone(), mode));
        self.results.lock().await.pop_front().unwrap_or_else(|| Ok(QueryResult::default()))
    }
}
