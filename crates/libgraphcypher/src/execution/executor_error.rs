use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExecutorError {
    /// The database rejected or aborted the statement.
    #[error("{message}")]
    Database {
        code: Option<String>,
        message: String,
    },

    #[error("Database unavailable: {0}")]
    Unavailable(String),
}
impl ExecutorError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            code: None,
            message: message.into(),
        }
    }
}
