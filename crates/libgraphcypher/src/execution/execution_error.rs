use crate::schema::SchemaBuildError;
use thiserror::Error;

/// Failures outside of a single GraphQL response: building the engine and
/// establishing a request context. Request-time failures are reported in
/// the response's `errors` instead.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Build(#[from] SchemaBuildError),

    #[error("Invalid bearer token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("A bearer token was given but no JWT secret is configured")]
    MissingJwtConfig,
}
