use crate::execution::ExecutionError;
use crate::execution::JwtConfig;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// Per-request inputs to authorization and callbacks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestContext {
    pub(crate) jwt: Option<JsonValue>,
}
impl RequestContext {
    /// A context with no authenticated user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context for already-verified JWT claims.
    pub fn with_jwt(claims: JsonValue) -> Self {
        Self {
            jwt: Some(claims),
        }
    }

    /// Verifies an HS256 bearer token (with or without the `Bearer `
    /// prefix) against `config` and keeps its claims.
    pub fn from_bearer(token: &str, config: Option<&JwtConfig>) -> Result<Self, ExecutionError> {
        let config = config.ok_or(ExecutionError::MissingJwtConfig)?;
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        match &config.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let key = DecodingKey::from_secret(config.secret.as_bytes());
        let data = jsonwebtoken::decode::<JsonValue>(token, &key, &validation)?;
        tracing::debug!("authenticated request with claims {}", data.claims);
        Ok(Self::with_jwt(data.claims))
    }

    pub fn jwt(&self) -> Option<&JsonValue> {
        self.jwt.as_ref()
    }
}
