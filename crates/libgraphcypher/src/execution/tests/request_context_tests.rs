use crate::execution::ExecutionError;
use crate::execution::JwtConfig;
use crate::execution::RequestContext;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use serde_json::json;

fn config(secret: &str) -> JwtConfig {
    JwtConfig {
        audience: None,
        issuer: None,
        secret: secret.to_string(),
    }
}

fn token(claims: &serde_json::Value, secret: &str) -> String {
    jsonwebtoken::encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("token encodes")
}

#[test]
fn bearer_tokens_yield_their_claims() {
    let claims = json!({ "sub": "u1", "roles": ["admin"] });
    let bearer = format!("Bearer {}", token(&claims, "s3cret"));
    let context = RequestContext::from_bearer(&bearer, Some(&config("s3cret"))).expect("token verifies");
    assert_eq!(context.jwt(), Some(&claims));
}

#[test]
fn the_bearer_prefix_is_optional() {
    let claims = json!({ "sub": "u1" });
    let context = RequestContext::from_bearer(&token(&claims, "s3cret"), Some(&config("s3cret")))
        .expect("token verifies");
    assert_eq!(context.jwt(), Some(&claims));
}

#[test]
fn tokens_signed_with_another_secret_are_rejected() {
    let bearer = token(&json!({ "sub": "u1" }), "other");
    let err = RequestContext::from_bearer(&bearer, Some(&config("s3cret"))).expect_err("bad signature");
    assert!(matches!(err, ExecutionError::InvalidToken(_)));
}

#[test]
fn tokens_need_a_configured_secret() {
    let bearer = token(&json!({ "sub": "u1" }), "s3cret");
    let err = RequestContext::from_bearer(&bearer, None).expect_err("no config");
    assert!(matches!(err, ExecutionError::MissingJwtConfig));
}

#[test]
fn anonymous_contexts_carry_no_claims() {
    assert_eq!(RequestContext::anonymous().jwt(), None);
}
