use serde::Deserialize;

/// Engine-wide settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Capacity of the subscription broadcast channel.
    pub event_buffer: usize,
    pub jwt: Option<JwtConfig>,
    /// Cap applied to every `limit` and `first`.
    pub max_limit: Option<u64>,
    /// Whether mutations publish events to subscribers.
    pub subscriptions: bool,
}
impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_buffer: 1024,
            jwt: None,
            max_limit: None,
            subscriptions: true,
        }
    }
}

/// How bearer tokens are verified.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    /// HS256 shared secret.
    pub secret: String,
}
