use crate::authorization::AuthorizationOperation;
use serde_json::Value as JsonValue;

/// `@authentication(operations: [...])`: a JWT must be present for the
/// listed operations. Without `operations` every operation requires one.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthenticationAnnotation {
    pub(crate) operations: Vec<AuthorizationOperation>,
}
impl AuthenticationAnnotation {
    pub(crate) fn from_directive_args(args: &JsonValue) -> Result<Self, String> {
        let operations = match args.get("operations") {
            Some(JsonValue::Array(names)) => names.iter()
                .map(|name| name.as_str()
                    .and_then(AuthorizationOperation::from_name)
                    .ok_or_else(|| format!("unknown authentication operation `{name}`")))
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(format!("`operations` must be a list, found `{other}`")),
            None => AuthorizationOperation::ALL.to_vec(),
        };
        Ok(Self { operations })
    }

    pub fn requires_authentication(&self, operation: AuthorizationOperation) -> bool {
        self.operations.contains(&operation)
    }
}
