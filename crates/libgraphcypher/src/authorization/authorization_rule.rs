use crate::authorization::AuthorizationOperation;
use crate::authorization::ValidationTiming;
use serde_json::Value as JsonValue;

/// Whether a rule silently narrows results or rejects the operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    Filter,
    Validate,
}

/// One entry of an `@authorization(filter: [...], validate: [...])` list.
///
/// The `where` clause is kept as raw input; it is translated per request
/// because `$jwt` references are substituted with the caller's claims.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthorizationRule {
    pub(crate) kind: RuleKind,
    pub(crate) operations: Vec<AuthorizationOperation>,
    pub(crate) require_authentication: bool,
    pub(crate) when: Vec<ValidationTiming>,
    pub(crate) where_: JsonValue,
}
impl AuthorizationRule {
    pub(crate) fn from_json(kind: RuleKind, rule: &JsonValue) -> Result<Self, String> {
        let Some(entries) = rule.as_object() else {
            return Err(format!("expected an object for each rule, found `{rule}`"));
        };

        for key in entries.keys() {
            let known = match kind {
                RuleKind::Filter => ["operations", "requireAuthentication", "where"].contains(&key.as_str()),
                RuleKind::Validate => ["operations", "requireAuthentication", "when", "where"].contains(&key.as_str()),
            };
            if !known {
                return Err(format!("unknown rule argument `{key}`"));
            }
        }

        let operations = match entries.get("operations") {
            Some(JsonValue::Array(names)) => names.iter()
                .map(|name| name.as_str()
                    .and_then(AuthorizationOperation::from_name)
                    .ok_or_else(|| format!("unknown authorization operation `{name}`")))
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(format!("`operations` must be a list, found `{other}`")),
            None => match kind {
                RuleKind::Filter => AuthorizationOperation::ALL.iter()
                    .copied()
                    .filter(|op| *op != AuthorizationOperation::Create)
                    .collect(),
                RuleKind::Validate => AuthorizationOperation::ALL.to_vec(),
            },
        };

        let when = match entries.get("when") {
            Some(JsonValue::Array(names)) => names.iter()
                .map(|name| name.as_str()
                    .and_then(ValidationTiming::from_name)
                    .ok_or_else(|| format!("unknown `when` value `{name}`")))
                .collect::<Result<Vec<_>, _>>()?,
            Some(JsonValue::String(name)) => vec![
                ValidationTiming::from_name(name)
                    .ok_or_else(|| format!("unknown `when` value `{name}`"))?,
            ],
            Some(other) => return Err(format!("`when` must be a list, found `{other}`")),
            None => vec![ValidationTiming::After],
        };

        let require_authentication = match entries.get("requireAuthentication") {
            Some(JsonValue::Bool(required)) => *required,
            Some(other) => return Err(format!(
                "`requireAuthentication` must be a boolean, found `{other}`",
            )),
            None => true,
        };

        let where_ = entries.get("where").cloned().unwrap_or(JsonValue::Null);
        if !(where_.is_object() || where_.is_null()) {
            return Err(format!("`where` must be an object, found `{where_}`"));
        }

        Ok(Self {
            kind,
            operations,
            require_authentication,
            when,
            where_,
        })
    }

    pub fn applies_to(&self, operation: AuthorizationOperation) -> bool {
        self.operations.contains(&operation)
    }

    /// Whether a validate rule runs at `timing` for `operation`. Operations
    /// that do not write have a single check and ignore `when`.
    pub fn runs_at(&self, operation: AuthorizationOperation, timing: ValidationTiming) -> bool {
        if !self.applies_to(operation) {
            return false;
        }
        if !operation.is_write() {
            return timing == ValidationTiming::After;
        }
        self.when.contains(&timing)
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn operations(&self) -> &[AuthorizationOperation] {
        self.operations.as_slice()
    }

    pub fn require_authentication(&self) -> bool {
        self.require_authentication
    }

    pub fn when(&self) -> &[ValidationTiming] {
        self.when.as_slice()
    }

    pub fn where_clause(&self) -> &JsonValue {
        &self.where_
    }
}
