use crate::authorization::AuthorizationOperation;
use crate::authorization::AuthorizationRule;
use crate::authorization::RuleKind;
use crate::authorization::ValidationTiming;
use serde_json::Value as JsonValue;

/// The rules of one `@authorization` directive, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthorizationAnnotation {
    pub(crate) filter: Vec<AuthorizationRule>,
    pub(crate) validate: Vec<AuthorizationRule>,
}
impl AuthorizationAnnotation {
    pub(crate) fn from_directive_args(args: &JsonValue) -> Result<Self, String> {
        let Some(entries) = args.as_object() else {
            return Err("expected directive arguments".to_string());
        };
        let mut annotation = Self::default();
        for (key, rules) in entries {
            let kind = match key.as_str() {
                "filter" => RuleKind::Filter,
                "validate" => RuleKind::Validate,
                other => return Err(format!("unknown argument `{other}`")),
            };
            let rules = match rules {
                JsonValue::Array(rules) => rules.iter().collect::<Vec<_>>(),
                single => vec![single],
            };
            for rule in rules {
                let rule = AuthorizationRule::from_json(kind, rule)?;
                match kind {
                    RuleKind::Filter => annotation.filter.push(rule),
                    RuleKind::Validate => annotation.validate.push(rule),
                }
            }
        }
        if annotation.filter.is_empty() && annotation.validate.is_empty() {
            return Err("at least one `filter` or `validate` rule is required".to_string());
        }
        Ok(annotation)
    }

    pub fn filter_rules(&self) -> &[AuthorizationRule] {
        self.filter.as_slice()
    }

    pub fn validate_rules(&self) -> &[AuthorizationRule] {
        self.validate.as_slice()
    }

    pub(crate) fn filters_for(
        &self,
        operation: AuthorizationOperation,
    ) -> impl Iterator<Item = &AuthorizationRule> {
        self.filter.iter().filter(move |rule| rule.applies_to(operation))
    }

    pub(crate) fn validations_for(
        &self,
        operation: AuthorizationOperation,
        timing: ValidationTiming,
    ) -> impl Iterator<Item = &AuthorizationRule> {
        self.validate.iter().filter(move |rule| rule.runs_at(operation, timing))
    }

    pub(crate) fn rules(&self) -> impl Iterator<Item = &AuthorizationRule> {
        self.filter.iter().chain(self.validate.iter())
    }
}
