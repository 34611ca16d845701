//! `@authentication` and `@authorization`: rule records read from the type
//! definitions and their evaluation per request.

mod authentication_annotation;
mod authorization_annotation;
mod authorization_operation;
mod authorization_phase;
mod authorization_rule;
mod rule_evaluator;
mod validation_timing;

pub use authentication_annotation::AuthenticationAnnotation;
pub use authorization_annotation::AuthorizationAnnotation;
pub use authorization_operation::AuthorizationOperation;
pub use authorization_phase::AuthorizationPhase;
pub use authorization_phase::PhaseTracker;
pub use authorization_rule::AuthorizationRule;
pub use authorization_rule::RuleKind;
pub use rule_evaluator::RuleEvaluator;
pub(crate) use rule_evaluator::validate_annotation;
pub use validation_timing::ValidationTiming;

#[cfg(test)]
mod tests;
