use crate::authorization::AuthorizationOperation;
use crate::authorization::AuthorizationPhase;
use crate::authorization::AuthorizationRule;
use crate::authorization::PhaseTracker;
use crate::authorization::RuleKind;
use crate::authorization::ValidationTiming;
use crate::schema::SchemaBuilder;
use crate::schema::SchemaValidationError;
use serde_json::json;

mod defaults {
    use super::*;

    #[test]
    fn filter_rules_cover_everything_but_create() {
        let rule = AuthorizationRule::from_json(RuleKind::Filter, &json!({})).expect("rule parses");
        assert!(rule.applies_to(AuthorizationOperation::Read));
        assert!(rule.applies_to(AuthorizationOperation::Subscribe));
        assert!(!rule.applies_to(AuthorizationOperation::Create));
        assert!(rule.require_authentication());
    }

    #[test]
    fn validate_rules_run_after_by_default() {
        let rule = AuthorizationRule::from_json(
            RuleKind::Validate,
            &json!({ "operations": ["UPDATE", "READ"] }),
        ).expect("rule parses");
        assert!(rule.runs_at(AuthorizationOperation::Update, ValidationTiming::After));
        assert!(!rule.runs_at(AuthorizationOperation::Update, ValidationTiming::Before));
        assert!(!rule.runs_at(AuthorizationOperation::Delete, ValidationTiming::After));
    }

    #[test]
    fn reads_ignore_when() {
        let rule = AuthorizationRule::from_json(
            RuleKind::Validate,
            &json!({ "operations": ["READ"], "when": ["BEFORE"] }),
        ).expect("rule parses");
        assert!(rule.runs_at(AuthorizationOperation::Read, ValidationTiming::After));
        assert!(!rule.runs_at(AuthorizationOperation::Read, ValidationTiming::Before));
    }
}

mod rejected_rules {
    use super::*;

    #[test]
    fn filter_rules_have_no_timing() {
        let err = AuthorizationRule::from_json(RuleKind::Filter, &json!({ "when": ["BEFORE"] }))
            .expect_err("filters take no `when`");
        assert_eq!(err, "unknown rule argument `when`");
    }

    #[test]
    fn unknown_operations() {
        let err = AuthorizationRule::from_json(RuleKind::Validate, &json!({ "operations": ["PUBLISH"] }))
            .expect_err("unknown operation");
        assert_eq!(err, "unknown authorization operation `\"PUBLISH\"`");
    }

    #[test]
    fn invalid_rules_fail_the_schema_build() {
        let err = SchemaBuilder::new()
            .load_str(None, r#"
                type Post @authorization(filter: [{ when: [BEFORE] }]) {
                    title: String!
                }
            "#)
            .expect("type defs parse")
            .build()
            .expect_err("rule is invalid");
        let errors = err.validation_errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            SchemaValidationError::InvalidAuthorization { location, .. } if location == "Post",
        ));
    }
}

mod phases {
    use super::*;

    #[test]
    fn phases_may_be_skipped() {
        let mut phases = PhaseTracker::new();
        assert_eq!(phases.current(), AuthorizationPhase::PreFilter);
        phases.advance(AuthorizationPhase::PostValidate).expect("forward");
        phases.advance(AuthorizationPhase::PostValidate).expect("same phase");
        assert_eq!(phases.current(), AuthorizationPhase::PostValidate);
    }

    #[test]
    fn phases_never_go_back() {
        let mut phases = PhaseTracker::new();
        phases.advance(AuthorizationPhase::Response).expect("forward");
        assert!(phases.advance(AuthorizationPhase::Write).is_err());
    }
}
