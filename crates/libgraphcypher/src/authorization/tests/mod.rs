mod authorization_rule_tests;
mod rule_evaluator_tests;
