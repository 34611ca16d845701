use crate::cypher::CypherEnv;
use crate::cypher::escape_identifier;
use crate::value::DbValue;

#[test]
fn variables_share_one_counter() {
    let mut env = CypherEnv::new();
    assert_eq!(env.node_var(), "this0");
    assert_eq!(env.var(), "var1");
    assert_eq!(env.node_var(), "this2");
}

#[test]
fn params_are_numbered_in_binding_order() {
    let mut env = CypherEnv::new();
    assert_eq!(env.param(DbValue::Integer(1)), "$param0");
    assert_eq!(env.param(DbValue::String("a".to_string())), "$param1");
    assert_eq!(
        env.params().keys().cloned().collect::<Vec<_>>(),
        vec!["param0".to_string(), "param1".to_string()],
    );
}

#[test]
fn identifiers_are_quoted_only_when_needed() {
    assert_eq!(escape_identifier("title"), "title");
    assert_eq!(escape_identifier("_private1"), "_private1");
    assert_eq!(escape_identifier("first name"), "`first name`");
    assert_eq!(escape_identifier("1st"), "`1st`");
    assert_eq!(escape_identifier("odd`name"), "`odd``name`");
}
