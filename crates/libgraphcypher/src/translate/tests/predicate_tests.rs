use crate::translate::Predicate;
use crate::translate::Scope;

fn is_null(property: &str) -> Predicate {
    Predicate::IsNull {
        negated: false,
        property: property.to_string(),
        scope: Scope::Node,
    }
}

#[test]
fn and_drops_true_and_absorbs_false() {
    assert_eq!(Predicate::and([]), Predicate::True);
    assert_eq!(Predicate::and([Predicate::True, is_null("a")]), is_null("a"));
    assert_eq!(Predicate::and([is_null("a"), Predicate::False]), Predicate::False);
    assert_eq!(
        Predicate::and([Predicate::and([is_null("a"), is_null("b")]), is_null("c")]),
        Predicate::And(vec![is_null("a"), is_null("b"), is_null("c")]),
    );
}

#[test]
fn or_drops_false_and_absorbs_true() {
    assert_eq!(Predicate::or([]), Predicate::False);
    assert_eq!(Predicate::or([Predicate::False, is_null("a")]), is_null("a"));
    assert_eq!(Predicate::or([is_null("a"), Predicate::True]), Predicate::True);
    assert_eq!(
        Predicate::or([is_null("a"), Predicate::or([is_null("b"), is_null("c")])]),
        Predicate::Or(vec![is_null("a"), is_null("b"), is_null("c")]),
    );
}

#[test]
fn negation() {
    assert_eq!(Predicate::negate(Predicate::True), Predicate::False);
    assert_eq!(Predicate::negate(Predicate::False), Predicate::True);
    assert_eq!(Predicate::negate(Predicate::negate(is_null("a"))), is_null("a"));
    assert_eq!(Predicate::negate(is_null("a")), Predicate::Not(Box::new(is_null("a"))));
}
