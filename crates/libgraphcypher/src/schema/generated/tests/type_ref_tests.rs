use crate::schema::generated::TypeRef;

#[test]
fn parses_wrapped_notation() {
    let parsed = TypeRef::parse("[Movie!]!").expect("valid notation");
    assert_eq!(
        parsed,
        TypeRef::NonNull(Box::new(TypeRef::List(Box::new(
            TypeRef::NonNull(Box::new(TypeRef::Named("Movie".to_string()))),
        )))),
    );
    assert_eq!(parsed.named(), "Movie");
    assert!(parsed.is_list());
    assert!(!parsed.is_nullable());
    assert_eq!(parsed.to_string(), "[Movie!]!");
    assert_eq!(parsed.item_type().map(|item| item.to_string()), Some("Movie!".to_string()));
}

#[test]
fn rejects_malformed_notation() {
    assert_eq!(TypeRef::parse(""), None);
    assert_eq!(TypeRef::parse("[Movie"), None);
    assert_eq!(TypeRef::parse("Mo vie"), None);
}

#[test]
fn named_types_are_nullable_scalars() {
    let parsed = TypeRef::parse("String").expect("valid notation");
    assert!(parsed.is_nullable());
    assert!(!parsed.is_list());
    assert_eq!(parsed.item_type(), None);
}
