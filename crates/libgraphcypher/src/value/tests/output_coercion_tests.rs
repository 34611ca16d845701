use crate::schema::AttributeType;
use crate::schema::ScalarKind;
use crate::value::CoercionError;
use crate::value::DbValue;
use crate::value::coerce_scalar_input;
use crate::value::serialize_output;
use indexmap::IndexMap;
use serde_json::json;

fn scalar(kind: ScalarKind) -> AttributeType {
    AttributeType::scalar(kind, true)
}

#[test]
fn datetimes_are_rendered_in_utc() {
    let value = coerce_scalar_input(&ScalarKind::DateTime, &json!("2024-01-15T10:30:00+02:00"), &IndexMap::new())
        .expect("valid datetime");

    assert_eq!(
        serialize_output(&scalar(ScalarKind::DateTime), &value),
        Ok(json!("2024-01-15T08:30:00.000Z")),
    );
}

#[test]
fn times_keep_their_offset() {
    let value = coerce_scalar_input(&ScalarKind::Time, &json!("10:15:30+01:00"), &IndexMap::new())
        .expect("valid time");

    assert_eq!(
        serialize_output(&scalar(ScalarKind::Time), &value),
        Ok(json!("10:15:30.000000000+01:00")),
    );
}

#[test]
fn bigint_is_rendered_as_a_string() {
    assert_eq!(
        serialize_output(&scalar(ScalarKind::BigInt), &DbValue::Integer(9007199254740993)),
        Ok(json!("9007199254740993")),
    );
}

#[test]
fn int_rejects_values_outside_32_bits() {
    assert!(matches!(
        serialize_output(&scalar(ScalarKind::Int), &DbValue::Integer(3_000_000_000)),
        Err(CoercionError::CannotRepresent { .. }),
    ));
    assert_eq!(serialize_output(&scalar(ScalarKind::Int), &DbValue::Float(3.0)), Ok(json!(3)));
}

#[test]
fn strings_stringify_primitives() {
    assert_eq!(serialize_output(&scalar(ScalarKind::String), &DbValue::Integer(7)), Ok(json!("7")));
    assert_eq!(serialize_output(&scalar(ScalarKind::String), &DbValue::Boolean(true)), Ok(json!("true")));
}

#[test]
fn non_null_positions_reject_null() {
    let required = AttributeType::scalar(ScalarKind::String, false);
    let items_required = AttributeType::list_of(ScalarKind::String, false, false);

    assert_eq!(
        serialize_output(&required, &DbValue::Null),
        Err(CoercionError::UnexpectedNull {
            scalar: "String!".to_string(),
        }),
    );
    assert!(serialize_output(&items_required, &DbValue::List(vec![DbValue::Null])).is_err());
    assert!(matches!(
        serialize_output(&items_required, &DbValue::String("a".to_string())),
        Err(CoercionError::ExpectedList { .. }),
    ));
}

#[test]
fn written_values_read_back_in_canonical_form() {
    let cases = [
        (ScalarKind::Int, json!(42), json!(42)),
        (ScalarKind::Float, json!(1.5), json!(1.5)),
        (ScalarKind::String, json!("slug"), json!("slug")),
        (ScalarKind::Boolean, json!(true), json!(true)),
        (ScalarKind::ID, json!(7), json!("7")),
        (ScalarKind::BigInt, json!("9223372036854775807"), json!("9223372036854775807")),
        (ScalarKind::DateTime, json!("2024-01-15T10:30:00.123Z"), json!("2024-01-15T10:30:00.123Z")),
        (ScalarKind::Date, json!("2024-01-15"), json!("2024-01-15")),
        (ScalarKind::Time, json!("10:15:30Z"), json!("10:15:30.000000000Z")),
        (ScalarKind::LocalDateTime, json!("2024-01-15T10:30:00"), json!("2024-01-15T10:30:00.000000000")),
        (ScalarKind::LocalTime, json!("10:15:30"), json!("10:15:30.000000000")),
        (ScalarKind::Duration, json!("P1Y2M10DT2H30M"), json!("P1Y2M10DT2H30M")),
    ];
    for (kind, input, expected) in cases {
        let stored = coerce_scalar_input(&kind, &input, &IndexMap::new())
            .unwrap_or_else(|err| panic!("{kind:?} input {input}: {err}"));
        assert_eq!(serialize_output(&scalar(kind), &stored), Ok(expected));
    }
}

#[test]
fn list_values_read_back_item_by_item() {
    let list = AttributeType::list_of(ScalarKind::Date, true, false);
    let stored = crate::value::coerce_input(&list, &json!(["2024-01-15", "2024-02-29"]), &IndexMap::new())
        .expect("valid dates");

    assert_eq!(serialize_output(&list, &stored), Ok(json!(["2024-01-15", "2024-02-29"])));
}
