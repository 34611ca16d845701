use crate::schema::AttributeType;
use crate::schema::ScalarKind;
use crate::value::CoercionError;
use crate::value::DbValue;
use crate::value::temporal;
use serde_json::Value as JsonValue;
use serde_json::json;

type Result<T> = std::result::Result<T, CoercionError>;

/// Serializes a database value as the GraphQL scalar declared by
/// `attr_type`.
///
/// Spatial values serialize to the full `Point`/`CartesianPoint` object; the
/// shaper narrows that down to the selected sub-fields.
pub fn serialize_output(attr_type: &AttributeType, value: &DbValue) -> Result<JsonValue> {
    if value.is_null() {
        if !attr_type.nullable() {
            return Err(CoercionError::UnexpectedNull {
                scalar: attr_type.to_string(),
            });
        }
        return Ok(JsonValue::Null);
    }

    if attr_type.is_list() {
        let items = match value {
            DbValue::List(items) => items,
            other => return Err(CoercionError::ExpectedList {
                scalar: attr_type.to_string(),
                value: other.to_json().to_string(),
            }),
        };
        return items.iter()
            .map(|item| match item {
                DbValue::Null if attr_type.items_nullable() => Ok(JsonValue::Null),
                DbValue::Null => Err(CoercionError::UnexpectedNull {
                    scalar: format!("{}!", attr_type.kind().graphql_name()),
                }),
                item => serialize_scalar(attr_type.kind(), item),
            })
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array);
    }

    serialize_scalar(attr_type.kind(), value)
}

pub(crate) fn serialize_scalar(kind: &ScalarKind, value: &DbValue) -> Result<JsonValue> {
    let name = kind.graphql_name();
    let fail = |description: &'static str| {
        CoercionError::cannot_represent(name, description, &value.to_json())
    };

    match (kind, value) {
        (ScalarKind::Int, DbValue::Integer(i)) if i32::try_from(*i).is_ok() => Ok(json!(i)),
        (ScalarKind::Int, DbValue::Integer(_)) => Err(fail("non 32-bit signed integer")),
        (ScalarKind::Int, DbValue::Float(f)) if f.fract() == 0.0
            && *f >= i32::MIN as f64
            && *f <= i32::MAX as f64 => Ok(json!(*f as i64)),
        (ScalarKind::Int, _) => Err(fail("non-integer")),

        (ScalarKind::Float, DbValue::Integer(i)) => Ok(json!(*i as f64)),
        (ScalarKind::Float, DbValue::Float(f)) => Ok(json!(f)),
        (ScalarKind::Float, _) => Err(fail("non numeric")),

        (ScalarKind::String | ScalarKind::Enum(_), DbValue::String(s)) => Ok(json!(s)),
        (ScalarKind::String, DbValue::Integer(i)) => Ok(json!(i.to_string())),
        (ScalarKind::String, DbValue::Float(f)) => Ok(json!(f.to_string())),
        (ScalarKind::String, DbValue::Boolean(b)) => Ok(json!(b.to_string())),
        (ScalarKind::String, _) => Err(fail("a non string")),
        (ScalarKind::Enum(_), _) => Err(fail("non enum")),

        (ScalarKind::ID, DbValue::String(s)) => Ok(json!(s)),
        (ScalarKind::ID, DbValue::Integer(i)) => Ok(json!(i.to_string())),
        (ScalarKind::ID, _) => Err(fail("a non ID")),

        (ScalarKind::Boolean, DbValue::Boolean(b)) => Ok(json!(b)),
        (ScalarKind::Boolean, _) => Err(fail("a non boolean")),

        (ScalarKind::BigInt, DbValue::Integer(i)) => Ok(json!(i.to_string())),
        (ScalarKind::BigInt, DbValue::String(s)) if is_decimal(s) => Ok(json!(s)),
        (ScalarKind::BigInt, _) => Err(fail("non-integer")),

        (ScalarKind::DateTime, DbValue::DateTime(dt)) => Ok(json!(temporal::format_datetime(dt))),
        (ScalarKind::DateTime, DbValue::LocalDateTime(dt)) =>
            Ok(json!(temporal::format_datetime(&dt.and_utc().fixed_offset()))),
        (ScalarKind::Date, DbValue::Date(d)) => Ok(json!(temporal::format_date(d))),
        (ScalarKind::Date, DbValue::DateTime(dt)) =>
            Ok(json!(temporal::format_date(&dt.date_naive()))),
        (ScalarKind::Time, DbValue::Time(t)) =>
            Ok(json!(temporal::format_time(&t.time, &t.offset))),
        (ScalarKind::LocalTime, DbValue::LocalTime(t)) =>
            Ok(json!(temporal::format_local_time(t))),
        (ScalarKind::LocalDateTime, DbValue::LocalDateTime(dt)) =>
            Ok(json!(temporal::format_local_datetime(dt))),
        (ScalarKind::Duration, DbValue::Duration(d)) => Ok(json!(d.to_string())),
        (ScalarKind::DateTime
            | ScalarKind::Date
            | ScalarKind::Time
            | ScalarKind::LocalTime
            | ScalarKind::LocalDateTime, _) => Err(fail("non temporal")),
        (ScalarKind::Duration, _) => Err(fail("non duration")),

        (ScalarKind::Point | ScalarKind::CartesianPoint, DbValue::Point(point)) =>
            Ok(point.to_graphql()),
        (ScalarKind::Point | ScalarKind::CartesianPoint, _) => Err(fail("non point")),
    }
}

fn is_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next();
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
}
