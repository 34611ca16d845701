use crate::schema::AttributeType;
use crate::schema::ScalarKind;
use crate::value::CoercionError;
use crate::value::CypherDuration;
use crate::value::DbValue;
use crate::value::Point;
use crate::value::TimeWithOffset;
use crate::value::temporal;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

type Result<T> = std::result::Result<T, CoercionError>;

/// Coerces a JSON input value (argument, variable or callback result) into
/// the [`DbValue`] stored for an attribute of type `attr_type`.
pub fn coerce_input(
    attr_type: &AttributeType,
    value: &JsonValue,
    enums: &IndexMap<String, Vec<String>>,
) -> Result<DbValue> {
    if value.is_null() {
        if !attr_type.nullable() {
            return Err(CoercionError::UnexpectedNull {
                scalar: attr_type.to_string(),
            });
        }
        return Ok(DbValue::Null);
    }

    if !attr_type.is_list() {
        return coerce_scalar_input(attr_type.kind(), value, enums);
    }

    // As in GraphQL, a single item is accepted where a list is expected.
    let items = match value {
        JsonValue::Array(items) => items.iter().collect::<Vec<_>>(),
        single => vec![single],
    };
    let mut coerced = Vec::with_capacity(items.len());
    for item in items {
        if item.is_null() {
            if !attr_type.items_nullable() {
                return Err(CoercionError::UnexpectedNull {
                    scalar: format!("{}!", attr_type.kind().graphql_name()),
                });
            }
            coerced.push(DbValue::Null);
            continue;
        }
        coerced.push(coerce_scalar_input(attr_type.kind(), item, enums)?);
    }
    Ok(DbValue::List(coerced))
}

/// Coerces a single, non-null scalar value.
pub fn coerce_scalar_input(
    kind: &ScalarKind,
    value: &JsonValue,
    enums: &IndexMap<String, Vec<String>>,
) -> Result<DbValue> {
    let name = kind.graphql_name();
    match kind {
        ScalarKind::Int => match value.as_i64() {
            Some(i) if i32::try_from(i).is_ok() => Ok(DbValue::Integer(i)),
            Some(_) => Err(CoercionError::cannot_represent(
                name,
                "non 32-bit signed integer",
                value,
            )),
            None => Err(CoercionError::cannot_represent(name, "non-integer", value)),
        },

        ScalarKind::Float => match value.as_f64() {
            Some(f) if value.is_number() => Ok(DbValue::Float(f)),
            _ => Err(CoercionError::cannot_represent(name, "non numeric", value)),
        },

        ScalarKind::String => match value.as_str() {
            Some(s) => Ok(DbValue::String(s.to_string())),
            None => Err(CoercionError::cannot_represent(name, "a non string", value)),
        },

        ScalarKind::Boolean => match value.as_bool() {
            Some(b) => Ok(DbValue::Boolean(b)),
            None => Err(CoercionError::cannot_represent(name, "a non boolean", value)),
        },

        ScalarKind::ID => match value {
            JsonValue::String(s) => Ok(DbValue::String(s.clone())),
            JsonValue::Number(n) if n.is_i64() => Ok(DbValue::String(n.to_string())),
            _ => Err(CoercionError::cannot_represent(name, "a non ID", value)),
        },

        ScalarKind::BigInt => {
            let parsed = match value {
                JsonValue::String(s) => s.trim().parse::<i64>().ok(),
                JsonValue::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(DbValue::Integer)
                .ok_or_else(|| CoercionError::cannot_represent(name, "non-integer", value))
        },

        ScalarKind::DateTime => value.as_str()
            .and_then(temporal::parse_datetime)
            .map(DbValue::DateTime)
            .ok_or_else(|| CoercionError::cannot_represent(name, "non temporal", value)),

        ScalarKind::Date => value.as_str()
            .and_then(temporal::parse_date)
            .map(DbValue::Date)
            .ok_or_else(|| CoercionError::cannot_represent(name, "non temporal", value)),

        ScalarKind::Time => value.as_str()
            .and_then(temporal::parse_time)
            .map(|(time, offset)| DbValue::Time(TimeWithOffset { time, offset }))
            .ok_or_else(|| CoercionError::cannot_represent(name, "non temporal", value)),

        ScalarKind::LocalTime => value.as_str()
            .and_then(temporal::parse_local_time)
            .map(DbValue::LocalTime)
            .ok_or_else(|| CoercionError::cannot_represent(name, "non temporal", value)),

        ScalarKind::LocalDateTime => value.as_str()
            .and_then(temporal::parse_local_datetime)
            .map(DbValue::LocalDateTime)
            .ok_or_else(|| CoercionError::cannot_represent(name, "non temporal", value)),

        ScalarKind::Duration => value.as_str()
            .and_then(CypherDuration::parse_iso)
            .map(DbValue::Duration)
            .ok_or_else(|| CoercionError::cannot_represent(name, "non duration", value)),

        ScalarKind::Point => {
            let coordinate = |key: &str| value.get(key).and_then(JsonValue::as_f64);
            match (coordinate("longitude"), coordinate("latitude")) {
                (Some(longitude), Some(latitude)) => Ok(DbValue::Point(
                    Point::geographic(longitude, latitude, coordinate("height")),
                )),
                _ => Err(CoercionError::cannot_represent(name, "non point", value)),
            }
        },

        ScalarKind::CartesianPoint => {
            let coordinate = |key: &str| value.get(key).and_then(JsonValue::as_f64);
            match (coordinate("x"), coordinate("y")) {
                (Some(x), Some(y)) => Ok(DbValue::Point(
                    Point::cartesian(x, y, coordinate("z")),
                )),
                _ => Err(CoercionError::cannot_represent(name, "non point", value)),
            }
        },

        ScalarKind::Enum(enum_name) => {
            let Some(variant) = value.as_str() else {
                return Err(CoercionError::cannot_represent(
                    enum_name.as_str(),
                    "non enum",
                    value,
                ));
            };
            let known = enums.get(enum_name)
                .is_some_and(|values| values.iter().any(|v| v == variant));
            if known {
                Ok(DbValue::String(variant.to_string()))
            } else {
                Err(CoercionError::UnknownEnumValue {
                    enum_name: enum_name.to_string(),
                    value: value.to_string(),
                })
            }
        },
    }
}
