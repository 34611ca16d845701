//! Evaluates attribute-level `where` inputs against JSON objects, without a
//! database round trip.

use crate::schema::Attribute;
use crate::schema::AttributeType;
use crate::schema::JwtShape;
use crate::schema::lookup_claim;
use crate::translate::CompareOp;
use crate::translate::TranslateError;
use crate::translate::operator;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, TranslateError>;

/// Where the filtered fields are declared.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FieldSource<'a> {
    /// Fields of an entity; objects are keyed by field name.
    Attributes(&'a IndexMap<String, Attribute>),
    /// Claims of a decoded JWT. Without a `@jwt` type any dotted path is
    /// accepted.
    Claims(Option<&'a JwtShape>),
}

struct Field<'a> {
    attr_type: Option<&'a AttributeType>,
    path: Vec<String>,
}

pub(crate) struct MemoryFilter<'a> {
    source: FieldSource<'a>,
    type_name: String,
}
impl<'a> MemoryFilter<'a> {
    pub(crate) fn new(source: FieldSource<'a>, type_name: impl Into<String>) -> Self {
        Self {
            source,
            type_name: type_name.into(),
        }
    }

    fn field(&self, name: &str) -> Option<Field<'a>> {
        match self.source {
            FieldSource::Attributes(attributes) => attributes.get(name)
                .filter(|attr| !attr.is_computed())
                .map(|attr| Field {
                    attr_type: Some(attr.attr_type()),
                    path: vec![attr.name().to_string()],
                }),
            FieldSource::Claims(Some(shape)) => shape.claim(name).map(|claim| Field {
                attr_type: Some(claim.attr_type()),
                path: claim.path().to_vec(),
            }),
            FieldSource::Claims(None) => Some(Field {
                attr_type: None,
                path: name.split('.').map(str::to_string).collect(),
            }),
        }
    }

    fn resolve_key(&self, key: &str) -> Result<(Field<'a>, operator::FilterOperator)> {
        operator::split_filter_key(key).into_iter()
            .find_map(|(field_name, filter)| self.field(field_name)
                .filter(|field| field.attr_type.is_none_or(|attr_type| operator::supports(attr_type, filter)))
                .map(|field| (field, filter)))
            .ok_or_else(|| TranslateError::unknown_field(key, self.type_name.as_str()))
    }

    /// Checks that every key of `where_` names a known field and operator.
    pub(crate) fn check(&self, where_: &JsonValue) -> Result<()> {
        self.evaluate(where_, &JsonValue::Null).map(|_| ())
    }

    pub(crate) fn evaluate(&self, where_: &JsonValue, object: &JsonValue) -> Result<bool> {
        let entries = match where_ {
            JsonValue::Null => return Ok(true),
            JsonValue::Object(entries) => entries,
            other => return Err(TranslateError::shape(format!("{}Where", self.type_name), other)),
        };

        let mut result = true;
        for (key, value) in entries {
            let matched = match key.as_str() {
                "AND" => {
                    let mut all = true;
                    for branch in as_list(value) {
                        all &= self.evaluate(branch, object)?;
                    }
                    all
                },
                "OR" => {
                    let branches = as_list(value);
                    let mut any = branches.is_empty();
                    for branch in branches {
                        any |= self.evaluate(branch, object)?;
                    }
                    any
                },
                "NOT" => !self.evaluate(value, object)?,
                _ => {
                    let (field, filter) = self.resolve_key(key)?;
                    let actual = lookup_claim(object, field.path.as_slice()).unwrap_or(&JsonValue::Null);
                    let matched = compare(filter.op, actual, value)?;
                    match (filter.negated, matched) {
                        (true, Some(matched)) => !matched,
                        (false, Some(matched)) => matched,
                        (_, None) => false,
                    }
                },
            };
            result &= matched;
        }
        Ok(result)
    }
}

fn as_list(value: &JsonValue) -> Vec<&JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter().collect(),
        JsonValue::Null => vec![],
        single => vec![single],
    }
}

/// `None` when the comparison is undetermined (a missing value), which never
/// matches, negated or not.
fn compare(op: CompareOp, actual: &JsonValue, expected: &JsonValue) -> Result<Option<bool>> {
    if expected.is_null() {
        return Ok(match op {
            CompareOp::Equal => Some(actual.is_null()),
            _ => Some(true),
        });
    }
    if actual.is_null() {
        return Ok(None);
    }

    Ok(Some(match op {
        CompareOp::Equal => json_eq(actual, expected),
        CompareOp::In => as_list(expected).into_iter().any(|candidate| json_eq(actual, candidate)),
        CompareOp::Includes => as_list(actual).into_iter().any(|item| json_eq(item, expected)),
        CompareOp::Contains | CompareOp::StartsWith | CompareOp::EndsWith => {
            let (Some(actual), Some(expected)) = (actual.as_str(), expected.as_str()) else {
                return Ok(None);
            };
            match op {
                CompareOp::Contains => actual.contains(expected),
                CompareOp::StartsWith => actual.starts_with(expected),
                _ => actual.ends_with(expected),
            }
        },
        CompareOp::Matches => {
            let (Some(actual), Some(pattern)) = (actual.as_str(), expected.as_str()) else {
                return Ok(None);
            };
            // Cypher's `=~` matches the whole string.
            let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|err| TranslateError::InvalidArgument {
                argument: "MATCHES".to_string(),
                detail: err.to_string(),
                value: expected.to_string(),
            })?;
            regex.is_match(actual)
        },
        CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte => {
            let Some(ordering) = json_cmp(actual, expected) else {
                return Ok(None);
            };
            match op {
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Lte => ordering != Ordering::Greater,
                CompareOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }
        },
        CompareOp::Distance => return Err(TranslateError::InvalidArgument {
            argument: "DISTANCE".to_string(),
            detail: "distance filters need the database".to_string(),
            value: expected.to_string(),
        }),
    }))
}

fn json_eq(left: &JsonValue, right: &JsonValue) -> bool {
    match (left, right) {
        (JsonValue::Number(l), JsonValue::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => l == r,
            _ => l.as_f64() == r.as_f64(),
        },
        // BigInt and ID values travel as strings on one side only.
        (JsonValue::String(s), JsonValue::Number(n)) | (JsonValue::Number(n), JsonValue::String(s)) =>
            *s == n.to_string(),
        (JsonValue::Array(l), JsonValue::Array(r)) =>
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| json_eq(l, r)),
        (l, r) => l == r,
    }
}

fn json_cmp(left: &JsonValue, right: &JsonValue) -> Option<Ordering> {
    match (left, right) {
        (JsonValue::Number(l), JsonValue::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
        },
        (JsonValue::String(l), JsonValue::String(r)) => match (l.parse::<i128>(), r.parse::<i128>()) {
            (Ok(l), Ok(r)) => Some(l.cmp(&r)),
            // ISO temporal strings of one kind order lexicographically.
            _ => Some(l.as_str().cmp(r.as_str())),
        },
        (JsonValue::String(s), JsonValue::Number(n)) => s.parse::<f64>().ok()?.partial_cmp(&n.as_f64()?),
        (JsonValue::Number(n), JsonValue::String(s)) => n.as_f64()?.partial_cmp(&s.parse::<f64>().ok()?),
        _ => None,
    }
}
