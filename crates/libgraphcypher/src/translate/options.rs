use crate::schema::Attribute;
use crate::schema::LimitAnnotation;
use crate::translate::Scope;
use crate::translate::TranslateError;
use crate::translate::cursor;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

type Result<T> = std::result::Result<T, TranslateError>;

/// One `ORDER BY` key.
#[derive(Clone, Debug, PartialEq)]
pub struct SortField {
    /// Property name, `None` for `@cypher` fields which sort on their
    /// materialized value.
    pub db_name: Option<String>,
    pub descending: bool,
    pub field_name: String,
    pub scope: Scope,
}

/// Pagination and ordering of one list level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadOptions {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub sort: Vec<SortField>,
}
impl ReadOptions {
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none() && self.sort.is_empty()
    }
}

/// Page size limits that apply to one list level.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LimitPolicy {
    pub(crate) default: Option<u64>,
    pub(crate) max: Option<u64>,
}
impl LimitPolicy {
    pub(crate) fn new(annotation: Option<&LimitAnnotation>, global_max: Option<u64>) -> Self {
        let max = match (annotation.and_then(LimitAnnotation::max_limit), global_max) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            default: annotation.and_then(LimitAnnotation::default_limit),
            max,
        }
    }

    pub(crate) fn apply(&self, requested: Option<u64>) -> Option<u64> {
        let limit = requested.or(self.default);
        match (limit, self.max) {
            (Some(limit), Some(max)) => Some(limit.min(max)),
            (None, Some(max)) => Some(max),
            (limit, None) => limit,
        }
    }
}

fn non_negative(argument: &str, value: &JsonValue) -> Result<Option<u64>> {
    if value.is_null() {
        return Ok(None);
    }
    value.as_u64().map(Some).ok_or_else(|| TranslateError::InvalidArgument {
        argument: argument.to_string(),
        detail: "expected a non-negative integer".to_string(),
        value: value.to_string(),
    })
}

fn direction(type_name: &str, value: &JsonValue) -> Result<bool> {
    match value.as_str() {
        Some("ASC") => Ok(false),
        Some("DESC") => Ok(true),
        _ => Err(TranslateError::InvalidArgument {
            argument: type_name.to_string(),
            detail: "expected ASC or DESC".to_string(),
            value: value.to_string(),
        }),
    }
}

/// Reads a `[<T>Sort!]` list; each element may name several fields, which
/// keep their input order.
pub(crate) fn sort_fields(
    type_name: &str,
    attributes: &IndexMap<String, Attribute>,
    scope: Scope,
    value: &JsonValue,
) -> Result<Vec<SortField>> {
    let items = match value {
        JsonValue::Null => return Ok(vec![]),
        JsonValue::Array(items) => items.iter().collect::<Vec<_>>(),
        single => vec![single],
    };
    let mut fields = vec![];
    for item in items {
        let entries = item.as_object().ok_or_else(|| TranslateError::shape(type_name, item))?;
        for (field_name, dir) in entries {
            let attr = attributes.get(field_name)
                .filter(|attr| !attr.attr_type().is_list())
                .ok_or_else(|| TranslateError::unknown_field(field_name, type_name))?;
            fields.push(SortField {
                db_name: (!attr.is_computed()).then(|| attr.db_name().to_string()),
                descending: direction(type_name, dir)?,
                field_name: field_name.clone(),
                scope,
            });
        }
    }
    Ok(fields)
}

/// Reads `options: { limit, offset, sort }`.
pub(crate) fn read_options(
    type_name: &str,
    attributes: &IndexMap<String, Attribute>,
    value: &JsonValue,
    policy: LimitPolicy,
) -> Result<ReadOptions> {
    let mut options = ReadOptions::default();
    if let Some(entries) = value.as_object() {
        for (key, value) in entries {
            match key.as_str() {
                "limit" => options.limit = non_negative("limit", value)?,
                "offset" => options.offset = non_negative("offset", value)?,
                "sort" => options.sort = sort_fields(&format!("{type_name}Sort"), attributes, Scope::Node, value)?,
                _ => return Err(TranslateError::unknown_field(key, format!("{type_name}Options"))),
            }
        }
    } else if !value.is_null() {
        return Err(TranslateError::shape(format!("{type_name}Options"), value));
    }
    options.limit = policy.apply(options.limit);
    Ok(options)
}

/// Reads connection arguments `first` and `after`; ordering is read by the
/// caller because its shape depends on the connection.
pub(crate) fn connection_window(
    first: Option<&JsonValue>,
    after: Option<&JsonValue>,
    policy: LimitPolicy,
) -> Result<ReadOptions> {
    let limit = match first {
        Some(first) => non_negative("first", first)?,
        None => None,
    };
    let offset = match after.and_then(JsonValue::as_str) {
        Some(after) => Some(cursor::cursor_to_offset(after)
            .ok_or_else(|| TranslateError::InvalidCursor { cursor: after.to_string() })? + 1),
        None => None,
    };
    Ok(ReadOptions {
        limit: policy.apply(limit),
        offset,
        sort: vec![],
    })
}
