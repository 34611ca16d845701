use crate::cypher::RESOLVE_TYPE_KEY;
use crate::cypher::StatementKind;
use crate::execution::QueryResult;
use crate::operation::FieldSelection;
use crate::schema::AttributeType;
use crate::schema::ScalarKind;
use crate::schema::SchemaModel;
use crate::schema::generated::GeneratedSchema;
use crate::schema::generated::GeneratedType;
use crate::schema::generated::GeneratedTypeKind;
use crate::schema::generated::TypeRef;
use crate::shaper::FieldError;
use crate::shaper::PathSegment;
use crate::shaper::exact_average;
use crate::translate::cursor_to_offset;
use crate::translate::offset_to_cursor;
use crate::value::DbValue;
use crate::value::serialize_output;
use indexmap::IndexMap;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use std::borrow::Cow;

/// A null reached a non-null position and propagates to the closest
/// nullable parent.
struct NullBubble;

/// Errors and current path while one root field is completed.
struct Completion {
    errors: Vec<FieldError>,
    path: Vec<PathSegment>,
}
impl Completion {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(FieldError {
            message: message.into(),
            path: self.path.clone(),
        });
    }
}

/// The completed value of one root field.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedField {
    pub errors: Vec<FieldError>,
    /// A null propagated out of the (non-null) root field, so the whole
    /// `data` is null.
    pub nulls_parent: bool,
    pub value: JsonValue,
}

/// Completes statement results against the generated surface.
///
/// Values of entity and relationship-property types are keyed by response
/// key (the projection applies aliases); every other generated object is
/// keyed by field name.
#[derive(Clone, Copy)]
pub struct ResultShaper<'a> {
    model: &'a SchemaModel,
    surface: &'a GeneratedSchema,
}
impl<'a> ResultShaper<'a> {
    pub fn new(model: &'a SchemaModel, surface: &'a GeneratedSchema) -> Self {
        Self { model, surface }
    }

    fn field_type(&self, parent_type: &str, field_name: &str) -> Option<&'a TypeRef> {
        self.surface.get(parent_type)
            .and_then(|parent| parent.field(field_name))
            .map(|definition| definition.field_type())
    }

    /// The raw value of root field `field` from the records of its
    /// statement; mutation `info` comes from the counters.
    pub fn statement_value(
        &self,
        root_type: &str,
        field: &FieldSelection,
        kind: StatementKind,
        result: &QueryResult,
    ) -> DbValue {
        let column = |name: &str| result.records.first().and_then(|record| record.get(name)).cloned();
        match kind {
            StatementKind::Read => DbValue::List(
                result.records.iter().filter_map(|record| record.get("this").cloned()).collect(),
            ),
            StatementKind::Connection | StatementKind::Aggregate => column("this").unwrap_or(DbValue::Null),
            StatementKind::Create | StatementKind::Update => {
                let data = column("data").unwrap_or(DbValue::List(vec![]));
                let mut entries = IndexMap::new();
                let response = self.field_type(root_type, field.name())
                    .and_then(|field_type| self.surface.get(field_type.named()));
                for name in response.iter().flat_map(|response| response.fields().keys()) {
                    if name != "info" {
                        entries.insert(name.clone(), data.clone());
                    }
                }
                entries.insert("info".to_string(), result.counters.to_db_value());
                DbValue::Map(entries)
            },
            StatementKind::Delete => result.counters.to_db_value(),
        }
    }

    /// Completes root field `field` of `root_type` from `value`.
    pub fn shape(&self, root_type: &str, field: &FieldSelection, value: &DbValue) -> ShapedField {
        let mut state = Completion {
            errors: vec![],
            path: vec![field.response_key().into()],
        };
        let Some(field_type) = self.field_type(root_type, field.name()) else {
            state.error(format!("Cannot query field \"{}\" on type \"{root_type}\".", field.name()));
            return ShapedField {
                errors: state.errors,
                nulls_parent: true,
                value: JsonValue::Null,
            };
        };
        match self.complete(field_type, root_type, field, value, &mut state) {
            Ok(value) => ShapedField {
                errors: state.errors,
                nulls_parent: false,
                value,
            },
            Err(NullBubble) => ShapedField {
                errors: state.errors,
                nulls_parent: true,
                value: JsonValue::Null,
            },
        }
    }

    fn complete(
        &self,
        field_type: &TypeRef,
        parent_type: &str,
        field: &FieldSelection,
        value: &DbValue,
        state: &mut Completion,
    ) -> Result<JsonValue, NullBubble> {
        match field_type {
            TypeRef::NonNull(inner) => {
                let errors_before = state.errors.len();
                let completed = self.complete(inner, parent_type, field, value, state)?;
                if completed.is_null() {
                    if state.errors.len() == errors_before {
                        state.error(format!(
                            "Cannot return null for non-nullable field {parent_type}.{}.",
                            field.name(),
                        ));
                    }
                    return Err(NullBubble);
                }
                Ok(completed)
            },
            TypeRef::List(item_type) => {
                let items = match value {
                    DbValue::Null => return Ok(JsonValue::Null),
                    DbValue::List(items) => items,
                    _ => {
                        state.error(format!(
                            "Expected Iterable, but did not find one for field \"{parent_type}.{}\".",
                            field.name(),
                        ));
                        return Ok(JsonValue::Null);
                    },
                };
                let mut completed = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    state.path.push(idx.into());
                    let result = self.complete(item_type, parent_type, field, item, state);
                    state.path.pop();
                    match result {
                        Ok(item) => completed.push(item),
                        Err(NullBubble) => return Ok(JsonValue::Null),
                    }
                }
                Ok(JsonValue::Array(completed))
            },
            TypeRef::Named(type_name) => Ok(self.complete_named(type_name, field, value, state)),
        }
    }

    fn complete_named(&self, type_name: &str, field: &FieldSelection, value: &DbValue, state: &mut Completion) -> JsonValue {
        if value.is_null() {
            return JsonValue::Null;
        }
        let Some(generated) = self.surface.get(type_name) else {
            state.error(format!("Unknown type \"{type_name}\"."));
            return JsonValue::Null;
        };
        match generated.kind() {
            GeneratedTypeKind::Scalar | GeneratedTypeKind::Enum { .. } => self.complete_scalar(type_name, value, state),
            GeneratedTypeKind::Object { .. } | GeneratedTypeKind::Interface { .. } | GeneratedTypeKind::Union { .. } =>
                self.complete_object(generated, field, value, state).unwrap_or(JsonValue::Null),
            GeneratedTypeKind::InputObject => JsonValue::Null,
        }
    }

    fn complete_scalar(&self, type_name: &str, value: &DbValue, state: &mut Completion) -> JsonValue {
        let Some(kind) = ScalarKind::from_name(type_name, self.model.enums().keys()) else {
            return value.to_json();
        };
        if kind == ScalarKind::BigInt && value.as_map().is_some() {
            return match bigint_average(value) {
                Ok(average) => average,
                Err(message) => {
                    state.error(message);
                    JsonValue::Null
                },
            };
        }
        match serialize_output(&AttributeType::scalar(kind, true), value) {
            Ok(serialized) => serialized,
            Err(err) => {
                state.error(err.to_string());
                JsonValue::Null
            },
        }
    }

    fn complete_object(
        &self,
        generated: &GeneratedType,
        field: &FieldSelection,
        value: &DbValue,
        state: &mut Completion,
    ) -> Result<JsonValue, NullBubble> {
        let concrete_name = match generated.kind() {
            GeneratedTypeKind::Interface { .. } | GeneratedTypeKind::Union { .. } => {
                match value.get(RESOLVE_TYPE_KEY).and_then(DbValue::as_str) {
                    Some(name) => name,
                    None => {
                        state.error(format!(
                            "Abstract type \"{}\" must resolve to an Object type at runtime for field \"{}\".",
                            generated.name(),
                            field.name(),
                        ));
                        return Ok(JsonValue::Null);
                    },
                }
            },
            _ => generated.name(),
        };
        let Some(object) = self.surface.get(concrete_name) else {
            state.error(format!("Unknown type \"{concrete_name}\"."));
            return Ok(JsonValue::Null);
        };

        let prepared = match value {
            DbValue::Point(point) => Cow::Owned(DbValue::from_json(&point.to_graphql())),
            _ if object.field("pageInfo").is_some() && object.field("edges").is_some() =>
                Cow::Owned(with_cursors(field, value)),
            _ => Cow::Borrowed(value),
        };
        let keyed_by_response = self.model.concrete(concrete_name).is_some()
            || self.model.relationship_properties(concrete_name).is_some();

        let mut completed = JsonMap::new();
        let surface = self.surface;
        for child in field.fields_for(concrete_name, |condition, type_name| surface.type_applies(condition, type_name)) {
            let key = child.response_key();
            if completed.contains_key(key) {
                continue;
            }
            if child.name() == "__typename" {
                completed.insert(key.to_string(), JsonValue::String(concrete_name.to_string()));
                continue;
            }
            let Some(definition) = object.field(child.name()) else {
                completed.insert(key.to_string(), JsonValue::Null);
                continue;
            };
            let lookup = if keyed_by_response { key } else { child.name() };
            let child_value = prepared.get(lookup).unwrap_or(&DbValue::Null);
            state.path.push(key.into());
            let result = self.complete(definition.field_type(), concrete_name, child, child_value, state);
            state.path.pop();
            completed.insert(key.to_string(), result?);
        }
        Ok(JsonValue::Object(completed))
    }
}

/// The `{ sum, count }` pair of a BigInt aggregation as its exact mean.
fn bigint_average(value: &DbValue) -> Result<JsonValue, String> {
    let count = match value.get("count") {
        Some(DbValue::Integer(count)) => u64::try_from(*count).unwrap_or(0),
        _ => 0,
    };
    let sum = match value.get("sum") {
        Some(DbValue::Integer(sum)) => i128::from(*sum),
        Some(DbValue::String(sum)) => sum.parse::<i128>()
            .map_err(|_| format!("BigInt cannot represent non-integer value: \"{sum}\""))?,
        Some(DbValue::Null) | None => return Ok(JsonValue::Null),
        Some(other) => return Err(format!("BigInt cannot represent non-integer value: {}", other.to_json())),
    };
    Ok(exact_average(sum, count).map_or(JsonValue::Null, JsonValue::String))
}

/// Adds `cursor` to every edge and a computed `pageInfo` to a
/// `{ edges, totalCount }` connection value.
fn with_cursors(field: &FieldSelection, value: &DbValue) -> DbValue {
    let start = field.argument("after")
        .and_then(JsonValue::as_str)
        .and_then(cursor_to_offset)
        .map_or(0, |offset| offset + 1);
    let mut entries = value.as_map().cloned().unwrap_or_default();
    let edges = entries.get("edges").and_then(DbValue::as_list).cloned().unwrap_or_default();
    let total = entries.get("totalCount")
        .and_then(DbValue::as_i64)
        .and_then(|total| u64::try_from(total).ok())
        .unwrap_or(start + edges.len() as u64);

    let mut cursors = vec![];
    let edges = edges.into_iter()
        .enumerate()
        .map(|(idx, edge)| {
            let cursor = offset_to_cursor(start + idx as u64);
            cursors.push(cursor.clone());
            let mut edge = edge.as_map().cloned().unwrap_or_default();
            edge.insert("cursor".to_string(), DbValue::String(cursor));
            DbValue::Map(edge)
        })
        .collect::<Vec<_>>();

    let cursor_value = |cursor: Option<&String>| cursor.map_or(DbValue::Null, |cursor| DbValue::String(cursor.clone()));
    let page_info = IndexMap::from([
        ("hasNextPage".to_string(), DbValue::Boolean(start + (edges.len() as u64) < total)),
        ("hasPreviousPage".to_string(), DbValue::Boolean(start > 0)),
        ("startCursor".to_string(), cursor_value(cursors.first())),
        ("endCursor".to_string(), cursor_value(cursors.last())),
    ]);
    entries.insert("edges".to_string(), DbValue::List(edges));
    entries.insert("pageInfo".to_string(), DbValue::Map(page_info));
    DbValue::Map(entries)
}
