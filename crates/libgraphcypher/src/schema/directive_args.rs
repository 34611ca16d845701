//! Reading directive annotations off the schema AST.

use crate::ast;
use serde_json::Map;
use serde_json::Value as JsonValue;

pub(crate) fn find<'a>(
    directives: &'a [ast::schema::Directive],
    name: &str,
) -> Option<&'a ast::schema::Directive> {
    directives.iter().find(|directive| directive.name == name)
}

pub(crate) fn has(directives: &[ast::schema::Directive], name: &str) -> bool {
    find(directives, name).is_some()
}

/// Converts a constant AST value into JSON. Enum values become strings;
/// variables cannot appear in type definitions and are rejected.
pub(crate) fn value_to_json(value: &ast::schema::Value) -> Result<JsonValue, String> {
    use graphql_parser::schema::Value;

    Ok(match value {
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Enum(name) => JsonValue::String(name.clone()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .ok_or_else(|| format!("`{f}` is not a finite number"))?,
        Value::Int(number) => number.as_i64()
            .map(JsonValue::from)
            .ok_or_else(|| "integer literal out of range".to_string())?,
        Value::List(items) => JsonValue::Array(
            items.iter().map(value_to_json).collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Null => JsonValue::Null,
        Value::Object(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key.clone(), value_to_json(value)?);
            }
            JsonValue::Object(map)
        },
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Variable(name) => return Err(format!("unexpected variable `${name}`")),
    })
}

/// All arguments of a directive as one JSON object.
pub(crate) fn arguments(directive: &ast::schema::Directive) -> Result<JsonValue, String> {
    let mut map = Map::new();
    for (name, value) in &directive.arguments {
        map.insert(name.clone(), value_to_json(value)?);
    }
    Ok(JsonValue::Object(map))
}

pub(crate) fn string_arg(
    directive: &ast::schema::Directive,
    name: &str,
) -> Result<Option<String>, String> {
    match arguments(directive)?.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(format!(
            "argument `{name}` of @{} must be a string, found `{other}`",
            directive.name,
        )),
    }
}

pub(crate) fn bool_arg(
    directive: &ast::schema::Directive,
    name: &str,
) -> Result<Option<bool>, String> {
    match arguments(directive)?.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(value)) => Ok(Some(*value)),
        Some(other) => Err(format!(
            "argument `{name}` of @{} must be a boolean, found `{other}`",
            directive.name,
        )),
    }
}

pub(crate) fn uint_arg(
    directive: &ast::schema::Directive,
    name: &str,
) -> Result<Option<u64>, String> {
    match arguments(directive)?.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => value.as_u64()
            .filter(|n| *n > 0)
            .map(Some)
            .ok_or_else(|| format!(
                "argument `{name}` of @{} must be a positive integer, found `{value}`",
                directive.name,
            )),
    }
}

/// A list argument of enum values or strings. A single value is accepted in
/// place of a one-element list.
pub(crate) fn name_list_arg(
    directive: &ast::schema::Directive,
    name: &str,
) -> Result<Option<Vec<String>>, String> {
    let invalid = |value: &JsonValue| format!(
        "argument `{name}` of @{} must be a list of names, found `{value}`",
        directive.name,
    );
    match arguments(directive)?.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(single)) => Ok(Some(vec![single.clone()])),
        Some(JsonValue::Array(items)) => items.iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(item)))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(invalid(other)),
    }
}

/// [`find`] over directives gathered from a definition and its extensions.
pub(crate) fn find_any<'a>(
    directives: &[&'a ast::schema::Directive],
    name: &str,
) -> Option<&'a ast::schema::Directive> {
    directives.iter().copied().find(|directive| directive.name == name)
}

pub(crate) fn has_any(directives: &[&ast::schema::Directive], name: &str) -> bool {
    find_any(directives, name).is_some()
}
