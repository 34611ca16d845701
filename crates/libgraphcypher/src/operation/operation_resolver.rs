use crate::ast;
use crate::operation::FieldSelection;
use crate::operation::OperationError;
use crate::operation::OperationKind;
use crate::operation::ResolvedOperation;
use crate::schema::generated::GeneratedSchema;
use crate::schema::generated::GeneratedType;
use graphql_parser::query::Definition;
use graphql_parser::query::OperationDefinition;
use graphql_parser::query::Selection;
use graphql_parser::query::TypeCondition;
use graphql_parser::query::Value;
use indexmap::IndexMap;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, OperationError>;

struct OperationParts<'d> {
    kind: OperationKind,
    name: Option<String>,
    selection_set: &'d ast::query::SelectionSet,
    variables: &'d [ast::query::VariableDefinition],
}

/// Resolves executable documents against a [`GeneratedSchema`].
pub struct OperationResolver<'s> {
    surface: &'s GeneratedSchema,
}
impl<'s> OperationResolver<'s> {
    pub fn new(surface: &'s GeneratedSchema) -> Self {
        Self { surface }
    }

    pub fn resolve(
        &self,
        source: &str,
        operation_name: Option<&str>,
        variables: &JsonMap<String, JsonValue>,
    ) -> Result<ResolvedOperation> {
        let document = graphql_parser::query::parse_query::<String>(source)
            .map_err(|err| OperationError::ParseError(err.to_string()))?
            .into_static();
        self.resolve_document(&document, operation_name, variables)
    }

    pub fn resolve_document(
        &self,
        document: &ast::query::Document,
        operation_name: Option<&str>,
        variables: &JsonMap<String, JsonValue>,
    ) -> Result<ResolvedOperation> {
        let mut fragments = HashMap::new();
        let mut operations = vec![];
        for definition in &document.definitions {
            match definition {
                Definition::Fragment(fragment) => {
                    fragments.insert(fragment.name.as_str(), fragment);
                },
                Definition::Operation(operation) => operations.push(Self::operation_parts(operation)),
            }
        }

        let operation = match operation_name {
            Some(name) => operations.into_iter()
                .find(|operation| operation.name.as_deref() == Some(name))
                .ok_or_else(|| OperationError::UnknownOperation(name.to_string()))?,
            None => {
                if operations.len() > 1 {
                    return Err(OperationError::AmbiguousOperation);
                }
                operations.into_iter().next().ok_or(OperationError::NoOperation)?
            },
        };

        let root_type = self.surface.get(operation.kind.root_type_name())
            .ok_or_else(|| OperationError::UnsupportedOperationKind(
                operation.kind.root_type_name().to_lowercase(),
            ))?;
        let variables = Self::coerce_variables(operation.variables, variables)?;
        tracing::trace!(
            "resolving {:?} operation {:?} with {} variable(s)",
            operation.kind,
            operation.name,
            variables.values.len(),
        );

        let context = ResolveContext {
            fragments: &fragments,
            surface: self.surface,
            variables: &variables,
        };
        let mut grouped = IndexMap::new();
        context.collect(root_type, operation.selection_set, &mut grouped, &mut vec![])?;
        let root_fields = grouped.shift_remove(root_type.name()).unwrap_or_default();

        if operation.kind == OperationKind::Subscription && root_fields.len() != 1 {
            return Err(OperationError::SubscriptionFieldCount);
        }

        Ok(ResolvedOperation {
            kind: operation.kind,
            name: operation.name,
            root_fields,
        })
    }

    fn operation_parts(operation: &ast::query::OperationDefinition) -> OperationParts<'_> {
        match operation {
            OperationDefinition::SelectionSet(selection_set) => OperationParts {
                kind: OperationKind::Query,
                name: None,
                selection_set,
                variables: &[],
            },
            OperationDefinition::Query(query) => OperationParts {
                kind: OperationKind::Query,
                name: query.name.clone(),
                selection_set: &query.selection_set,
                variables: &query.variable_definitions,
            },
            OperationDefinition::Mutation(mutation) => OperationParts {
                kind: OperationKind::Mutation,
                name: mutation.name.clone(),
                selection_set: &mutation.selection_set,
                variables: &mutation.variable_definitions,
            },
            OperationDefinition::Subscription(subscription) => OperationParts {
                kind: OperationKind::Subscription,
                name: subscription.name.clone(),
                selection_set: &subscription.selection_set,
                variables: &subscription.variable_definitions,
            },
        }
    }

    fn coerce_variables(
        definitions: &[ast::query::VariableDefinition],
        provided: &JsonMap<String, JsonValue>,
    ) -> Result<Variables> {
        let mut variables = Variables::default();
        for definition in definitions {
            let name = definition.name.as_str();
            let non_null = matches!(definition.var_type, graphql_parser::query::Type::NonNullType(_));
            variables.defined.push(name.to_string());
            let value = match (provided.get(name), &definition.default_value) {
                (Some(JsonValue::Null), _) if non_null => return Err(OperationError::NullVariable {
                    name: name.to_string(),
                    var_type: definition.var_type.to_string(),
                }),
                (Some(value), _) => value.clone(),
                (None, Some(default)) => match const_value_to_json(default) {
                    Some(value) => value,
                    None => continue,
                },
                (None, None) if non_null => return Err(OperationError::MissingVariable {
                    name: name.to_string(),
                    var_type: definition.var_type.to_string(),
                }),
                (None, None) => continue,
            };
            variables.values.insert(name.to_string(), value);
        }
        Ok(variables)
    }
}

#[derive(Default)]
struct Variables {
    defined: Vec<String>,
    values: HashMap<String, JsonValue>,
}

/// Converts a literal without variables (a variable default).
fn const_value_to_json(value: &ast::query::Value) -> Option<JsonValue> {
    let empty = Variables::default();
    value_to_json(value, &empty).ok().flatten()
}

/// `Ok(None)` when the value is a variable that was defined but not
/// provided; such arguments are treated as absent.
fn value_to_json(value: &ast::query::Value, variables: &Variables) -> Result<Option<JsonValue>> {
    Ok(Some(match value {
        Value::Variable(name) => {
            if !variables.defined.iter().any(|defined| defined == name) {
                return Err(OperationError::UndefinedVariable { name: name.clone() });
            }
            return Ok(variables.values.get(name).cloned());
        },
        Value::Int(number) => number.as_i64().map(JsonValue::from).unwrap_or(JsonValue::Null),
        Value::Float(float) => serde_json::Number::from_f64(*float)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Null => JsonValue::Null,
        Value::Enum(name) => JsonValue::String(name.clone()),
        Value::List(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(value_to_json(item, variables)?.unwrap_or(JsonValue::Null));
            }
            JsonValue::Array(converted)
        },
        Value::Object(entries) => {
            let mut converted = JsonMap::new();
            for (key, item) in entries {
                if let Some(item) = value_to_json(item, variables)? {
                    converted.insert(key.clone(), item);
                }
            }
            JsonValue::Object(converted)
        },
    }))
}

struct ResolveContext<'a> {
    fragments: &'a HashMap<&'a str, &'a ast::query::FragmentDefinition>,
    surface: &'a GeneratedSchema,
    variables: &'a Variables,
}
impl ResolveContext<'_> {
    /// `@skip(if:)` and `@include(if:)`.
    fn included(&self, directives: &[ast::query::Directive]) -> Result<bool> {
        for directive in directives {
            let expected = match directive.name.as_str() {
                "skip" => false,
                "include" => true,
                _ => continue,
            };
            let condition = directive.arguments.iter()
                .find(|(name, _)| name == "if")
                .map(|(_, value)| value_to_json(value, self.variables))
                .transpose()?
                .flatten();
            if condition.and_then(|value| value.as_bool()) != Some(expected) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn fragment_type(&self, parent: &GeneratedType, condition: &str) -> Result<&GeneratedType> {
        let fragment_type = self.surface.get(condition)
            .ok_or_else(|| OperationError::UnknownType(condition.to_string()))?;
        let parent_types = parent.possible_types();
        let overlaps = fragment_type.possible_types().iter().any(|t| parent_types.contains(t));
        if !overlaps {
            return Err(OperationError::ImpossibleFragment {
                condition: condition.to_string(),
                parent_type: parent.name().to_string(),
            });
        }
        Ok(fragment_type)
    }

    /// Collects the fields of `selection_set` into `grouped`, keyed by the
    /// type condition they were selected under.
    fn collect(
        &self,
        parent: &GeneratedType,
        selection_set: &ast::query::SelectionSet,
        grouped: &mut IndexMap<String, Vec<FieldSelection>>,
        spreading: &mut Vec<String>,
    ) -> Result<()> {
        for selection in &selection_set.items {
            match selection {
                Selection::Field(field) => {
                    if !self.included(&field.directives)? {
                        continue;
                    }
                    let resolved = self.field(parent, field)?;
                    merge_field(grouped.entry(parent.name().to_string()).or_default(), resolved)?;
                },
                Selection::InlineFragment(fragment) => {
                    if !self.included(&fragment.directives)? {
                        continue;
                    }
                    let fragment_type = match &fragment.type_condition {
                        Some(TypeCondition::On(condition)) => self.fragment_type(parent, condition)?,
                        None => parent,
                    };
                    self.collect(fragment_type, &fragment.selection_set, grouped, spreading)?;
                },
                Selection::FragmentSpread(spread) => {
                    if !self.included(&spread.directives)? {
                        continue;
                    }
                    let name = spread.fragment_name.as_str();
                    if spreading.iter().any(|active| active == name) {
                        return Err(OperationError::FragmentCycle(name.to_string()));
                    }
                    let fragment = self.fragments.get(name)
                        .ok_or_else(|| OperationError::UnknownFragment(name.to_string()))?;
                    let TypeCondition::On(condition) = &fragment.type_condition;
                    let fragment_type = self.fragment_type(parent, condition)?;
                    spreading.push(name.to_string());
                    self.collect(fragment_type, &fragment.selection_set, grouped, spreading)?;
                    spreading.pop();
                },
            }
        }
        Ok(())
    }

    fn field(&self, parent: &GeneratedType, field: &ast::query::Field) -> Result<FieldSelection> {
        if field.name == "__typename" && field.selection_set.items.is_empty() {
            return Ok(FieldSelection {
                alias: field.alias.clone(),
                ..FieldSelection::new("__typename")
            });
        }

        let definition = parent.field(&field.name)
            .ok_or_else(|| OperationError::UnknownField {
                field_name: field.name.clone(),
                type_name: parent.name().to_string(),
            })?;

        let mut arguments = IndexMap::new();
        for (name, value) in &field.arguments {
            if definition.args().get(name).is_none() {
                return Err(OperationError::UnknownArgument {
                    argument: name.clone(),
                    field_name: field.name.clone(),
                    type_name: parent.name().to_string(),
                });
            }
            if let Some(value) = value_to_json(value, self.variables)? {
                arguments.insert(name.clone(), value);
            }
        }
        for (name, arg_type) in definition.args() {
            let missing = arguments.get(name).is_none_or(JsonValue::is_null);
            if !arg_type.is_nullable() && missing {
                return Err(OperationError::MissingArgument {
                    argument: name.clone(),
                    argument_type: arg_type.to_string(),
                    field_name: field.name.clone(),
                    type_name: parent.name().to_string(),
                });
            }
        }

        let field_type_name = definition.field_type().named();
        let field_type = self.surface.get(field_type_name)
            .ok_or_else(|| OperationError::UnknownType(field_type_name.to_string()))?;
        let mut fields_by_type = IndexMap::new();
        match (field_type.is_composite_output(), field.selection_set.items.is_empty()) {
            (true, true) => return Err(OperationError::MissingSelection {
                field_name: field.name.clone(),
                field_type: definition.field_type().to_string(),
            }),
            (false, false) => return Err(OperationError::UnexpectedSelection {
                field_name: field.name.clone(),
                field_type: definition.field_type().to_string(),
            }),
            (true, false) => self.collect(field_type, &field.selection_set, &mut fields_by_type, &mut vec![])?,
            (false, true) => (),
        }

        Ok(FieldSelection {
            alias: field.alias.clone(),
            arguments,
            fields_by_type,
            name: field.name.clone(),
        })
    }
}

/// Merges a field into a selection list, combining repeated selections of
/// the same response key.
fn merge_field(fields: &mut Vec<FieldSelection>, field: FieldSelection) -> Result<()> {
    let existing = fields.iter_mut().find(|existing| existing.response_key() == field.response_key());
    let Some(existing) = existing else {
        fields.push(field);
        return Ok(());
    };
    if existing.name != field.name || existing.arguments != field.arguments {
        return Err(OperationError::ConflictingFields {
            response_key: field.response_key().to_string(),
        });
    }
    for (type_name, children) in field.fields_by_type {
        let merged = existing.fields_by_type.entry(type_name).or_default();
        for child in children {
            merge_field(merged, child)?;
        }
    }
    Ok(())
}
