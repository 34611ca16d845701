use crate::execution::GraphQLError;
use crate::operation::FieldSelection;
use crate::schema::Attribute;
use crate::schema::CallbackContext;
use crate::schema::CallbackOutcome;
use crate::schema::CallbackRegistry;
use crate::schema::ConcreteEntity;
use crate::schema::EntityRef;
use crate::schema::PopulatedBy;
use crate::schema::Relationship;
use crate::schema::SchemaModel;
use crate::schema::WriteOperation;
use crate::schema::naming::EntityNames;
use crate::value::coerce_input;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value as JsonValue;

type Result<T> = std::result::Result<T, GraphQLError>;

fn items_mut(value: &mut JsonValue) -> Vec<&mut JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter_mut().collect(),
        JsonValue::Null => vec![],
        single => vec![single],
    }
}

/// `an Int`, `a String`, `a [Date!]`.
fn with_article(type_name: &str) -> String {
    let vowel = type_name.chars().next()
        .is_some_and(|first| matches!(first.to_ascii_uppercase(), 'A' | 'E' | 'I' | 'O' | 'U'));
    if vowel {
        format!("an {type_name}")
    } else {
        format!("a {type_name}")
    }
}

/// Runs `@populatedBy` callbacks over the input arguments of a mutation
/// root field before it is translated. A callback's value replaces the
/// field's input; `Clear` writes null and `Unset` leaves the stored value
/// alone.
pub(crate) struct PopulatedByRunner<'a> {
    callbacks: &'a CallbackRegistry,
    jwt: Option<&'a JsonValue>,
    model: &'a SchemaModel,
}
impl<'a> PopulatedByRunner<'a> {
    pub(crate) fn new(model: &'a SchemaModel, callbacks: &'a CallbackRegistry, jwt: Option<&'a JsonValue>) -> Self {
        Self {
            callbacks,
            jwt,
            model,
        }
    }

    pub(crate) async fn populate_field(&self, field: &FieldSelection) -> Result<FieldSelection> {
        let mut field = field.clone();
        for entity in self.model.concrete_entities().values() {
            let names = EntityNames::new(entity.name(), entity.plural());
            if field.name == names.create_field() {
                if let Some(input) = field.arguments.get_mut("input") {
                    for item in items_mut(input) {
                        self.populate_node(entity, item, WriteOperation::Create).await?;
                    }
                }
                break;
            }
            if field.name == names.update_field() {
                if let Some(update) = field.arguments.get_mut("update") {
                    self.populate_node(entity, update, WriteOperation::Update).await?;
                }
                if let Some(JsonValue::Object(creates)) = field.arguments.get_mut("create") {
                    for (field_name, nested) in creates.iter_mut() {
                        if let Some(rel) = entity.relationship(field_name) {
                            for item in items_mut(nested) {
                                if let Some(node) = item.get_mut("node") {
                                    self.populate_target(rel, node, WriteOperation::Create).await?;
                                }
                            }
                        }
                    }
                }
                break;
            }
        }
        Ok(field)
    }

    async fn run_callback(
        &self,
        entity: &ConcreteEntity,
        attr: &Attribute,
        populated: &PopulatedBy,
        parent: &JsonValue,
        operation: WriteOperation,
    ) -> Result<Option<JsonValue>> {
        let callback = self.callbacks.get(populated.callback()).ok_or_else(|| {
            GraphQLError::new(format!("PopulatedBy callback '{}' is not registered", populated.callback()))
                .with_code("INTERNAL_SERVER_ERROR")
        })?;
        let context = CallbackContext {
            field_name: attr.name().to_string(),
            jwt: self.jwt.cloned(),
            operation,
            type_name: entity.name().to_string(),
        };
        let outcome = callback.populate(parent, &context).await
            .map_err(|err| GraphQLError::new(err.to_string()).with_code("INTERNAL_SERVER_ERROR"))?;
        let value = match outcome {
            CallbackOutcome::Unset => return Ok(None),
            CallbackOutcome::Clear => JsonValue::Null,
            CallbackOutcome::Value(value) => value,
        };
        if let Err(err) = coerce_input(attr.attr_type(), &value, self.model.enums()) {
            tracing::debug!("callback `{}` returned {value}: {err}", populated.callback());
            return Err(GraphQLError::new(format!(
                "Expected populatedBy callback '{}' to return {} value",
                populated.callback(),
                with_article(&attr.attr_type().as_nullable().to_string()),
            )).with_code("INTERNAL_SERVER_ERROR"));
        }
        Ok(Some(value))
    }

    fn populate_node<'b>(
        &'b self,
        entity: &'b ConcreteEntity,
        input: &'b mut JsonValue,
        operation: WriteOperation,
    ) -> BoxFuture<'b, Result<()>> {
        async move {
            if !input.is_object() {
                return Ok(());
            }
            for attr in entity.attributes().values() {
                let Some(populated) = attr.populated_by().filter(|populated| populated.runs_on(operation)) else {
                    continue;
                };
                let outcome = self.run_callback(entity, attr, populated, &*input, operation).await?;
                if let JsonValue::Object(entries) = &mut *input {
                    match outcome {
                        Some(value) => {
                            entries.insert(attr.name().to_string(), value);
                        },
                        None => {
                            entries.remove(attr.name());
                        },
                    }
                }
            }

            for rel in entity.relationships().values() {
                if let Some(nested) = input.get_mut(rel.field_name()) {
                    self.populate_relationship(rel, nested).await?;
                }
            }
            Ok(())
        }.boxed()
    }

    /// Nested creates (`create`, `connectOrCreate.onCreate`) and updates
    /// under one relationship field.
    async fn populate_relationship(&self, rel: &Relationship, nested: &mut JsonValue) -> Result<()> {
        for item in items_mut(nested) {
            if let Some(creates) = item.get_mut("create") {
                for create in items_mut(creates) {
                    if let Some(node) = create.get_mut("node") {
                        self.populate_target(rel, node, WriteOperation::Create).await?;
                    }
                }
            }
            if let Some(connects) = item.get_mut("connectOrCreate") {
                for connect in items_mut(connects) {
                    if let Some(node) = connect.get_mut("onCreate").and_then(|on_create| on_create.get_mut("node")) {
                        self.populate_target(rel, node, WriteOperation::Create).await?;
                    }
                }
            }
            if let Some(node) = item.get_mut("update").and_then(|update| update.get_mut("node")) {
                self.populate_target(rel, node, WriteOperation::Update).await?;
            }
        }
        Ok(())
    }

    /// Interface targets key the node input by member type name.
    async fn populate_target(&self, rel: &Relationship, node: &mut JsonValue, operation: WriteOperation) -> Result<()> {
        match rel.target() {
            EntityRef::Concrete(name) => {
                if let Some(entity) = self.model.concrete(name) {
                    self.populate_node(entity, node, operation).await?;
                }
            },
            EntityRef::Interface(_) => {
                if let JsonValue::Object(members) = node {
                    for (member_name, input) in members.iter_mut() {
                        if let Some(member) = self.model.concrete(member_name) {
                            self.populate_node(member, input, operation).await?;
                        }
                    }
                }
            },
            EntityRef::Union(_) => (),
        }
        Ok(())
    }
}
