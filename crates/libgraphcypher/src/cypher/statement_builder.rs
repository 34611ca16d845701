use crate::authorization::RuleEvaluator;
use crate::cypher::CypherEnv;
use crate::cypher::CypherStatement;
use crate::cypher::StatementKind;
use crate::cypher::emitter::Emitter;
use crate::operation::FieldSelection;
use crate::operation::OperationKind;
use crate::schema::ConcreteEntity;
use crate::schema::EntityRef;
use crate::schema::SchemaModel;
use crate::schema::generated::GeneratedSchema;
use crate::schema::naming::EntityNames;
use crate::translate::TranslateError;
use serde_json::Value as JsonValue;

type Result<T> = std::result::Result<T, TranslateError>;

/// What a root field does to which entity.
enum RootField<'m> {
    Aggregate(EntityRef),
    Connection(EntityRef),
    Create(&'m ConcreteEntity),
    Delete(&'m ConcreteEntity),
    Read(EntityRef),
    Update(&'m ConcreteEntity),
}

/// Compiles root fields into [`CypherStatement`]s for one request.
///
/// ```ignore
/// let builder = StatementBuilder::new(&model, &surface, jwt.as_ref());
/// for field in operation.root_fields() {
///     let statement = builder.build(field, operation.kind())?;
///     println!("{}", statement.cypher);
/// }
/// ```
#[derive(Clone, Copy)]
pub struct StatementBuilder<'a> {
    auth: RuleEvaluator<'a>,
    max_limit: Option<u64>,
    model: &'a SchemaModel,
    surface: &'a GeneratedSchema,
}
impl<'a> StatementBuilder<'a> {
    pub fn new(model: &'a SchemaModel, surface: &'a GeneratedSchema, jwt: Option<&'a JsonValue>) -> Self {
        Self {
            auth: RuleEvaluator::new(model, jwt),
            max_limit: None,
            model,
            surface,
        }
    }

    /// Caps every `limit` and `first` at `max_limit`.
    pub fn with_max_limit(mut self, max_limit: Option<u64>) -> Self {
        self.max_limit = max_limit;
        self
    }

    fn classify(&self, field: &FieldSelection, kind: OperationKind) -> Result<RootField<'a>> {
        let name = field.name();
        let unsupported = |detail: &str| TranslateError::UnsupportedRootField {
            detail: detail.to_string(),
            field_name: name.to_string(),
        };
        match kind {
            OperationKind::Subscription =>
                return Err(unsupported("subscriptions are served by the event bus")),
            OperationKind::Mutation => {
                for entity in self.model.concrete_entities().values() {
                    let names = EntityNames::new(entity.name(), entity.plural());
                    if name == names.create_field() {
                        return Ok(RootField::Create(entity));
                    }
                    if name == names.update_field() {
                        return Ok(RootField::Update(entity));
                    }
                    if name == names.delete_field() {
                        return Ok(RootField::Delete(entity));
                    }
                }
            },
            OperationKind::Query => {
                let concrete = self.model.concrete_entities().values()
                    .map(|entity| (EntityRef::Concrete(entity.name().to_string()), entity.plural(), true));
                let composites = self.model.composites().values()
                    .map(|composite| {
                        let entity_ref = if composite.is_interface() {
                            EntityRef::Interface(composite.name().to_string())
                        } else {
                            EntityRef::Union(composite.name().to_string())
                        };
                        (entity_ref, composite.plural(), composite.is_interface())
                    });
                for (entity_ref, plural, paged) in concrete.chain(composites) {
                    let names = EntityNames::new(entity_ref.name(), plural);
                    if name == names.read_field() {
                        return Ok(RootField::Read(entity_ref));
                    }
                    if paged && name == names.connection_field() {
                        return Ok(RootField::Connection(entity_ref));
                    }
                    if paged && name == names.aggregate_field() {
                        return Ok(RootField::Aggregate(entity_ref));
                    }
                }
            },
        }
        Err(unsupported(&format!("not a generated {} field", kind.root_type_name())))
    }

    /// One statement for one root field of an operation of `kind`.
    pub fn build(&self, field: &FieldSelection, kind: OperationKind) -> Result<CypherStatement> {
        let root = self.classify(field, kind)?;
        let mut emitter = Emitter {
            auth: self.auth,
            env: CypherEnv::new(),
            max_limit: self.max_limit,
            model: self.model,
            surface: self.surface,
        };
        let (clauses, kind) = match &root {
            RootField::Read(target) => (emitter.top_level_read(target, field)?, StatementKind::Read),
            RootField::Connection(target) => (emitter.top_level_connection(target, field)?, StatementKind::Connection),
            RootField::Aggregate(target) => (emitter.top_level_aggregate(target, field)?, StatementKind::Aggregate),
            RootField::Create(entity) => (emitter.top_level_create(entity, field)?, StatementKind::Create),
            RootField::Update(entity) => (emitter.top_level_update(entity, field)?, StatementKind::Update),
            RootField::Delete(entity) => (emitter.top_level_delete(entity, field)?, StatementKind::Delete),
        };

        let statement = CypherStatement {
            cypher: clauses.join("\n"),
            kind,
            params: emitter.env.into_params(),
        };
        tracing::debug!(
            "translated `{}`:\n{}\nparams: {}",
            field.response_key(),
            statement.cypher,
            statement.params_json(),
        );
        Ok(statement)
    }
}
