use crate::cypher::CypherStatement;
use crate::cypher::StatementBuilder;
use crate::execution::AccessMode;
use crate::execution::EngineConfig;
use crate::execution::ExecutionError;
use crate::execution::Executor;
use crate::execution::GraphQLError;
use crate::execution::GraphQLRequest;
use crate::execution::GraphQLResponse;
use crate::execution::GraphQLResponseStream;
use crate::execution::RequestContext;
use crate::execution::error_mapping;
use crate::execution::populated_by_runner::PopulatedByRunner;
use crate::operation::FieldSelection;
use crate::operation::OperationKind;
use crate::operation::OperationResolver;
use crate::operation::ResolvedOperation;
use crate::schema::CallbackRegistry;
use crate::schema::PopulatedByCallback;
use crate::schema::SchemaBuilder;
use crate::schema::SchemaModel;
use crate::schema::generated::GeneratedSchema;
use crate::shaper::ResultShaper;
use crate::shaper::ShapedField;
use crate::subscriptions::EventBus;
use crate::subscriptions::EventFilter;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

/// Collects type definitions, callbacks and settings for a [`GraphCypher`].
#[derive(Debug)]
pub struct GraphCypherBuilder {
    callbacks: CallbackRegistry,
    config: EngineConfig,
    schema: SchemaBuilder,
}
impl GraphCypherBuilder {
    pub fn new() -> Self {
        Self {
            callbacks: CallbackRegistry::new(),
            config: EngineConfig::default(),
            schema: SchemaBuilder::new(),
        }
    }

    pub fn type_defs(mut self, type_defs: &str) -> Result<Self, ExecutionError> {
        self.schema = self.schema.load_str(None, type_defs)?;
        Ok(self)
    }

    pub fn type_defs_file(mut self, file_path: impl AsRef<Path>) -> Result<Self, ExecutionError> {
        self.schema = self.schema.load_file(file_path)?;
        Ok(self)
    }

    pub fn type_defs_files<P: AsRef<Path>>(
        mut self,
        file_paths: impl IntoIterator<Item = P>,
    ) -> Result<Self, ExecutionError> {
        self.schema = self.schema.load_files(file_paths)?;
        Ok(self)
    }

    /// Registers a `@populatedBy` callback under `name`.
    pub fn callback(mut self, name: impl Into<String>, callback: impl PopulatedByCallback + 'static) -> Self {
        self.callbacks.register(name, callback);
        self
    }

    pub fn callbacks(mut self, callbacks: CallbackRegistry) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<GraphCypher, ExecutionError> {
        let model = self.schema.with_callbacks(&self.callbacks).build()?;
        let surface = GeneratedSchema::from_model(&model);
        tracing::debug!(
            "built schema with {} node types and {} abstract types",
            model.concrete_entities().len(),
            model.composites().len(),
        );
        let events = self.config.subscriptions.then(|| EventBus::new(self.config.event_buffer));
        Ok(GraphCypher {
            callbacks: Arc::new(self.callbacks),
            config: Arc::new(self.config),
            events,
            model: Arc::new(model),
            surface: Arc::new(surface),
        })
    }
}
impl Default for GraphCypherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The engine: a compiled schema plus the settings and callbacks requests
/// run with. Cheap to clone; clones share the event bus.
///
/// ```ignore
/// let engine = GraphCypher::builder()
///     .type_defs("type Movie @node { title: String! }")?
///     .build()?;
/// let response = engine.execute(
///     &executor,
///     &GraphQLRequest::new("{ movies { title } }"),
///     &RequestContext::anonymous(),
/// ).await;
/// ```
#[derive(Clone, Debug)]
pub struct GraphCypher {
    callbacks: Arc<CallbackRegistry>,
    config: Arc<EngineConfig>,
    events: Option<EventBus>,
    model: Arc<SchemaModel>,
    surface: Arc<GeneratedSchema>,
}
impl GraphCypher {
    pub fn builder() -> GraphCypherBuilder {
        GraphCypherBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// `None` when subscriptions are disabled.
    pub fn events(&self) -> Option<&EventBus> {
        self.events.as_ref()
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    pub fn surface(&self) -> &GeneratedSchema {
        &self.surface
    }

    /// The generated schema as SDL.
    pub fn schema_sdl(&self) -> String {
        self.surface.describe()
    }

    fn resolve(&self, request: &GraphQLRequest) -> Result<ResolvedOperation, GraphQLError> {
        OperationResolver::new(&self.surface)
            .resolve(&request.query, request.operation_name.as_deref(), &request.variables)
            .map_err(|err| error_mapping::operation_error(&err))
    }

    fn statement_builder<'a>(&'a self, context: &'a RequestContext) -> StatementBuilder<'a> {
        StatementBuilder::new(&self.model, &self.surface, context.jwt())
            .with_max_limit(self.config.max_limit)
    }

    /// The statements a query or mutation would run, without running
    /// `@populatedBy` callbacks.
    pub fn translate(
        &self,
        request: &GraphQLRequest,
        context: &RequestContext,
    ) -> Result<Vec<CypherStatement>, GraphQLError> {
        let operation = self.resolve(request)?;
        let builder = self.statement_builder(context);
        operation.root_fields().iter()
            .filter(|field| field.name() != "__typename")
            .map(|field| builder.build(field, operation.kind())
                .map_err(|err| error_mapping::translate_error(&err, field.response_key())))
            .collect()
    }

    /// Runs a query or mutation. Root fields run one after another, each
    /// as its own statement; the first failing root field nulls `data`.
    pub async fn execute(
        &self,
        executor: &dyn Executor,
        request: &GraphQLRequest,
        context: &RequestContext,
    ) -> GraphQLResponse {
        let operation = match self.resolve(request) {
            Ok(operation) => operation,
            Err(error) => return GraphQLResponse::error(error),
        };
        if operation.kind() == OperationKind::Subscription {
            return GraphQLResponse::error(
                GraphQLError::new("Subscription operations must be started with subscribe").with_code("BAD_REQUEST"),
            );
        }

        let root_type = operation.kind().root_type_name();
        let mut data = JsonMap::new();
        let mut errors = vec![];
        for field in operation.root_fields() {
            let key = field.response_key();
            if field.name() == "__typename" {
                data.insert(key.to_string(), JsonValue::String(root_type.to_string()));
                continue;
            }
            match self.execute_field(executor, context, operation.kind(), field).await {
                Ok(shaped) => {
                    errors.extend(shaped.errors.into_iter().map(GraphQLError::from));
                    if shaped.nulls_parent {
                        return GraphQLResponse {
                            data: Some(JsonValue::Null),
                            errors,
                        };
                    }
                    data.insert(key.to_string(), shaped.value);
                },
                Err(error) => {
                    tracing::debug!("root field `{key}` failed: {}", error.message);
                    errors.push(error);
                    return GraphQLResponse {
                        data: Some(JsonValue::Null),
                        errors,
                    };
                },
            }
        }
        GraphQLResponse {
            data: Some(JsonValue::Object(data)),
            errors,
        }
    }

    async fn execute_field(
        &self,
        executor: &dyn Executor,
        context: &RequestContext,
        kind: OperationKind,
        field: &FieldSelection,
    ) -> Result<ShapedField, GraphQLError> {
        let key = field.response_key();
        let field = if kind == OperationKind::Mutation {
            let runner = PopulatedByRunner::new(&self.model, &self.callbacks, context.jwt());
            let populated = runner.populate_field(field).await
                .map_err(|error| error.with_path(vec![key.into()]))?;
            Cow::Owned(populated)
        } else {
            Cow::Borrowed(field)
        };

        let statement = self.statement_builder(context)
            .build(&field, kind)
            .map_err(|err| error_mapping::translate_error(&err, key))?;
        let result = executor.run(&statement, AccessMode::for_statement(statement.kind)).await
            .map_err(|err| error_mapping::executor_error(&err, key))?;

        if statement.kind.is_write() {
            if let Some(events) = &self.events {
                let published = events.publish_result(&result);
                tracing::debug!("published {published} events for `{key}`");
            }
        }

        let root_type = kind.root_type_name();
        let shaper = ResultShaper::new(&self.model, &self.surface);
        let value = shaper.statement_value(root_type, &field, statement.kind, &result);
        Ok(shaper.shape(root_type, &field, &value))
    }

    /// Starts a subscription. Fails with an error response when the
    /// operation is not a valid subscription or subscriptions are disabled.
    pub fn subscribe(
        &self,
        request: &GraphQLRequest,
        context: &RequestContext,
    ) -> Result<GraphQLResponseStream, GraphQLResponse> {
        let operation = self.resolve(request).map_err(GraphQLResponse::error)?;
        if operation.kind() != OperationKind::Subscription {
            return Err(GraphQLResponse::error(
                GraphQLError::new("Only subscription operations can be subscribed to").with_code("BAD_REQUEST"),
            ));
        }
        let Some(events) = &self.events else {
            return Err(GraphQLResponse::error(
                GraphQLError::new("Subscriptions are disabled").with_code("BAD_REQUEST"),
            ));
        };
        let [field] = operation.root_fields() else {
            return Err(GraphQLResponse::error(
                GraphQLError::new("Subscription operations must select exactly one top level field.")
                    .with_code("GRAPHQL_VALIDATION_FAILED"),
            ));
        };

        let filter = EventFilter::for_field(
            Arc::clone(&self.model),
            Arc::clone(&self.surface),
            field,
            context.jwt().cloned(),
        ).map_err(|err| GraphQLResponse::error(error_mapping::translate_error(&err, field.response_key())))?;
        tracing::debug!("subscription to `{}` started", field.name());
        Ok(filter.into_stream(events))
    }
}
