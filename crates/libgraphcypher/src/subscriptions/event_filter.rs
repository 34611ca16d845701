use crate::authorization::AuthorizationOperation;
use crate::authorization::RuleEvaluator;
use crate::execution::GraphQLError;
use crate::execution::GraphQLResponse;
use crate::execution::GraphQLResponseStream;
use crate::operation::FieldSelection;
use crate::schema::ConcreteEntity;
use crate::schema::SchemaModel;
use crate::schema::generated::GeneratedSchema;
use crate::schema::naming::EntityNames;
use crate::shaper::ResultShaper;
use crate::subscriptions::EventBus;
use crate::subscriptions::EventKind;
use crate::subscriptions::SubscriptionEvent;
use crate::translate::TranslateError;
use crate::translate::memory_filter::FieldSource;
use crate::translate::memory_filter::MemoryFilter;
use crate::value::DbValue;
use futures::StreamExt;
use indexmap::IndexMap;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

/// Everything one subscription needs to turn broadcast events into
/// responses.
#[derive(Clone, Debug)]
pub struct EventFilter {
    field: FieldSelection,
    jwt: Option<JsonValue>,
    kind: EventKind,
    model: Arc<SchemaModel>,
    surface: Arc<GeneratedSchema>,
    type_name: String,
    where_: JsonValue,
}
impl EventFilter {
    /// Resolves a `<t>Created`, `<t>Updated` or `<t>Deleted` root field.
    /// Fails when the field is unknown, the caller may not subscribe or the
    /// `where` input is malformed.
    pub fn for_field(
        model: Arc<SchemaModel>,
        surface: Arc<GeneratedSchema>,
        field: &FieldSelection,
        jwt: Option<JsonValue>,
    ) -> Result<Self, TranslateError> {
        let (type_name, kind) = model.concrete_entities().values()
            .find_map(|entity| {
                let names = EntityNames::new(entity.name(), entity.plural());
                let kind = if field.name() == names.created_field() {
                    EventKind::Create
                } else if field.name() == names.updated_field() {
                    EventKind::Update
                } else if field.name() == names.deleted_field() {
                    EventKind::Delete
                } else {
                    return None;
                };
                Some((entity.name().to_string(), kind))
            })
            .ok_or_else(|| TranslateError::UnsupportedRootField {
                detail: "not a generated Subscription field".to_string(),
                field_name: field.name().to_string(),
            })?;

        let where_ = field.argument("where").cloned().unwrap_or(JsonValue::Null);
        if let Some(entity) = model.concrete(&type_name) {
            RuleEvaluator::new(&model, jwt.as_ref()).authenticate(entity, AuthorizationOperation::Subscribe)?;
            Self::memory_filter(entity).check(&where_)?;
        }
        Ok(Self {
            field: field.clone(),
            jwt,
            kind,
            model,
            surface,
            type_name,
            where_,
        })
    }

    fn memory_filter(entity: &ConcreteEntity) -> MemoryFilter<'_> {
        MemoryFilter::new(FieldSource::Attributes(entity.attributes()), format!("{}Subscription", entity.name()))
    }

    /// Node state keyed by field name, as the event payload type declares.
    fn payload(entity: &ConcreteEntity, state: &IndexMap<String, DbValue>) -> IndexMap<String, DbValue> {
        entity.attributes().values()
            .filter(|attr| !attr.is_computed())
            .map(|attr| (
                attr.name().to_string(),
                state.get(attr.db_name()).cloned().unwrap_or(DbValue::Null),
            ))
            .collect()
    }

    /// The response for `event`, or `None` when this subscription does not
    /// receive it.
    pub fn respond(&self, event: &SubscriptionEvent) -> Option<GraphQLResponse> {
        if event.kind != self.kind || event.type_name != self.type_name {
            return None;
        }
        let entity = self.model.concrete(&self.type_name)?;
        let current = Self::payload(entity, event.current_state()?);
        let current_json = DbValue::Map(current.clone()).to_json();

        match Self::memory_filter(entity).evaluate(&self.where_, &current_json) {
            Ok(true) => (),
            Ok(false) => return None,
            Err(err) => {
                tracing::warn!("subscription filter on `{}` failed: {err}", self.type_name);
                return None;
            },
        }
        if !RuleEvaluator::new(&self.model, self.jwt.as_ref()).allows_event(entity, &current_json) {
            return None;
        }

        let names = EntityNames::new(entity.name(), entity.plural());
        let mut value = IndexMap::from([
            ("event".to_string(), DbValue::String(self.kind.graphql_name().to_string())),
            ("timestamp".to_string(), DbValue::Float(event.timestamp)),
        ]);
        match self.kind {
            EventKind::Create => {
                value.insert(names.created_event_field(), DbValue::Map(current));
            },
            EventKind::Update => {
                let previous = event.old.as_ref()
                    .map(|old| DbValue::Map(Self::payload(entity, old)))
                    .unwrap_or(DbValue::Null);
                value.insert("previousState".to_string(), previous);
                value.insert(names.updated_event_field(), DbValue::Map(current));
            },
            EventKind::Delete => {
                value.insert(names.deleted_event_field(), DbValue::Map(current));
            },
        }

        let shaped = ResultShaper::new(&self.model, &self.surface)
            .shape("Subscription", &self.field, &DbValue::Map(value));
        let data = if shaped.nulls_parent {
            JsonValue::Null
        } else {
            let mut data = JsonMap::new();
            data.insert(self.field.response_key().to_string(), shaped.value);
            JsonValue::Object(data)
        };
        Some(GraphQLResponse {
            data: Some(data),
            errors: shaped.errors.into_iter().map(GraphQLError::from).collect(),
        })
    }

    /// Responses for every matching event published on `bus` from now on.
    pub fn into_stream(self, bus: &EventBus) -> GraphQLResponseStream {
        let stream = BroadcastStream::new(bus.subscribe()).filter_map(move |item| {
            let response = match item {
                Ok(event) => self.respond(&event),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!("subscription to `{}` lagged; {skipped} events skipped", self.type_name);
                    None
                },
            };
            futures::future::ready(response)
        });
        Box::pin(stream)
    }
}
