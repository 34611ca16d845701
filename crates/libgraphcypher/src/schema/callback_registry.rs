use crate::schema::WriteOperation;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// The result of a `@populatedBy` callback.
///
/// `Unset` leaves the stored value untouched (nothing is written), `Clear`
/// explicitly writes `null`.
#[derive(Clone, Debug, PartialEq)]
pub enum CallbackOutcome {
    Clear,
    Unset,
    Value(JsonValue),
}

/// What a callback is told about the write it is populating.
#[derive(Clone, Debug, PartialEq)]
pub struct CallbackContext {
    pub field_name: String,
    pub jwt: Option<JsonValue>,
    pub operation: WriteOperation,
    pub type_name: String,
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("PopulatedBy callback '{callback}' failed: {message}")]
pub struct CallbackError {
    pub callback: String,
    pub message: String,
}
impl CallbackError {
    pub fn new(callback: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            callback: callback.into(),
            message: message.into(),
        }
    }
}

/// A host function that computes a field value at create/update time.
/// `parent` is the input object of the node being written.
#[async_trait]
pub trait PopulatedByCallback: Send + Sync {
    async fn populate(
        &self,
        parent: &JsonValue,
        context: &CallbackContext,
    ) -> Result<CallbackOutcome, CallbackError>;
}

struct FnCallback<F>(F);

#[async_trait]
impl<F, Fut> PopulatedByCallback for FnCallback<F>
where
    F: Fn(JsonValue, CallbackContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<CallbackOutcome, CallbackError>> + Send,
{
    async fn populate(
        &self,
        parent: &JsonValue,
        context: &CallbackContext,
    ) -> Result<CallbackOutcome, CallbackError> {
        (self.0)(parent.clone(), context.clone()).await
    }
}

/// Named callbacks available to `@populatedBy`.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    callbacks: HashMap<String, Arc<dyn PopulatedByCallback>>,
}
impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PopulatedByCallback>> {
        self.callbacks.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.callbacks.keys().map(String::as_str)
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        callback: impl PopulatedByCallback + 'static,
    ) {
        self.callbacks.insert(name.into(), Arc::new(callback));
    }

    /// Registers an async closure as a callback.
    pub fn register_fn<F, Fut>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(JsonValue, CallbackContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallbackOutcome, CallbackError>> + Send + 'static,
    {
        self.callbacks.insert(name.into(), Arc::new(FnCallback(callback)));
    }
}
impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.callbacks.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &names)
            .finish()
    }
}
