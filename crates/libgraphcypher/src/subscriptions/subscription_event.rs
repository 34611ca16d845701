use crate::subscriptions::EventKind;
use crate::value::DbValue;
use indexmap::IndexMap;

/// One node-level change. `old` and `new` hold node properties keyed by
/// database property name.
#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptionEvent {
    pub kind: EventKind,
    pub new: Option<IndexMap<String, DbValue>>,
    pub old: Option<IndexMap<String, DbValue>>,
    /// Milliseconds since the epoch.
    pub timestamp: f64,
    pub type_name: String,
}
impl SubscriptionEvent {
    /// Reads one entry of an `__events` column:
    /// `{ event, typename, new?, old?, timestamp }`.
    pub fn from_db(value: &DbValue) -> Option<Self> {
        let state = |key: &str| value.get(key).and_then(DbValue::as_map).cloned();
        Some(Self {
            kind: value.get("event").and_then(DbValue::as_str).and_then(EventKind::from_name)?,
            new: state("new"),
            old: state("old"),
            timestamp: value.get("timestamp").and_then(DbValue::as_f64).unwrap_or_default(),
            type_name: value.get("typename").and_then(DbValue::as_str)?.to_string(),
        })
    }

    /// The state subscribers filter on: the deleted node for deletes, the
    /// written node otherwise.
    pub fn current_state(&self) -> Option<&IndexMap<String, DbValue>> {
        match self.kind {
            EventKind::Delete => self.old.as_ref(),
            EventKind::Create | EventKind::Update => self.new.as_ref(),
        }
    }
}
