use crate::execution::QueryResult;
use crate::subscriptions::SubscriptionEvent;
use crate::value::DbValue;
use std::sync::Arc;
use tokio::sync::broadcast;

/// In-process fan-out of mutation events to subscriptions. Slow subscribers
/// that fall more than the channel capacity behind skip the missed events.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<Arc<SubscriptionEvent>>,
}
impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: SubscriptionEvent) {
        if self.sender.send(Arc::new(event)).is_err() {
            tracing::trace!("no active subscriptions");
        }
    }

    /// Publishes every event of the `__events` column of `result`; returns
    /// how many were read.
    pub fn publish_result(&self, result: &QueryResult) -> usize {
        let mut published = 0;
        for record in &result.records {
            let Some(DbValue::List(events)) = record.get("__events") else {
                continue;
            };
            for value in events {
                match SubscriptionEvent::from_db(value) {
                    Some(event) => {
                        self.publish(event);
                        published += 1;
                    },
                    None => tracing::warn!("dropping malformed event {}", value.to_json()),
                }
            }
        }
        published
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SubscriptionEvent>> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
