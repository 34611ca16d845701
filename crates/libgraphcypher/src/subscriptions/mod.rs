//! Mutation events and the subscription streams fed by them.
//!
//! Write statements return their events in the `__events` column; the
//! engine publishes them on an [`EventBus`] and every subscription filters
//! the broadcast by type, event kind, `where` and SUBSCRIBE rules.

mod event_bus;
mod event_filter;
mod event_kind;
mod subscription_event;

pub use event_bus::EventBus;
pub use event_filter::EventFilter;
pub use event_kind::EventKind;
pub use subscription_event::SubscriptionEvent;

#[cfg(test)]
mod tests;
