//! # Subscriptions
//!
//! Synchronous subscriber registry. Handlers run once per event, in append
//! order, strictly after the batch is durable. A panicking handler is
//! contained; it can never roll back an append.

use crate::domain::entities::StoredEvent;
use crate::ports::inbound::EventHandler;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Opaque subscription handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

struct Subscription {
    id: u64,
    /// `None` subscribes to every stream.
    stream_filter: Option<String>,
    handler: EventHandler,
}

/// Registration-ordered subscriber set.
pub(crate) struct SubscriptionRegistry {
    next_id: u64,
    entries: Vec<Subscription>,
}

impl SubscriptionRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, stream_filter: Option<String>, handler: EventHandler) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Subscription {
            id,
            stream_filter,
            handler,
        });
        SubscriptionId(id)
    }

    /// Idempotent removal.
    pub(crate) fn remove(&mut self, subscription: SubscriptionId) {
        self.entries.retain(|entry| entry.id != subscription.0);
    }

    /// Handlers interested in the given stream, in registration order.
    pub(crate) fn handlers_for(&self, stream_id: &str) -> Vec<EventHandler> {
        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .stream_filter
                    .as_deref()
                    .map_or(true, |filter| filter == stream_id)
            })
            .map(|entry| entry.handler.clone())
            .collect()
    }
}

/// Invoke a handler, containing any panic so the append stands.
pub(crate) fn dispatch_contained(handler: &EventHandler, event: &StoredEvent) {
    let outcome = catch_unwind(AssertUnwindSafe(|| handler(event)));
    if outcome.is_err() {
        tracing::warn!(
            "[at-01] subscriber panicked on event at position {}; append unaffected",
            event.global_position
        );
    }
}
