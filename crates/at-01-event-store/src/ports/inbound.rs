//! # Inbound Port (Driving Port)
//!
//! The public contract of the Event Store. Every operation completes
//! atomically with respect to other operations on the same instance.

use crate::domain::entities::{
    AppendOptions, AppendResult, IntegrityReport, ReadAllOptions, ReadOptions, StoredEvent,
};
use crate::domain::errors::EventStoreError;
use crate::service::SubscriptionId;
use shared_types::Event;
use std::sync::Arc;

/// Synchronous subscriber callback, invoked once per stored event, in
/// append order, after persistence.
pub type EventHandler = Arc<dyn Fn(&StoredEvent) + Send + Sync>;

/// The Event Store API.
pub trait EventStoreApi: Send + Sync {
    /// Append events to a stream under an optimistic-concurrency guard.
    fn append(
        &self,
        stream_id: &str,
        events: Vec<Event>,
        options: AppendOptions,
    ) -> Result<AppendResult, EventStoreError>;

    /// Read one stream.
    fn read(&self, stream_id: &str, options: ReadOptions)
        -> Result<Vec<StoredEvent>, EventStoreError>;

    /// Read the global log across all streams.
    fn read_all(&self, options: ReadAllOptions) -> Result<Vec<StoredEvent>, EventStoreError>;

    /// Subscribe to one stream.
    fn subscribe(&self, stream_id: &str, handler: EventHandler) -> SubscriptionId;

    /// Subscribe to every stream.
    fn subscribe_all(&self, handler: EventHandler) -> SubscriptionId;

    /// Remove a subscription. Idempotent.
    fn unsubscribe(&self, subscription: SubscriptionId);

    /// Whether the stream has at least one event.
    fn stream_exists(&self, stream_id: &str) -> bool;

    /// Current highest version of a stream (0 when absent).
    fn stream_version(&self, stream_id: &str) -> u64;

    /// Current highest global position (0 when empty).
    fn global_position(&self) -> u64;

    /// Walk the global log, recomputing every chain link.
    ///
    /// Idempotent and side-effect-free.
    fn verify_integrity(&self) -> IntegrityReport;
}
