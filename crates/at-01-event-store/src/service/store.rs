//! # Event Store API Implementation
//!
//! Append, read, subscription, and integrity operations.

use super::subscriptions::dispatch_contained;
use super::{EventStore, SubscriptionId};
use crate::domain::entities::{
    AppendOptions, AppendResult, ExpectedVersion, IntegrityReport, IntegrityViolation,
    ReadAllOptions, ReadDirection, ReadOptions, StoredEvent,
};
use crate::domain::errors::EventStoreError;
use crate::domain::hash_chain::compute_self_hash;
use crate::ports::inbound::{EventHandler, EventStoreApi};
use crate::ports::outbound::EventLogBackend;
use shared_crypto::{canonical_json_string, to_canonical_value, GENESIS_HASH};
use shared_types::Event;
use std::sync::Arc;

impl<B: EventLogBackend> EventStoreApi for EventStore<B> {
    fn append(
        &self,
        stream_id: &str,
        events: Vec<Event>,
        options: AppendOptions,
    ) -> Result<AppendResult, EventStoreError> {
        if stream_id.is_empty() {
            return Err(EventStoreError::InvalidStreamId);
        }
        if events.is_empty() {
            return Err(EventStoreError::EmptyAppend {
                stream_id: stream_id.to_string(),
            });
        }

        let appended: Vec<Arc<StoredEvent>>;
        {
            let mut inner = self.inner.lock().expect("event store lock poisoned");

            let current_version = inner
                .streams
                .get(stream_id)
                .map(|indices| indices.len() as u64)
                .unwrap_or(0);
            check_expected_version(stream_id, current_version, options.expected_version)?;

            // Stage the whole batch before touching any state: versions,
            // positions, chain links, and the durable lines.
            let appended_at = self.clock.now_rfc3339();
            let mut staged = Vec::with_capacity(events.len());
            let mut lines = Vec::with_capacity(events.len());
            let mut prev_hash = inner.last_hash.clone();
            let base_position = inner.events.len() as u64;
            for (offset, event) in events.into_iter().enumerate() {
                let version = current_version + offset as u64 + 1;
                let global_position = base_position + offset as u64 + 1;
                let (prev, this) = if self.config.hash_chain {
                    let this = compute_self_hash(
                        &prev_hash,
                        stream_id,
                        version,
                        global_position,
                        &event,
                    )?;
                    (Some(prev_hash.clone()), Some(this))
                } else {
                    (None, None)
                };
                let stored = StoredEvent {
                    event,
                    stream_id: stream_id.to_string(),
                    version,
                    global_position,
                    appended_at: appended_at.clone(),
                    prev_hash: prev,
                    self_hash: this.clone(),
                };
                if let Some(hash) = this {
                    prev_hash = hash;
                }
                lines.push(canonical_json_string(&to_canonical_value(&stored)?)?);
                staged.push(Arc::new(stored));
            }

            // Durability precedes visibility: a failed write leaves the
            // in-memory index exactly as it was.
            self.backend.append_batch(&lines)?;

            {
                let stream_indices = inner.streams.entry(stream_id.to_string()).or_default();
                for offset in 0..staged.len() {
                    stream_indices.push(base_position as usize + offset);
                }
            }
            inner.events.extend(staged.iter().cloned());
            inner.last_hash = prev_hash;
            appended = staged;
        }

        let count = appended.len() as u64;
        let from_version = appended.first().map(|e| e.version).unwrap_or(0);
        let to_version = appended.last().map(|e| e.version).unwrap_or(0);
        tracing::debug!(
            "[at-01] appended {} event(s) to {:?} (v{}..v{})",
            count,
            stream_id,
            from_version,
            to_version
        );

        // Dispatch outside the lock, after durability, in append order.
        for stored in &appended {
            let handlers = {
                let registry = self.subscriptions.lock().expect("subscriptions lock poisoned");
                registry.handlers_for(&stored.stream_id)
            };
            for handler in handlers {
                dispatch_contained(&handler, stored);
            }
        }

        Ok(AppendResult {
            stream_id: stream_id.to_string(),
            from_version,
            to_version,
            count,
        })
    }

    fn read(
        &self,
        stream_id: &str,
        options: ReadOptions,
    ) -> Result<Vec<StoredEvent>, EventStoreError> {
        if options.from_version < 1 {
            return Err(EventStoreError::InvalidVersion {
                requested: options.from_version,
            });
        }
        let inner = self.inner.lock().expect("event store lock poisoned");
        let indices = match inner.streams.get(stream_id) {
            Some(indices) => indices,
            None => return Ok(Vec::new()),
        };
        let selected: Vec<StoredEvent> = match options.direction {
            ReadDirection::Forward => indices
                .iter()
                .skip(options.from_version as usize - 1)
                .map(|&i| (*inner.events[i]).clone())
                .take(options.max_count.unwrap_or(usize::MAX))
                .collect(),
            ReadDirection::Backward => indices
                .iter()
                .take(options.from_version.min(indices.len() as u64) as usize)
                .rev()
                .map(|&i| (*inner.events[i]).clone())
                .take(options.max_count.unwrap_or(usize::MAX))
                .collect(),
        };
        Ok(selected)
    }

    fn read_all(&self, options: ReadAllOptions) -> Result<Vec<StoredEvent>, EventStoreError> {
        if options.from_position < 1 {
            return Err(EventStoreError::InvalidVersion {
                requested: options.from_position,
            });
        }
        let inner = self.inner.lock().expect("event store lock poisoned");
        let events = &inner.events;
        let selected: Vec<StoredEvent> = match options.direction {
            ReadDirection::Forward => events
                .iter()
                .skip(options.from_position as usize - 1)
                .map(|e| (**e).clone())
                .take(options.max_count.unwrap_or(usize::MAX))
                .collect(),
            ReadDirection::Backward => events
                .iter()
                .take(options.from_position.min(events.len() as u64) as usize)
                .rev()
                .map(|e| (**e).clone())
                .take(options.max_count.unwrap_or(usize::MAX))
                .collect(),
        };
        Ok(selected)
    }

    fn subscribe(&self, stream_id: &str, handler: EventHandler) -> SubscriptionId {
        self.subscriptions
            .lock()
            .expect("subscriptions lock poisoned")
            .add(Some(stream_id.to_string()), handler)
    }

    fn subscribe_all(&self, handler: EventHandler) -> SubscriptionId {
        self.subscriptions
            .lock()
            .expect("subscriptions lock poisoned")
            .add(None, handler)
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        self.subscriptions
            .lock()
            .expect("subscriptions lock poisoned")
            .remove(subscription);
    }

    fn stream_exists(&self, stream_id: &str) -> bool {
        self.inner
            .lock()
            .expect("event store lock poisoned")
            .streams
            .contains_key(stream_id)
    }

    fn stream_version(&self, stream_id: &str) -> u64 {
        self.inner
            .lock()
            .expect("event store lock poisoned")
            .streams
            .get(stream_id)
            .map(|indices| indices.len() as u64)
            .unwrap_or(0)
    }

    fn global_position(&self) -> u64 {
        self.inner.lock().expect("event store lock poisoned").events.len() as u64
    }

    fn verify_integrity(&self) -> IntegrityReport {
        let inner = self.inner.lock().expect("event store lock poisoned");
        let mut errors: Vec<IntegrityViolation> = Vec::new();
        let mut last_verified = 0u64;
        let mut prev_hash = GENESIS_HASH.to_string();
        let mut stream_versions: std::collections::HashMap<&str, u64> =
            std::collections::HashMap::new();

        for (i, stored) in inner.events.iter().enumerate() {
            let expected_position = i as u64 + 1;
            let mut ok = true;

            if stored.global_position != expected_position {
                ok = false;
                errors.push(IntegrityViolation {
                    global_position: expected_position,
                    detail: format!(
                        "global position gap: expected {}, found {}",
                        expected_position, stored.global_position
                    ),
                });
            }

            let expected_version = stream_versions
                .get(stored.stream_id.as_str())
                .copied()
                .unwrap_or(0)
                + 1;
            if stored.version != expected_version {
                ok = false;
                errors.push(IntegrityViolation {
                    global_position: stored.global_position,
                    detail: format!(
                        "stream {:?} version gap: expected {}, found {}",
                        stored.stream_id, expected_version, stored.version
                    ),
                });
            }
            stream_versions.insert(stored.stream_id.as_str(), stored.version.max(expected_version));

            if self.config.hash_chain {
                if stored.prev_hash.as_deref() != Some(prev_hash.as_str()) {
                    ok = false;
                    errors.push(IntegrityViolation {
                        global_position: stored.global_position,
                        detail: format!(
                            "broken prev link at position {}: expected {}, found {:?}",
                            stored.global_position, prev_hash, stored.prev_hash
                        ),
                    });
                }
                match compute_self_hash(
                    stored.prev_hash.as_deref().unwrap_or(GENESIS_HASH),
                    &stored.stream_id,
                    stored.version,
                    stored.global_position,
                    &stored.event,
                ) {
                    Ok(recomputed) => {
                        if stored.self_hash.as_deref() != Some(recomputed.as_str()) {
                            ok = false;
                            errors.push(IntegrityViolation {
                                global_position: stored.global_position,
                                detail: format!(
                                    "self hash mismatch at position {}: recomputed {}, stored {:?}",
                                    stored.global_position, recomputed, stored.self_hash
                                ),
                            });
                        }
                        // The walk continues from the recorded hash so one
                        // corrupt record reports once, not N times.
                        prev_hash = stored
                            .self_hash
                            .clone()
                            .unwrap_or(recomputed);
                    }
                    Err(err) => {
                        ok = false;
                        errors.push(IntegrityViolation {
                            global_position: stored.global_position,
                            detail: format!("unhashable event: {err}"),
                        });
                    }
                }
            }

            if ok && errors.is_empty() {
                last_verified = expected_position;
            }
        }

        IntegrityReport {
            valid: errors.is_empty(),
            last_verified_position: if errors.is_empty() {
                inner.events.len() as u64
            } else {
                last_verified
            },
            errors,
        }
    }
}

fn check_expected_version(
    stream_id: &str,
    actual: u64,
    expected: ExpectedVersion,
) -> Result<(), EventStoreError> {
    let conflict = |expected: String| EventStoreError::ConcurrencyConflict {
        stream_id: stream_id.to_string(),
        expected,
        actual,
    };
    match expected {
        ExpectedVersion::Any => Ok(()),
        ExpectedVersion::NoStream => {
            if actual == 0 {
                Ok(())
            } else {
                Err(conflict("no_stream".to_string()))
            }
        }
        ExpectedVersion::Exact(version) => {
            if actual == version {
                Ok(())
            } else {
                Err(conflict(version.to_string()))
            }
        }
    }
}
