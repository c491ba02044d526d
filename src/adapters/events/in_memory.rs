//! In-memory event bus for single-process deployments and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

type HandlerMap = HashMap<String, Vec<Arc<dyn EventHandler>>>;

/// Process-local event bus.
///
/// Handlers run inline, in subscription order, on the publishing task.
/// Every envelope is retained until `clear` so callers can inspect what
/// a flow announced.
pub struct InMemoryEventBus {
    handlers: RwLock<HandlerMap>,
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(Vec::new()),
        }
    }

    /// Everything published so far, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published_read().clone()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.matching(|e| e.event_type == event_type)
    }

    /// Events announced for one invitation.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.matching(|e| e.aggregate_id == aggregate_id)
    }

    pub fn event_count(&self) -> usize {
        self.published_read().len()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.published_read()
            .iter()
            .any(|e| e.event_type == event_type)
    }

    pub fn clear(&self) {
        self.published_write().clear();
    }

    fn matching<F>(&self, predicate: F) -> Vec<EventEnvelope>
    where
        F: Fn(&EventEnvelope) -> bool,
    {
        self.published_read()
            .iter()
            .filter(|e| predicate(*e))
            .cloned()
            .collect()
    }

    fn handlers_for(&self, event_type: &str) -> Vec<Arc<dyn EventHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }

    // A panicking handler must not hide what was already published.
    fn published_read(&self) -> RwLockReadGuard<'_, Vec<EventEnvelope>> {
        self.published.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn published_write(&self) -> RwLockWriteGuard<'_, Vec<EventEnvelope>> {
        self.published.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn handlers_write(&self) -> RwLockWriteGuard<'_, HandlerMap> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    /// Records the event, then runs every subscribed handler even if an
    /// earlier one fails. Handler failures are reported together.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.published_write().push(event.clone());

        let mut failed = Vec::new();
        for handler in self.handlers_for(&event.event_type) {
            if let Err(e) = handler.handle(event.clone()).await {
                tracing::warn!(
                    handler = handler.name(),
                    event_type = %event.event_type,
                    event_id = %event.event_id,
                    error = %e,
                    "Event handler failed"
                );
                failed.push(format!("{}: {}", handler.name(), e));
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::EventPublishFailed,
                format!("Handler errors: {}", failed.join(", ")),
            ))
        }
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        self.subscribe_all(&[event_type], handler);
    }

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers_write();
        for event_type in event_types {
            handlers
                .entry((*event_type).to_string())
                .or_default()
                .push(Arc::clone(&handler));
        }
    }
}
