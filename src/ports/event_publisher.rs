//! EventPublisher port - Interface for publishing domain events.
//!
//! This port is the invitation core's notifier. The core treats it as
//! fire-and-forget: a failed publish is logged, never surfaced.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations may deliver synchronously or hand off to a queue.
///
/// # Example
///
/// ```ignore
/// let envelope = payload.into_envelope("invitation", clock.now())?;
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events in order, stopping at the first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
