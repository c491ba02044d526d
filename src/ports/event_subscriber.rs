//! EventSubscriber port - Interface for reacting to invitation events.
//!
//! Listeners (welcome mails, referral credits, audit trails) register for
//! event types such as `"invitation.successful"`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing published events.
///
/// # Example
///
/// ```ignore
/// struct ReferralCredit { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for ReferralCredit {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let payload: InvitationEventPayload = event.payload_as()?;
///         // Credit payload.invitation.referral_user_id...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "ReferralCredit"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to multiple event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}
