//! Invitation domain events.
//!
//! Every lifecycle step publishes exactly one event named
//! `"{prefix}.{suffix}"`. The payload carries the suffix under `event` and
//! the full invitation (without its credential snapshot) under `invitation`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, Timestamp};

use super::{Invitation, InvitationStatus};

/// Aggregate type recorded on every invitation envelope.
pub const AGGREGATE_TYPE: &str = "Invitation";

/// Kind of invitation event, named by its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationEventKind {
    /// Referring party cancelled a pending invitation.
    Cancelled,

    /// Invitee accepted; an activation token was requested. Status unchanged.
    Accepted,

    /// Invitee changed their credential.
    Successful,

    /// Expiry threshold reached.
    Expired,
}

impl InvitationEventKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            InvitationEventKind::Cancelled => "cancelled",
            InvitationEventKind::Accepted => "accepted",
            InvitationEventKind::Successful => "successful",
            InvitationEventKind::Expired => "expired",
        }
    }

    /// Full event name under the configured prefix.
    pub fn event_type(&self, prefix: &str) -> String {
        format!("{}.{}", prefix, self.suffix())
    }

    /// Event announcing arrival in `status`; `None` for `Pending`.
    pub fn for_status(status: InvitationStatus) -> Option<Self> {
        match status {
            InvitationStatus::Pending => None,
            InvitationStatus::Successful => Some(InvitationEventKind::Successful),
            InvitationStatus::Cancelled => Some(InvitationEventKind::Cancelled),
            InvitationStatus::Expired => Some(InvitationEventKind::Expired),
        }
    }
}

impl fmt::Display for InvitationEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Body of an invitation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationEventPayload {
    /// Suffix key of the event.
    pub event: InvitationEventKind,

    /// Invitation as it stood right after the step.
    pub invitation: Invitation,
}

impl InvitationEventPayload {
    pub fn new(event: InvitationEventKind, invitation: &Invitation) -> Self {
        Self {
            event,
            invitation: invitation.clone(),
        }
    }

    /// Wrap into a transport envelope under the given prefix.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the payload cannot be serialized.
    pub fn into_envelope(
        self,
        prefix: &str,
        occurred_at: Timestamp,
    ) -> Result<EventEnvelope, DomainError> {
        let event_type = self.event.event_type(prefix);
        let aggregate_id = self.invitation.id.to_string();
        let payload = serde_json::to_value(&self).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize invitation event: {}", e),
            )
        })?;

        Ok(EventEnvelope::new(
            event_type,
            aggregate_id,
            AGGREGATE_TYPE,
            occurred_at,
            payload,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{InvitationId, UserId};
    use crate::domain::invitation::CredentialFingerprint;

    fn invitation() -> Invitation {
        Invitation::create(
            InvitationId::new(),
            None,
            Some(UserId::new("referrer").unwrap()),
            UserId::new("invitee").unwrap(),
            Some(CredentialFingerprint::new("secret-hash").unwrap()),
            Timestamp::from_unix_secs(1_700_000_000),
        )
        .unwrap()
    }

    #[test]
    fn event_type_joins_prefix_and_suffix() {
        assert_eq!(
            InvitationEventKind::Expired.event_type("sparkinvite"),
            "sparkinvite.expired"
        );
        assert_eq!(
            InvitationEventKind::Accepted.event_type("invitation"),
            "invitation.accepted"
        );
    }

    #[test]
    fn for_status_maps_terminal_states() {
        assert_eq!(InvitationEventKind::for_status(InvitationStatus::Pending), None);
        assert_eq!(
            InvitationEventKind::for_status(InvitationStatus::Cancelled),
            Some(InvitationEventKind::Cancelled)
        );
    }

    #[test]
    fn envelope_carries_suffix_and_invitation() {
        let invitation = invitation();
        let occurred_at = Timestamp::from_unix_secs(1_700_000_500);

        let envelope = InvitationEventPayload::new(InvitationEventKind::Cancelled, &invitation)
            .into_envelope("invitation", occurred_at)
            .unwrap();

        assert_eq!(envelope.event_type, "invitation.cancelled");
        assert_eq!(envelope.aggregate_id, invitation.id.to_string());
        assert_eq!(envelope.aggregate_type, AGGREGATE_TYPE);
        assert_eq!(envelope.occurred_at, occurred_at);
        assert_eq!(envelope.payload["event"], "cancelled");
        assert_eq!(envelope.payload["invitation"]["id"], invitation.id.to_string());
    }

    #[test]
    fn envelope_never_leaks_credential_snapshot() {
        let envelope = InvitationEventPayload::new(InvitationEventKind::Accepted, &invitation())
            .into_envelope("invitation", Timestamp::now())
            .unwrap();

        let raw = envelope.payload.to_string();
        assert!(!raw.contains("secret-hash"));
        assert!(!raw.contains("old_password"));
    }

    #[test]
    fn payload_reads_back_from_envelope() {
        let invitation = invitation();
        let envelope = InvitationEventPayload::new(InvitationEventKind::Expired, &invitation)
            .into_envelope("invitation", Timestamp::now())
            .unwrap();

        let payload: InvitationEventPayload = envelope.payload_as().unwrap();
        assert_eq!(payload.event, InvitationEventKind::Expired);
        assert_eq!(payload.invitation.id, invitation.id);
        assert!(payload.invitation.old_password.is_none());
    }
}
