//! Invitation status state machine.
//!
//! An invitation starts `Pending` and ends in exactly one of the three
//! terminal states. Nothing leaves a terminal state.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting invitee action, not yet expired.
    Pending,

    /// Invitee changed their credential, confirming acceptance.
    Successful,

    /// Referring party withdrew the invitation while still pending.
    #[serde(alias = "canceled")]
    Cancelled,

    /// Expiry threshold elapsed without a credential change.
    Expired,
}

impl InvitationStatus {
    /// Every status, in declaration order.
    pub const ALL: [InvitationStatus; 4] = [
        InvitationStatus::Pending,
        InvitationStatus::Successful,
        InvitationStatus::Cancelled,
        InvitationStatus::Expired,
    ];

    /// Canonical storage and wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Successful => "successful",
            InvitationStatus::Cancelled => "cancelled",
            InvitationStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = ValidationError;

    /// Parses the canonical spelling; `canceled` is read as `Cancelled` so
    /// rows written by older deployments still load.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(InvitationStatus::Pending),
            "successful" => Ok(InvitationStatus::Successful),
            "cancelled" | "canceled" => Ok(InvitationStatus::Cancelled),
            "expired" => Ok(InvitationStatus::Expired),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown invitation status '{}'", other),
            )),
        }
    }
}

impl StateMachine for InvitationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InvitationStatus::*;
        matches!(
            (self, target),
            (Pending, Successful) | (Pending, Cancelled) | (Pending, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InvitationStatus::*;
        match self {
            Pending => vec![Successful, Cancelled, Expired],
            Successful | Cancelled | Expired => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_reaches_every_terminal_state() {
        for target in [
            InvitationStatus::Successful,
            InvitationStatus::Cancelled,
            InvitationStatus::Expired,
        ] {
            assert_eq!(InvitationStatus::Pending.transition_to(target), Ok(target));
        }
    }

    #[test]
    fn pending_cannot_stay_pending() {
        assert!(!InvitationStatus::Pending.can_transition_to(&InvitationStatus::Pending));
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        for status in [
            InvitationStatus::Successful,
            InvitationStatus::Cancelled,
            InvitationStatus::Expired,
        ] {
            assert!(status.is_terminal(), "{:?} should be terminal", status);
            for target in InvitationStatus::ALL {
                assert!(status.transition_to(target).is_err());
            }
        }
    }

    #[test]
    fn valid_transitions_are_consistent_with_can_transition_to() {
        for status in InvitationStatus::ALL {
            for target in InvitationStatus::ALL {
                assert_eq!(
                    status.can_transition_to(&target),
                    status.valid_transitions().contains(&target),
                    "{:?} -> {:?}",
                    status,
                    target
                );
            }
        }
    }

    #[test]
    fn parses_canonical_and_legacy_cancelled_spelling() {
        assert_eq!("cancelled".parse(), Ok(InvitationStatus::Cancelled));
        assert_eq!("canceled".parse(), Ok(InvitationStatus::Cancelled));
        assert_eq!("Pending".parse(), Ok(InvitationStatus::Pending));
    }

    #[test]
    fn rejects_unknown_status() {
        assert!("archived".parse::<InvitationStatus>().is_err());
    }

    #[test]
    fn serializes_with_canonical_spelling() {
        let json = serde_json::to_string(&InvitationStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");

        let legacy: InvitationStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(legacy, InvitationStatus::Cancelled);
    }

    #[test]
    fn display_matches_as_str() {
        for status in InvitationStatus::ALL {
            assert_eq!(status.to_string(), status.as_str());
        }
    }
}
