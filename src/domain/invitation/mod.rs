//! Invitation domain module.
//!
//! Referral invitations and their lifecycle.
//!
//! # Module Structure
//!
//! - `aggregate` - Invitation entity and its transitions
//! - `status` - InvitationStatus state machine
//! - `credentials` - Tokens and credential fingerprints
//! - `events` - Event kinds and payloads
//! - `errors` - InvitationError

mod aggregate;
mod credentials;
mod errors;
mod events;
mod status;

pub use aggregate::Invitation;
pub use credentials::{ActivationToken, CredentialFingerprint, InvitationToken};
pub use errors::InvitationError;
pub use events::{InvitationEventKind, InvitationEventPayload, AGGREGATE_TYPE};
pub use status::InvitationStatus;
