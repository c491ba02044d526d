//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the invitation domain and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `InvitationRepository` - Invitation persistence (store)
//! - `EventPublisher` - Event publication (notifier)
//! - `CredentialIssuer` - Activation token issuance
//! - `InviteeCredentials` - Live credential fingerprint of an invitee
//! - `Clock` - Wall-clock time
//!
//! ## Event Ports
//!
//! - `EventSubscriber` / `EventHandler` - Listeners for invitation events

mod clock;
mod credential_issuer;
mod event_publisher;
mod event_subscriber;
mod invitation_repository;
mod invitee_credentials;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credential_issuer::CredentialIssuer;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventHandler, EventSubscriber};
pub use invitation_repository::InvitationRepository;
pub use invitee_credentials::InviteeCredentials;
