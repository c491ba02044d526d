//! Invitation handlers.
//!
//! ## Commands
//! - Creating an invitation for a prospective user
//! - Cancelling and accepting via `InvitationStateMachine`
//!
//! ## Queries
//! - Status checks (with lazy refresh) via `InvitationStateMachine`
//! - Lookups by token, referral team, referral user and invitee

mod create_invitation;
mod queries;
mod state_machine;

// Commands
pub use create_invitation::{CreateInvitationCommand, CreateInvitationHandler};

// Lifecycle
pub use state_machine::InvitationStateMachine;

// Queries
pub use queries::InvitationQueries;
