//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod invitation;

pub use invitation::{
    CreateInvitationCommand, CreateInvitationHandler, InvitationQueries, InvitationStateMachine,
};
