//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, events)
//! - `invitation` - Referral invitation lifecycle

pub mod foundation;
pub mod invitation;
