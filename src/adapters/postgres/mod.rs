//! PostgreSQL adapters.
//!
//! Repository implementations backed by sqlx connection pools.

mod invitation_repository;

pub use invitation_repository::PostgresInvitationRepository;
