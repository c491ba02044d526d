//! In-memory persistence adapters.

mod invitation_repository;

pub use invitation_repository::InMemoryInvitationRepository;
