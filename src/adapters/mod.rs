//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `credentials` - Activation token issuance (HMAC)
//! - `events` - Event bus implementations (in-memory)
//! - `memory` - In-memory invitation store
//! - `postgres` - PostgreSQL invitation store

pub mod credentials;
pub mod events;
pub mod memory;
pub mod postgres;

pub use credentials::HmacCredentialIssuer;
pub use events::InMemoryEventBus;
pub use memory::InMemoryInvitationRepository;
pub use postgres::PostgresInvitationRepository;
