//! Typed configuration loaded from the environment.
//!
//! Variables carry the `REFERRAL_INVITATIONS` prefix; nested keys are joined
//! with `__`.
//!
//! # Example
//!
//! ```no_run
//! use referral_invitations::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Invitations expire after {}h", config.invitation.expiry_hours);
//! ```

mod credentials;
mod database;
mod error;
mod invitation;
mod logging;

pub use credentials::CredentialConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use invitation::InvitationConfig;
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "REFERRAL_INVITATIONS";

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Invitation lifecycle (expiry threshold, event prefix)
    #[serde(default)]
    pub invitation: InvitationConfig,

    /// Activation token signing
    pub credentials: CredentialConfig,

    /// PostgreSQL store; absent when running on the in-memory store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Read `.env` (if present) and `REFERRAL_INVITATIONS__*` variables.
    ///
    /// `REFERRAL_INVITATIONS__INVITATION__EXPIRY_HOURS=72` sets
    /// `invitation.expiry_hours`. Only `credentials.activation_secret` is
    /// required; everything else has a default.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Check every section; the database section only when present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.invitation.validate()?;
        self.credentials.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }
}
