//! Activation token configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Minimum length of the HMAC signing secret, in bytes
const MIN_SECRET_LEN: usize = 32;

/// Activation token signing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    /// HMAC-SHA256 key used to sign activation tokens
    pub activation_secret: SecretString,

    /// Lifetime of an activation token in minutes
    #[serde(default = "default_activation_ttl")]
    pub activation_ttl_minutes: u32,
}

impl CredentialConfig {
    /// Validate credential configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.activation_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("CREDENTIALS__ACTIVATION_SECRET"));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(ValidationError::ActivationSecretTooShort);
        }
        if self.activation_ttl_minutes == 0 {
            return Err(ValidationError::InvalidActivationTtl);
        }
        Ok(())
    }
}

fn default_activation_ttl() -> u32 {
    60
}
