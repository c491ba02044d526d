//! Invitation lifecycle configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Invitation lifecycle settings
#[derive(Debug, Clone, Deserialize)]
pub struct InvitationConfig {
    /// Whole hours after creation at which a pending invitation expires
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u32,

    /// Prefix for published event names (`{prefix}.{suffix}`)
    #[serde(default = "default_event_prefix")]
    pub event_prefix: String,
}

impl InvitationConfig {
    pub fn new(expiry_hours: u32, event_prefix: impl Into<String>) -> Self {
        Self {
            expiry_hours,
            event_prefix: event_prefix.into(),
        }
    }

    /// Validate invitation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.expiry_hours == 0 {
            return Err(ValidationError::InvalidExpiryHours);
        }
        if self.event_prefix.is_empty() || self.event_prefix.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidEventPrefix);
        }
        Ok(())
    }
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            expiry_hours: default_expiry_hours(),
            event_prefix: default_event_prefix(),
        }
    }
}

fn default_expiry_hours() -> u32 {
    48
}

fn default_event_prefix() -> String {
    "invitation".to_string()
}
