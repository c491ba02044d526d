//! HMAC-SHA256 activation tokens.
//!
//! Token format: `{invitee}.{expires_unix}.{nonce}.{hex(hmac)}` where the
//! MAC covers everything before the last dot. The invitee id may itself
//! contain dots, so parsing splits from the right.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::config::CredentialConfig;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::invitation::ActivationToken;
use crate::ports::{Clock, CredentialIssuer};

/// Issues and verifies signed activation tokens.
pub struct HmacCredentialIssuer {
    secret: SecretString,
    ttl_minutes: i64,
    clock: Arc<dyn Clock>,
}

impl HmacCredentialIssuer {
    pub fn new(config: &CredentialConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: config.activation_secret.clone(),
            ttl_minutes: i64::from(config.activation_ttl_minutes),
            clock,
        }
    }

    /// Verifies a token and returns the invitee it was issued for.
    ///
    /// # Errors
    ///
    /// - `CredentialError` if the token is malformed, forged or expired
    pub fn verify(&self, token: &str) -> Result<UserId, DomainError> {
        let mut parts = token.rsplitn(4, '.');
        let (Some(signature), Some(nonce), Some(expires), Some(invitee)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(rejected("malformed activation token"));
        };

        let signature =
            hex::decode(signature).map_err(|_| rejected("malformed activation token"))?;
        let expected = self.sign(&signed_part(invitee, expires, nonce))?;
        if !constant_time_compare(&expected, &signature) {
            return Err(rejected("activation token signature mismatch"));
        }

        let expires: u64 = expires
            .parse()
            .map_err(|_| rejected("malformed activation token"))?;
        if self.clock.now().as_unix_secs() >= expires {
            return Err(rejected("activation token expired"));
        }

        UserId::new(invitee).map_err(|_| rejected("malformed activation token"))
    }

    fn sign(&self, message: &str) -> Result<Vec<u8>, DomainError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| DomainError::new(ErrorCode::CredentialError, e.to_string()))?;
        mac.update(message.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[async_trait]
impl CredentialIssuer for HmacCredentialIssuer {
    async fn issue_activation_token(
        &self,
        invitee_id: &UserId,
    ) -> Result<ActivationToken, DomainError> {
        let expires = self
            .clock
            .now()
            .plus_minutes(self.ttl_minutes)
            .as_unix_secs()
            .to_string();
        let nonce = Uuid::new_v4().simple().to_string();
        let body = signed_part(invitee_id.as_str(), &expires, &nonce);
        let signature = hex::encode(self.sign(&body)?);

        tracing::debug!(invitee_id = %invitee_id, "Issued activation token");
        ActivationToken::new(format!("{}.{}", body, signature))
            .map_err(|e| DomainError::new(ErrorCode::CredentialError, e.to_string()))
    }
}

fn signed_part(invitee: &str, expires: &str, nonce: &str) -> String {
    format!("{}.{}.{}", invitee, expires, nonce)
}

fn rejected(reason: &str) -> DomainError {
    DomainError::new(ErrorCode::CredentialError, reason)
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
