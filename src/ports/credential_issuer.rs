//! CredentialIssuer port - mints activation tokens for invitees.
//!
//! An accepted invitation hands the invitee a token they use to set their
//! first credential. The invitation only becomes `successful` once that
//! credential change is observed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::invitation::ActivationToken;

/// Port for issuing activation (password-reset style) tokens.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Mint a fresh activation token for `invitee_id`.
    ///
    /// # Errors
    ///
    /// - `CredentialError` if the token cannot be issued
    async fn issue_activation_token(&self, invitee_id: &UserId)
        -> Result<ActivationToken, DomainError>;
}
