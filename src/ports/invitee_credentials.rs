//! InviteeCredentials port - live view of an invitee's credential.
//!
//! The invitation compares this against the snapshot taken at creation to
//! notice that the invitee has set a new credential.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::invitation::CredentialFingerprint;

/// Read-only port onto the user store's credential column.
#[async_trait]
pub trait InviteeCredentials: Send + Sync {
    /// Current credential fingerprint of `invitee_id`.
    ///
    /// Returns `None` when the invitee has no credential set, which the
    /// invitation treats as a change from its snapshot. Report an invitee
    /// missing from the user store as an error instead.
    async fn current_fingerprint(
        &self,
        invitee_id: &UserId,
    ) -> Result<Option<CredentialFingerprint>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invitee_credentials_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn InviteeCredentials) {}
    }
}
