//! Invitation repository port.
//!
//! Defines the contract for persisting and retrieving Invitation aggregates.
//!
//! # Design
//!
//! - **Conditional update**: `update` only succeeds when the stored version
//!   still equals the version the caller read, so two racing refreshes of
//!   the same invitation cannot both commit a terminal transition
//! - **Newest first**: every list query orders by `created_at` descending
//! - **No deletes**: invitations end in a terminal status, never removed
//!
//! # Example
//!
//! ```ignore
//! let pending = repo
//!     .find_by_referral_team(&team_id, Some(InvitationStatus::Pending))
//!     .await?;
//! ```

use crate::domain::foundation::{DomainError, InvitationId, TeamId, UserId};
use crate::domain::invitation::{Invitation, InvitationStatus};
use async_trait::async_trait;

/// Repository port for Invitation persistence.
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Insert a new invitation.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if an invitation with the same id or token exists
    /// - `DatabaseError` on persistence failure
    async fn save(&self, invitation: &Invitation) -> Result<(), DomainError>;

    /// Overwrite an existing invitation if its stored version equals
    /// `expected_version`. Returns the new version.
    ///
    /// # Errors
    ///
    /// - `InvitationNotFound` if the invitation doesn't exist
    /// - `ConcurrencyConflict` if the stored version moved
    /// - `DatabaseError` on persistence failure
    async fn update(
        &self,
        invitation: &Invitation,
        expected_version: i64,
    ) -> Result<i64, DomainError>;

    /// Find an invitation by its ID.
    async fn find_by_id(&self, id: &InvitationId) -> Result<Option<Invitation>, DomainError>;

    /// Find the invitation currently holding `token`.
    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, DomainError>;

    /// Invitations sent by a team, optionally filtered by status, newest first.
    async fn find_by_referral_team(
        &self,
        team_id: &TeamId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError>;

    /// Invitations sent by a user, optionally filtered by status, newest first.
    async fn find_by_referral_user(
        &self,
        user_id: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError>;

    /// Invitations addressed to an invitee, optionally filtered by status,
    /// newest first.
    async fn find_by_invitee(
        &self,
        invitee_id: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError>;
}
