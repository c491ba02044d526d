//! Invitation aggregate entity.
//!
//! The aggregate only knows how to move itself between states and what the
//! next lazy transition would be. Persisting the change and announcing it
//! is the job of `InvitationStateMachine` in the application layer.
//!
//! # Design Decisions
//!
//! - **Terminal states**: successful, cancelled and expired never change again
//! - **Soft end states**: invitations are never deleted
//! - **Cancel keeps the token**: only the credential snapshot is cleared on
//!   cancellation, unlike the successful and expired transitions
//! - **Versioned**: `version` backs the repository's conditional update

use crate::domain::foundation::{
    DomainError, ErrorCode, InvitationId, StateMachine, TeamId, Timestamp, UserId,
    ValidationError,
};
use serde::{Deserialize, Serialize};

use super::{CredentialFingerprint, InvitationStatus, InvitationToken};

/// Invitation aggregate - one referral sent to one prospective user.
///
/// # Invariants
///
/// - `status` only moves along `InvitationStatus` edges
/// - `old_password` is `None` whenever `status` is not pending
/// - `token` is `None` after the successful and expired transitions
/// - at least one of `referral_team_id` / `referral_user_id` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique identifier for this invitation.
    pub id: InvitationId,

    /// Lookup token sent to the invitee.
    pub token: Option<InvitationToken>,

    /// Current lifecycle status.
    pub status: InvitationStatus,

    /// Team that sent the invitation, if any.
    pub referral_team_id: Option<TeamId>,

    /// User that sent the invitation, if any.
    pub referral_user_id: Option<UserId>,

    /// Prospective user the invitation targets.
    pub invitee_id: UserId,

    /// Snapshot of the invitee's credential fingerprint at creation.
    #[serde(skip_serializing, default)]
    pub old_password: Option<CredentialFingerprint>,

    /// When the invitation was created; anchors expiry.
    pub created_at: Timestamp,

    /// When the invitation was last changed.
    pub updated_at: Timestamp,

    /// Optimistic concurrency counter, bumped by the repository on update.
    pub version: i64,
}

impl Invitation {
    /// Create a new pending invitation with a fresh token.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField("referral")` if neither a referral team nor a
    /// referral user is given.
    pub fn create(
        id: InvitationId,
        referral_team_id: Option<TeamId>,
        referral_user_id: Option<UserId>,
        invitee_id: UserId,
        old_password: Option<CredentialFingerprint>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if referral_team_id.is_none() && referral_user_id.is_none() {
            return Err(ValidationError::empty_field("referral"));
        }

        Ok(Self {
            id,
            token: Some(InvitationToken::generate()),
            status: InvitationStatus::Pending,
            referral_team_id,
            referral_user_id,
            invitee_id,
            old_password,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Whole hours elapsed since creation, as seen at `now`.
    pub fn age_in_hours(&self, now: Timestamp) -> u64 {
        now.whole_hours_since(&self.created_at)
    }

    /// True when the stored snapshot exists and differs from `current`.
    ///
    /// A cleared live credential differs from any snapshot. Without a
    /// snapshot there is nothing to compare, so it never counts.
    pub fn credential_changed(&self, current: Option<&CredentialFingerprint>) -> bool {
        match (&self.old_password, current) {
            (Some(snapshot), Some(live)) => !snapshot.matches(live),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// The transition a lazy refresh would apply, if any.
    ///
    /// Credential change wins over expiry. Non-pending invitations never
    /// produce a transition.
    pub fn due_transition(
        &self,
        current: Option<&CredentialFingerprint>,
        now: Timestamp,
        expiry_hours: u32,
    ) -> Option<InvitationStatus> {
        if !self.is_pending() {
            return None;
        }

        if self.credential_changed(current) {
            return Some(InvitationStatus::Successful);
        }

        if self.age_in_hours(now) >= u64::from(expiry_hours) {
            return Some(InvitationStatus::Expired);
        }

        None
    }

    /// Mark as successful: the invitee set a new credential.
    ///
    /// # Errors
    ///
    /// Returns error if the invitation is no longer pending.
    pub fn mark_successful(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(InvitationStatus::Successful)?;
        self.token = None;
        self.old_password = None;
        self.updated_at = now;
        Ok(())
    }

    /// Mark as expired.
    ///
    /// # Errors
    ///
    /// Returns error if the invitation is no longer pending.
    pub fn expire(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(InvitationStatus::Expired)?;
        self.token = None;
        self.old_password = None;
        self.updated_at = now;
        Ok(())
    }

    /// Cancel on behalf of the referring party. The token is left in place.
    ///
    /// # Errors
    ///
    /// Returns error if the invitation is no longer pending.
    pub fn cancel(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(InvitationStatus::Cancelled)?;
        self.old_password = None;
        self.updated_at = now;
        Ok(())
    }

    /// Apply one of the terminal transitions by target status.
    pub fn apply(&mut self, target: InvitationStatus, now: Timestamp) -> Result<(), DomainError> {
        match target {
            InvitationStatus::Successful => self.mark_successful(now),
            InvitationStatus::Expired => self.expire(now),
            InvitationStatus::Cancelled => self.cancel(now),
            InvitationStatus::Pending => Err(self.invalid_transition(target)),
        }
    }

    fn transition_to(&mut self, target: InvitationStatus) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| self.invalid_transition(target))?;
        Ok(())
    }

    fn invalid_transition(&self, target: InvitationStatus) -> DomainError {
        DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!(
                "Cannot transition invitation from {} to {}",
                self.status, target
            ),
        )
        .with_detail("invitation_id", self.id.to_string())
    }
}
