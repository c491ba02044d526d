//! InvitationQueries - read-side lookups.
//!
//! Lookups return invitations as stored. Callers that need a current status
//! pass the result through `InvitationStateMachine`.

use std::sync::Arc;

use crate::domain::foundation::{TeamId, UserId};
use crate::domain::invitation::{Invitation, InvitationError, InvitationStatus};
use crate::ports::InvitationRepository;

/// Query handler for invitations.
pub struct InvitationQueries {
    repository: Arc<dyn InvitationRepository>,
}

impl InvitationQueries {
    pub fn new(repository: Arc<dyn InvitationRepository>) -> Self {
        Self { repository }
    }

    /// Find the invitation carrying `token`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no invitation carries this token
    pub async fn get_by_token(&self, token: &str) -> Result<Invitation, InvitationError> {
        self.repository
            .find_by_token(token)
            .await?
            .ok_or_else(|| InvitationError::not_found("no invitation for the given token"))
    }

    /// Invitations sent by a team, newest first.
    pub async fn get_by_referral_team(
        &self,
        team_id: &TeamId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, InvitationError> {
        Ok(self
            .repository
            .find_by_referral_team(team_id, status)
            .await?)
    }

    /// Invitations sent by a user, newest first.
    pub async fn get_by_referral_user(
        &self,
        user_id: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, InvitationError> {
        Ok(self
            .repository
            .find_by_referral_user(user_id, status)
            .await?)
    }

    /// Invitations addressed to an invitee, newest first.
    pub async fn get_by_invitee(
        &self,
        invitee_id: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, InvitationError> {
        Ok(self.repository.find_by_invitee(invitee_id, status).await?)
    }
}
