//! CreateInvitationHandler - Command handler for sending a referral invitation.

use std::sync::Arc;

use crate::domain::foundation::{InvitationId, TeamId, UserId};
use crate::domain::invitation::{Invitation, InvitationError};
use crate::ports::{Clock, InvitationRepository, InviteeCredentials};

/// Command to invite a prospective user.
#[derive(Debug, Clone)]
pub struct CreateInvitationCommand {
    pub referral_team_id: Option<TeamId>,
    pub referral_user_id: Option<UserId>,
    pub invitee_id: UserId,
}

/// Handler for creating invitations.
///
/// Snapshots the invitee's current credential fingerprint so that a later
/// change can be recognised as the invitee completing sign-up.
pub struct CreateInvitationHandler {
    repository: Arc<dyn InvitationRepository>,
    invitee_credentials: Arc<dyn InviteeCredentials>,
    clock: Arc<dyn Clock>,
}

impl CreateInvitationHandler {
    pub fn new(
        repository: Arc<dyn InvitationRepository>,
        invitee_credentials: Arc<dyn InviteeCredentials>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            invitee_credentials,
            clock,
        }
    }

    pub async fn handle(&self, cmd: CreateInvitationCommand) -> Result<Invitation, InvitationError> {
        let snapshot = self
            .invitee_credentials
            .current_fingerprint(&cmd.invitee_id)
            .await?;

        let invitation = Invitation::create(
            InvitationId::new(),
            cmd.referral_team_id,
            cmd.referral_user_id,
            cmd.invitee_id,
            snapshot,
            self.clock.now(),
        )?;

        self.repository.save(&invitation).await?;

        tracing::info!(
            invitation_id = %invitation.id,
            invitee_id = %invitation.invitee_id,
            "Invitation created"
        );
        Ok(invitation)
    }
}
