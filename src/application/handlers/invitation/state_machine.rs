//! InvitationStateMachine - drives an invitation through its lifecycle.
//!
//! Status is refreshed lazily: every status query first checks whether the
//! invitee changed their credential or the invitation aged past the expiry
//! threshold, and commits the resulting transition before answering.
//!
//! Each committed transition is persisted with a version check and then
//! announced with exactly one event. A failed write leaves the caller's
//! invitation untouched and publishes nothing. A failed publish is logged
//! and does not undo the write.

use std::sync::Arc;

use crate::config::InvitationConfig;
use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::invitation::{
    ActivationToken, Invitation, InvitationError, InvitationEventKind, InvitationEventPayload,
    InvitationStatus,
};
use crate::ports::{Clock, CredentialIssuer, EventPublisher, InvitationRepository, InviteeCredentials, SystemClock};

/// Lifecycle operations over a single invitation.
pub struct InvitationStateMachine {
    repository: Arc<dyn InvitationRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    credential_issuer: Arc<dyn CredentialIssuer>,
    invitee_credentials: Arc<dyn InviteeCredentials>,
    clock: Arc<dyn Clock>,
    config: InvitationConfig,
}

impl InvitationStateMachine {
    pub fn new(
        repository: Arc<dyn InvitationRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        credential_issuer: Arc<dyn CredentialIssuer>,
        invitee_credentials: Arc<dyn InviteeCredentials>,
        config: InvitationConfig,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            credential_issuer,
            invitee_credentials,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the wall clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &InvitationConfig {
        &self.config
    }

    /// Apply any transition that has become due.
    ///
    /// Credential change takes priority over expiry. Returns the status
    /// entered by this call, or `None` if nothing changed here. When another
    /// writer committed first, `invitation` is reloaded from the store and
    /// `None` is returned.
    ///
    /// # Errors
    ///
    /// - `Persistence` if the store write fails (invitation left unchanged)
    /// - `NotFound` if the invitation vanished from the store
    pub async fn evaluate(
        &self,
        invitation: &mut Invitation,
    ) -> Result<Option<InvitationStatus>, InvitationError> {
        if !invitation.is_pending() {
            return Ok(None);
        }

        // Without a snapshot there is nothing to compare against.
        let live = match invitation.old_password {
            Some(_) => {
                self.invitee_credentials
                    .current_fingerprint(&invitation.invitee_id)
                    .await?
            }
            None => None,
        };

        let now = self.clock.now();
        match invitation.due_transition(live.as_ref(), now, self.config.expiry_hours) {
            Some(target) => self.commit(invitation, target, now).await,
            None => Ok(None),
        }
    }

    /// Refresh, then compare the status against `candidate`.
    pub async fn is_status(
        &self,
        invitation: &mut Invitation,
        candidate: InvitationStatus,
    ) -> Result<bool, InvitationError> {
        self.evaluate(invitation).await?;
        Ok(invitation.status == candidate)
    }

    pub async fn is_pending(&self, invitation: &mut Invitation) -> Result<bool, InvitationError> {
        self.is_status(invitation, InvitationStatus::Pending).await
    }

    pub async fn is_successful(&self, invitation: &mut Invitation) -> Result<bool, InvitationError> {
        self.is_status(invitation, InvitationStatus::Successful).await
    }

    pub async fn is_cancelled(&self, invitation: &mut Invitation) -> Result<bool, InvitationError> {
        self.is_status(invitation, InvitationStatus::Cancelled).await
    }

    pub async fn is_expired(&self, invitation: &mut Invitation) -> Result<bool, InvitationError> {
        self.is_status(invitation, InvitationStatus::Expired).await
    }

    /// Cancel on behalf of the referring party.
    ///
    /// Returns `false` without error if the invitation has expired or is
    /// otherwise no longer pending.
    pub async fn cancel(&self, invitation: &mut Invitation) -> Result<bool, InvitationError> {
        if self.is_expired(invitation).await? {
            return Ok(false);
        }

        if !self.is_pending(invitation).await? {
            tracing::warn!(
                invitation_id = %invitation.id,
                invitee_id = %invitation.invitee_id,
                status = %invitation.status,
                "Attempted to cancel an invitation that is not pending"
            );
            return Ok(false);
        }

        let now = self.clock.now();
        let entered = self
            .commit(invitation, InvitationStatus::Cancelled, now)
            .await?;
        Ok(entered == Some(InvitationStatus::Cancelled))
    }

    /// Accept on behalf of the invitee and hand back an activation token.
    ///
    /// Status stays `pending`; it moves to `successful` once the invitee's
    /// new credential is observed. Returns `None` if the invitation has
    /// expired or is otherwise no longer pending.
    ///
    /// # Errors
    ///
    /// - `CredentialIssuance` if no token could be issued (the `accepted`
    ///   event has already been published at that point)
    pub async fn accept(
        &self,
        invitation: &mut Invitation,
    ) -> Result<Option<ActivationToken>, InvitationError> {
        if self.is_expired(invitation).await? {
            return Ok(None);
        }

        if !self.is_pending(invitation).await? {
            tracing::warn!(
                invitation_id = %invitation.id,
                invitee_id = %invitation.invitee_id,
                status = %invitation.status,
                "Attempted to accept an invitation that is not pending"
            );
            return Ok(None);
        }

        self.publish(InvitationEventKind::Accepted, invitation, self.clock.now())
            .await;

        let token = self
            .credential_issuer
            .issue_activation_token(&invitation.invitee_id)
            .await
            .map_err(|e| InvitationError::credential_issuance(e.message))?;

        Ok(Some(token))
    }

    async fn commit(
        &self,
        invitation: &mut Invitation,
        target: InvitationStatus,
        now: Timestamp,
    ) -> Result<Option<InvitationStatus>, InvitationError> {
        let mut next = invitation.clone();
        next.apply(target, now)?;

        match self.repository.update(&next, invitation.version).await {
            Ok(version) => next.version = version,
            Err(e) if e.code == ErrorCode::ConcurrencyConflict => {
                tracing::debug!(
                    invitation_id = %invitation.id,
                    target = %target,
                    "Invitation changed concurrently, reloading"
                );
                let stored = self
                    .repository
                    .find_by_id(&invitation.id)
                    .await?
                    .ok_or_else(|| InvitationError::not_found(invitation.id.to_string()))?;
                *invitation = stored;
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(
                    invitation_id = %invitation.id,
                    target = %target,
                    error = %e,
                    "Failed to persist invitation transition"
                );
                return Err(e.into());
            }
        }

        *invitation = next;
        tracing::info!(
            invitation_id = %invitation.id,
            invitee_id = %invitation.invitee_id,
            status = %target,
            "Invitation transitioned"
        );

        if let Some(kind) = InvitationEventKind::for_status(target) {
            self.publish(kind, invitation, now).await;
        }
        Ok(Some(target))
    }

    async fn publish(&self, kind: InvitationEventKind, invitation: &Invitation, now: Timestamp) {
        let envelope = match InvitationEventPayload::new(kind, invitation)
            .into_envelope(&self.config.event_prefix, now)
        {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(invitation_id = %invitation.id, event = %kind, error = %e, "Failed to build invitation event");
                return;
            }
        };

        if let Err(e) = self.event_publisher.publish(envelope).await {
            tracing::warn!(
                invitation_id = %invitation.id,
                event = %kind,
                error = %e,
                "Failed to publish invitation event"
            );
        }
    }
}
