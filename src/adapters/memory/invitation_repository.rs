//! In-memory implementation of InvitationRepository.
//!
//! Backs tests and local runs. Honours the same contract as the
//! PostgreSQL adapter: newest-first ordering and version-checked updates.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, InvitationId, TeamId, UserId};
use crate::domain::invitation::{Invitation, InvitationStatus};
use crate::ports::InvitationRepository;

/// In-memory invitation store keyed by invitation id.
#[derive(Default)]
pub struct InMemoryInvitationRepository {
    invitations: RwLock<HashMap<InvitationId, Invitation>>,
}

impl InMemoryInvitationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored invitations.
    pub fn len(&self) -> usize {
        self.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<InvitationId, Invitation>>, DomainError> {
        self.invitations
            .read()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "invitation store lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<InvitationId, Invitation>>, DomainError> {
        self.invitations
            .write()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "invitation store lock poisoned"))
    }

    fn select<F>(&self, status: Option<InvitationStatus>, predicate: F) -> Result<Vec<Invitation>, DomainError>
    where
        F: Fn(&Invitation) -> bool,
    {
        let map = self.read()?;
        let mut found: Vec<Invitation> = map
            .values()
            .filter(|inv| predicate(*inv))
            .filter(|inv| status.map_or(true, |s| inv.status == s))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

#[async_trait]
impl InvitationRepository for InMemoryInvitationRepository {
    async fn save(&self, invitation: &Invitation) -> Result<(), DomainError> {
        let mut map = self.write()?;
        if map.contains_key(&invitation.id) {
            return Err(DomainError::validation("id", "Invitation already exists"));
        }
        if let Some(token) = &invitation.token {
            if map.values().any(|inv| inv.token.as_ref() == Some(token)) {
                return Err(DomainError::validation("token", "Token already in use"));
            }
        }
        map.insert(invitation.id, invitation.clone());
        Ok(())
    }

    async fn update(
        &self,
        invitation: &Invitation,
        expected_version: i64,
    ) -> Result<i64, DomainError> {
        let mut map = self.write()?;
        let stored = map.get_mut(&invitation.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::InvitationNotFound,
                format!("Invitation {} not found", invitation.id),
            )
        })?;

        if stored.version != expected_version {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!(
                    "Invitation {} is at version {}, expected {}",
                    invitation.id, stored.version, expected_version
                ),
            ));
        }

        let mut next = invitation.clone();
        next.version = expected_version + 1;
        *stored = next;
        Ok(expected_version + 1)
    }

    async fn find_by_id(&self, id: &InvitationId) -> Result<Option<Invitation>, DomainError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, DomainError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self
            .read()?
            .values()
            .find(|inv| inv.token.as_ref().map(|t| t.as_str()) == Some(token))
            .cloned())
    }

    async fn find_by_referral_team(
        &self,
        team_id: &TeamId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError> {
        self.select(status, |inv| inv.referral_team_id.as_ref() == Some(team_id))
    }

    async fn find_by_referral_user(
        &self,
        user_id: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError> {
        self.select(status, |inv| inv.referral_user_id.as_ref() == Some(user_id))
    }

    async fn find_by_invitee(
        &self,
        invitee_id: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError> {
        self.select(status, |inv| &inv.invitee_id == invitee_id)
    }
}
