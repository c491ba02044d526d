//! PostgreSQL implementation of InvitationRepository.
//!
//! Stores invitations in `user_invitations`. Status transitions use a
//! version-checked `UPDATE` so two processes refreshing the same invitation
//! cannot both commit.

use crate::domain::foundation::{DomainError, ErrorCode, InvitationId, TeamId, Timestamp, UserId};
use crate::domain::invitation::{CredentialFingerprint, Invitation, InvitationStatus, InvitationToken};
use crate::ports::InvitationRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, token, status, referral_team_id, referral_user_id, invitee_id,
           old_password, created_at, updated_at, version
    FROM user_invitations
"#;

/// PostgreSQL implementation of the InvitationRepository port.
pub struct PostgresInvitationRepository {
    pool: PgPool,
}

impl PostgresInvitationRepository {
    /// Creates a new PostgresInvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_filtered(
        &self,
        column: &'static str,
        value: &str,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError> {
        let sql = format!(
            "{} WHERE {} = $1 AND ($2::text[] IS NULL OR status = ANY($2)) ORDER BY created_at DESC",
            SELECT_COLUMNS, column
        );

        let rows: Vec<InvitationRow> = sqlx::query_as(&sql)
            .bind(value)
            .bind(status.map(stored_spellings))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("Failed to list invitations", e))?;

        rows.into_iter().map(Invitation::try_from).collect()
    }
}

/// Every `status` column value that reads back as `status`.
///
/// Rows written before the spelling was fixed hold `canceled`.
fn stored_spellings(status: InvitationStatus) -> Vec<&'static str> {
    match status {
        InvitationStatus::Cancelled => vec!["cancelled", "canceled"],
        other => vec![other.as_str()],
    }
}

/// Database row representation of an invitation.
#[derive(Debug, sqlx::FromRow)]
struct InvitationRow {
    id: Uuid,
    token: Option<String>,
    status: String,
    referral_team_id: Option<String>,
    referral_user_id: Option<String>,
    invitee_id: String,
    old_password: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<InvitationRow> for Invitation {
    type Error = DomainError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        let status: InvitationStatus = row.status.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid status value: {}", e))
        })?;

        Ok(Invitation {
            id: InvitationId::from_uuid(row.id),
            token: row
                .token
                .filter(|t| !t.is_empty())
                .map(InvitationToken::new)
                .transpose()
                .map_err(|e| corrupt_row("token", e))?,
            status,
            referral_team_id: row
                .referral_team_id
                .map(TeamId::new)
                .transpose()
                .map_err(|e| corrupt_row("referral_team_id", e))?,
            referral_user_id: row
                .referral_user_id
                .map(UserId::new)
                .transpose()
                .map_err(|e| corrupt_row("referral_user_id", e))?,
            invitee_id: UserId::new(row.invitee_id).map_err(|e| corrupt_row("invitee_id", e))?,
            old_password: CredentialFingerprint::from_stored(row.old_password),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            version: row.version,
        })
    }
}

fn corrupt_row(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, err),
    )
}

fn database_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, err))
}

#[async_trait]
impl InvitationRepository for PostgresInvitationRepository {
    async fn save(&self, invitation: &Invitation) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_invitations (
                id, token, status, referral_team_id, referral_user_id, invitee_id,
                old_password, created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(invitation.id.as_uuid())
        .bind(invitation.token.as_ref().map(|t| t.as_str()))
        .bind(invitation.status.as_str())
        .bind(invitation.referral_team_id.as_ref().map(|t| t.as_str()))
        .bind(invitation.referral_user_id.as_ref().map(|u| u.as_str()))
        .bind(invitation.invitee_id.as_str())
        .bind(invitation.old_password.as_ref().map(|p| p.expose()))
        .bind(invitation.created_at.as_datetime())
        .bind(invitation.updated_at.as_datetime())
        .bind(invitation.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::validation("token", "Invitation already exists");
                }
            }
            database_error("Failed to save invitation", e)
        })?;

        Ok(())
    }

    async fn update(
        &self,
        invitation: &Invitation,
        expected_version: i64,
    ) -> Result<i64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_invitations SET
                token = $3,
                status = $4,
                old_password = $5,
                updated_at = $6,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(invitation.id.as_uuid())
        .bind(expected_version)
        .bind(invitation.token.as_ref().map(|t| t.as_str()))
        .bind(invitation.status.as_str())
        .bind(invitation.old_password.as_ref().map(|p| p.expose()))
        .bind(invitation.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to update invitation", e))?;

        if result.rows_affected() == 0 {
            // Distinguish a missing row from a stale version.
            let exists: Option<(i64,)> =
                sqlx::query_as("SELECT version FROM user_invitations WHERE id = $1")
                    .bind(invitation.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| database_error("Failed to update invitation", e))?;

            return Err(match exists {
                Some((current,)) => DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!(
                        "Invitation {} is at version {}, expected {}",
                        invitation.id, current, expected_version
                    ),
                ),
                None => DomainError::new(
                    ErrorCode::InvitationNotFound,
                    format!("Invitation {} not found", invitation.id),
                ),
            });
        }

        Ok(expected_version + 1)
    }

    async fn find_by_id(&self, id: &InvitationId) -> Result<Option<Invitation>, DomainError> {
        let sql = format!("{} WHERE id = $1", SELECT_COLUMNS);
        let row: Option<InvitationRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to find invitation", e))?;

        row.map(Invitation::try_from).transpose()
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, DomainError> {
        if token.is_empty() {
            return Ok(None);
        }

        let sql = format!("{} WHERE token = $1", SELECT_COLUMNS);
        let row: Option<InvitationRow> = sqlx::query_as(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to find invitation", e))?;

        row.map(Invitation::try_from).transpose()
    }

    async fn find_by_referral_team(
        &self,
        team_id: &TeamId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError> {
        self.fetch_filtered("referral_team_id", team_id.as_str(), status)
            .await
    }

    async fn find_by_referral_user(
        &self,
        user_id: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError> {
        self.fetch_filtered("referral_user_id", user_id.as_str(), status)
            .await
    }

    async fn find_by_invitee(
        &self,
        invitee_id: &UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, DomainError> {
        self.fetch_filtered("invitee_id", invitee_id.as_str(), status)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> InvitationRow {
        let now = Utc::now();
        InvitationRow {
            id: Uuid::new_v4(),
            token: Some("abc123".to_string()),
            status: status.to_string(),
            referral_team_id: Some("team-1".to_string()),
            referral_user_id: None,
            invitee_id: "invitee-1".to_string(),
            old_password: Some("$2y$10$hash".to_string()),
            created_at: now,
            updated_at: now,
            version: 3,
        }
    }

    #[test]
    fn row_converts_to_invitation() {
        let invitation = Invitation::try_from(row("pending")).unwrap();

        assert_eq!(invitation.status, InvitationStatus::Pending);
        assert_eq!(invitation.token.unwrap().as_str(), "abc123");
        assert_eq!(invitation.referral_team_id.unwrap().as_str(), "team-1");
        assert!(invitation.old_password.is_some());
        assert_eq!(invitation.version, 3);
    }

    #[test]
    fn legacy_canceled_spelling_is_read() {
        let invitation = Invitation::try_from(row("canceled")).unwrap();
        assert_eq!(invitation.status, InvitationStatus::Cancelled);
    }

    #[test]
    fn status_filter_covers_every_spelling_that_parses() {
        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Successful,
            InvitationStatus::Cancelled,
            InvitationStatus::Expired,
        ] {
            let spellings = stored_spellings(status);
            assert_eq!(spellings[0], status.as_str());
            for spelling in spellings {
                let read = Invitation::try_from(row(spelling)).unwrap();
                assert_eq!(read.status, status);
            }
        }
        assert_eq!(
            stored_spellings(InvitationStatus::Cancelled),
            vec!["cancelled", "canceled"]
        );
    }

    #[test]
    fn unknown_status_is_a_database_error() {
        let err = Invitation::try_from(row("archived")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn empty_token_and_snapshot_read_as_absent() {
        let mut raw = row("expired");
        raw.token = Some(String::new());
        raw.old_password = Some(String::new());

        let invitation = Invitation::try_from(raw).unwrap();

        assert!(invitation.token.is_none());
        assert!(invitation.old_password.is_none());
    }

    #[test]
    fn blank_invitee_is_rejected() {
        let mut raw = row("pending");
        raw.invitee_id = String::new();
        assert!(Invitation::try_from(raw).is_err());
    }
}
