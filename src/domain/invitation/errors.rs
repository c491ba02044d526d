//! Invitation-specific error types.
//!
//! Refused lifecycle requests (cancel/accept on a non-pending invitation)
//! are not errors: they come back as `false`/`None` with a warning log.
//! The variants here cover lookups, bad input and collaborator failures.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Invitation-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvitationError {
    /// No invitation matched the lookup.
    #[error("Invitation not found: {0}")]
    NotFound(String),

    /// Input failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Stored invitation changed since it was read.
    #[error("Invitation was modified concurrently: {0}")]
    ConcurrencyConflict(String),

    /// Domain rule rejected a transition.
    #[error("Invalid state transition: {0}")]
    InvalidState(String),

    /// Store read or write failed; nothing was published.
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Activation token could not be issued.
    #[error("Credential issuance failed: {0}")]
    CredentialIssuance(String),

    /// Anything else below the domain.
    #[error("Error: {0}")]
    Infrastructure(String),
}

impl InvitationError {
    pub fn not_found(what: impl Into<String>) -> Self {
        InvitationError::NotFound(what.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        InvitationError::Persistence(message.into())
    }

    pub fn credential_issuance(message: impl Into<String>) -> Self {
        InvitationError::CredentialIssuance(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            InvitationError::NotFound(_) => ErrorCode::InvitationNotFound,
            InvitationError::Validation(_) => ErrorCode::ValidationFailed,
            InvitationError::ConcurrencyConflict(_) => ErrorCode::ConcurrencyConflict,
            InvitationError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            InvitationError::Persistence(_) => ErrorCode::DatabaseError,
            InvitationError::CredentialIssuance(_) => ErrorCode::CredentialError,
            InvitationError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns true if retrying the whole operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InvitationError::Persistence(_)
                | InvitationError::ConcurrencyConflict(_)
                | InvitationError::Infrastructure(_)
        )
    }
}

impl From<DomainError> for InvitationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvitationNotFound => InvitationError::NotFound(err.message),
            ErrorCode::ValidationFailed => InvitationError::Validation(
                ValidationError::invalid_format(
                    err.details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "input".to_string()),
                    err.message,
                ),
            ),
            ErrorCode::ConcurrencyConflict => InvitationError::ConcurrencyConflict(err.message),
            ErrorCode::InvalidStateTransition => InvitationError::InvalidState(err.message),
            ErrorCode::CredentialError => InvitationError::CredentialIssuance(err.message),
            ErrorCode::DatabaseError => InvitationError::Persistence(err.message),
            ErrorCode::EventPublishFailed | ErrorCode::InternalError => {
                InvitationError::Infrastructure(err.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_database_error_maps_to_persistence() {
        let err: InvitationError =
            DomainError::new(ErrorCode::DatabaseError, "connection reset").into();
        assert_eq!(err, InvitationError::Persistence("connection reset".into()));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert!(err.is_retryable());
    }

    #[test]
    fn domain_conflict_maps_to_concurrency_conflict() {
        let err: InvitationError =
            DomainError::new(ErrorCode::ConcurrencyConflict, "version 3 expected").into();
        assert!(matches!(err, InvitationError::ConcurrencyConflict(_)));
    }

    #[test]
    fn domain_validation_keeps_field_name() {
        let err: InvitationError = DomainError::validation("token", "Token is empty").into();
        assert_eq!(
            err,
            InvitationError::Validation(ValidationError::invalid_format("token", "Token is empty"))
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn display_includes_context() {
        let err = InvitationError::not_found("token abc");
        assert_eq!(err.to_string(), "Invitation not found: token abc");
    }
}
