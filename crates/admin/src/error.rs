//! Unified error handling for the list engine.

use rollcall_core::ValidationError;
use thiserror::Error;

/// Failures surfaced by loads, edits and deletes.
///
/// None of these are fatal: every failure leaves the collection cache as it
/// was and can be retried or cancelled.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The request could not complete (connection, timeout, TLS).
    #[error("Network error: {0}")]
    NetworkFailure(String),

    /// The record service answered with a non-success status or a body that
    /// breaks the contract.
    #[error("Server rejected request ({status}): {message}")]
    ServerRejection { status: u16, message: String },

    /// Input rejected locally; nothing was sent.
    #[error("Invalid input: {0}")]
    ValidationFailure(#[from] ValidationError),

    /// Another edit or delete for this record is still in flight.
    #[error("An operation on {id} is already in progress")]
    Busy { id: String },

    /// No edit draft is open.
    #[error("No edit in progress")]
    NoDraft,

    /// The record is not in the loaded collection.
    #[error("Not found: {id}")]
    NotFound { id: String },

    /// The record type cannot be sorted by the requested key.
    #[error("Cannot sort {noun} list by {key}")]
    UnsupportedSort { noun: &'static str, key: String },

    /// Local state could not be accessed.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Server,
    Validation,
    State,
}

impl SyncError {
    /// Coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkFailure(_) => ErrorKind::Network,
            Self::ServerRejection { .. } => ErrorKind::Server,
            Self::ValidationFailure(_) | Self::UnsupportedSort { .. } => ErrorKind::Validation,
            Self::Busy { .. } | Self::NoDraft | Self::NotFound { .. } | Self::Internal(_) => {
                ErrorKind::State
            }
        }
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Client errors (4xx other than 408/429) will fail again unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkFailure(_) | Self::Busy { .. } => true,
            Self::ServerRejection { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            _ => false,
        }
    }

    /// Log the error and forward remote failures to Sentry.
    ///
    /// Capturing is a no-op when Sentry has not been initialized.
    pub fn report(&self) {
        if matches!(self.kind(), ErrorKind::Network | ErrorKind::Server) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Record service error"
            );
        } else {
            tracing::warn!(error = %self, "Request not sent");
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::ServerRejection {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_decode() {
            return Self::ServerRejection {
                status: 200,
                message: format!("Malformed response: {err}"),
            };
        }
        Self::NetworkFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rollcall_core::{ContactError, FieldError};

    use super::*;

    #[test]
    fn test_sync_error_display() {
        let err = SyncError::ServerRejection {
            status: 404,
            message: "User not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Server rejected request (404): User not found"
        );

        let err = SyncError::Busy {
            id: "m1".to_string(),
        };
        assert_eq!(err.to_string(), "An operation on m1 is already in progress");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SyncError::NetworkFailure("timeout".to_string()).is_retryable());
        assert!(
            SyncError::ServerRejection {
                status: 503,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !SyncError::ServerRejection {
                status: 400,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!SyncError::NoDraft.is_retryable());
    }

    #[test]
    fn test_validation_converts_and_classifies() {
        let validation = ValidationError::new(vec![FieldError::Contact {
            field: "name",
            source: ContactError::Empty,
        }]);
        let err: SyncError = validation.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Invalid input: name cannot be empty");
    }
}
