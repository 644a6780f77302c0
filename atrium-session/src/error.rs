//! Error types for session operations
//!
//! Every failure is returned to the caller as a typed value; nothing is
//! swallowed into a default-allow state. Whenever the session is in an
//! unresolved or erroring state, permission reads yield the default-deny
//! set and no effective organization, never a cached "last known good"
//! grant.

use thiserror::Error;
use uuid::Uuid;

use atrium_directory::DirectoryError;

/// Session error types.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No authenticated principal in the session
    #[error("No authenticated principal")]
    Unauthenticated,

    /// The principal has no accessible organization; route to onboarding
    #[error("No accessible organization")]
    NoAccessibleOrganization,

    /// The directory store failed; transient failures are retryable
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The requested organization switch was rejected; state is unchanged
    #[error("Invalid switch to organization {organization_id}: {reason}")]
    InvalidOrganizationSwitch {
        /// The organization the switch targeted
        organization_id: Uuid,
        /// Why the switch was rejected
        reason: String,
    },

    /// The impersonation request was rejected; state is unchanged
    #[error("Impersonation denied: {reason}")]
    ImpersonationDenied {
        /// Why impersonation was rejected
        reason: String,
    },

    /// The configuration write was rejected
    #[error("Configuration write denied: {reason}")]
    ConfigWriteDenied {
        /// Why the write was rejected
        reason: String,
    },
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// Check if retrying the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Directory(e) if e.is_retryable())
    }

    /// Check if the caller should route the principal to onboarding.
    pub fn requires_onboarding(&self) -> bool {
        matches!(self, SessionError::NoAccessibleOrganization)
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            SessionError::Unauthenticated => "UNAUTHENTICATED",
            SessionError::NoAccessibleOrganization => "NO_ACCESSIBLE_ORGANIZATION",
            SessionError::Directory(e) => e.error_code(),
            SessionError::InvalidOrganizationSwitch { .. } => "INVALID_ORGANIZATION_SWITCH",
            SessionError::ImpersonationDenied { .. } => "IMPERSONATION_DENIED",
            SessionError::ConfigWriteDenied { .. } => "CONFIG_WRITE_DENIED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_follows_directory_classification() {
        assert!(SessionError::Directory(DirectoryError::Unavailable("down".into())).is_retryable());
        assert!(!SessionError::Directory(DirectoryError::MasterConflict).is_retryable());
        assert!(!SessionError::Unauthenticated.is_retryable());
        assert!(!SessionError::NoAccessibleOrganization.is_retryable());
    }

    #[test]
    fn test_onboarding_trigger() {
        assert!(SessionError::NoAccessibleOrganization.requires_onboarding());
        assert!(!SessionError::Unauthenticated.requires_onboarding());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SessionError::Directory(DirectoryError::Unavailable("x".into())).error_code(),
            "DIRECTORY_UNAVAILABLE"
        );
        assert_eq!(
            SessionError::ImpersonationDenied {
                reason: "nope".into()
            }
            .error_code(),
            "IMPERSONATION_DENIED"
        );
    }
}
