//! Error types for directory operations
//!
//! This module defines all error types that can occur while talking to the
//! tenant directory store. Every failure is surfaced as a typed value;
//! callers decide whether to retry, fail closed, or report.

use thiserror::Error;
use uuid::Uuid;

/// Directory error types.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The store is unreachable or timed out. Transient; retryable.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// The referenced organization does not exist
    #[error("Organization not found: {0}")]
    NotFound(Uuid),

    /// A membership for this (organization, principal) pair already exists.
    /// Creation fails; it never silently overwrites.
    #[error("Membership already exists for principal {principal_id} in organization {organization_id}")]
    DuplicateMembership {
        /// Organization of the existing membership
        organization_id: Uuid,
        /// Principal of the existing membership
        principal_id: Uuid,
    },

    /// A master organization already exists; at most one is allowed
    #[error("A master organization already exists")]
    MasterConflict,

    /// Stored data could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl DirectoryError {
    /// Check if retrying the operation may succeed.
    ///
    /// Only transient store failures are retryable; constraint violations
    /// and missing rows are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DirectoryError::Unavailable(_))
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::Unavailable(_) => "DIRECTORY_UNAVAILABLE",
            DirectoryError::NotFound(_) => "ORGANIZATION_NOT_FOUND",
            DirectoryError::DuplicateMembership { .. } => "DUPLICATE_MEMBERSHIP",
            DirectoryError::MasterConflict => "MASTER_CONFLICT",
            DirectoryError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(DirectoryError::Unavailable("timeout".into()).is_retryable());
        assert!(!DirectoryError::NotFound(Uuid::now_v7()).is_retryable());
        assert!(!DirectoryError::MasterConflict.is_retryable());
        assert!(!DirectoryError::DuplicateMembership {
            organization_id: Uuid::now_v7(),
            principal_id: Uuid::now_v7(),
        }
        .is_retryable());
    }
}
