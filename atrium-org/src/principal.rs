//! Authenticated principal
//!
//! This module provides the Principal type: the authenticated actor as
//! handed over by the identity provider. The identity provider owns the
//! principal's lifecycle; this crate only consumes it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated actor.
///
/// Principals are immutable for the lifetime of a session. The stable `id`
/// and the verified `email` both come from the identity provider; nothing in
/// this workspace mints or mutates them.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use atrium_org::Principal;
///
/// let principal = Principal::new(Uuid::now_v7(), "ada@acme.com");
/// assert_eq!(principal.email_domain(), Some("acme.com".to_string()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Stable identifier assigned by the identity provider
    pub id: Uuid,

    /// Verified email address
    pub email: String,
}

impl Principal {
    /// Creates a principal from identity-provider output.
    ///
    /// # Arguments
    ///
    /// * `id` - Stable identifier from the identity provider
    /// * `email` - Verified email address
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }

    /// The domain part of the principal's email, lowercased.
    ///
    /// Used for domain auto-join and domain-restriction checks. Returns
    /// `None` when the address has no domain part (empty or missing `@`).
    ///
    /// # Examples
    ///
    /// ```
    /// use uuid::Uuid;
    /// use atrium_org::Principal;
    ///
    /// let p = Principal::new(Uuid::now_v7(), "Ada@ACME.com");
    /// assert_eq!(p.email_domain(), Some("acme.com".to_string()));
    ///
    /// let bad = Principal::new(Uuid::now_v7(), "not-an-address");
    /// assert_eq!(bad.email_domain(), None);
    /// ```
    pub fn email_domain(&self) -> Option<String> {
        let domain = self.email.rsplit_once('@').map(|(_, d)| d)?;
        if domain.is_empty() {
            return None;
        }
        Some(domain.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_domain_lowercased() {
        let p = Principal::new(Uuid::now_v7(), "User@Example.COM");
        assert_eq!(p.email_domain(), Some("example.com".to_string()));
    }

    #[test]
    fn test_email_domain_missing() {
        let p = Principal::new(Uuid::now_v7(), "no-at-sign");
        assert_eq!(p.email_domain(), None);

        let trailing = Principal::new(Uuid::now_v7(), "user@");
        assert_eq!(trailing.email_domain(), None);
    }

    #[test]
    fn test_email_domain_uses_last_at() {
        let p = Principal::new(Uuid::now_v7(), "odd@name@corp.io");
        assert_eq!(p.email_domain(), Some("corp.io".to_string()));
    }
}
