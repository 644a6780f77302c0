//! Organization domain model
//!
//! This module provides the core Organization entity for multi-tenant
//! management. Organizations are the top-level tenant entities that own
//! members, feature configuration, and domain-join policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::OrganizationConfig;

/// An organization represents a tenant in the multi-tenant system.
///
/// Principals can belong to multiple organizations with different roles.
/// Each organization carries its own feature configuration, an optional
/// email-domain restriction on who may select it as their active context,
/// and an optional auto-join allowlist of email domains.
///
/// At most one organization in a deployment has `is_master = true`: the
/// platform operator's workspace. Its admins may view other tenants without
/// holding memberships in them. The directory layer enforces the
/// single-master invariant on creation.
///
/// # Examples
///
/// ```
/// use atrium_org::Organization;
///
/// let org = Organization::new("Acme Corp", "acme-corp");
/// assert_eq!(org.name, "Acme Corp");
/// assert!(org.is_active);
/// assert!(!org.is_master);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// URL-friendly slug (unique across the platform)
    pub slug: String,

    /// Whether this is the platform operator's organization
    #[serde(default)]
    pub is_master: bool,

    /// Optional single email domain a principal must belong to in order to
    /// select this organization as their active context
    pub domain_restriction: Option<String>,

    /// Whether principals with a matching email domain are auto-joined
    #[serde(default)]
    pub domain_auto_join_enabled: bool,

    /// Email domains eligible for auto-join
    #[serde(default)]
    pub allowed_domains: Vec<String>,

    /// Feature toggle bundle read by the capability authorizer
    #[serde(default)]
    pub config: OrganizationConfig,

    /// Whether the organization is active
    pub is_active: bool,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new tenant organization with default configuration.
    ///
    /// The organization is created with:
    /// - A newly generated UUID v7 ID
    /// - Active status, non-master
    /// - No domain restriction and auto-join disabled
    /// - Default feature configuration
    ///
    /// # Arguments
    ///
    /// * `name` - The organization name
    /// * `slug` - URL-friendly slug (must be unique)
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_org::Organization;
    ///
    /// let org = Organization::new("Acme Corp", "acme-corp");
    /// assert!(org.allowed_domains.is_empty());
    /// ```
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            is_master: false,
            domain_restriction: None,
            domain_auto_join_enabled: false,
            allowed_domains: Vec::new(),
            config: OrganizationConfig::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates the platform operator's (master) organization.
    ///
    /// The directory layer rejects a second master organization, so this is
    /// called exactly once per deployment.
    pub fn new_master(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let mut org = Self::new(name, slug);
        org.is_master = true;
        org
    }

    /// Restrict active-context selection to one email domain.
    ///
    /// # Arguments
    ///
    /// * `domain` - The required email domain
    pub fn with_domain_restriction(mut self, domain: impl Into<String>) -> Self {
        self.domain_restriction = Some(domain.into());
        self
    }

    /// Enable domain auto-join for the given email domains.
    ///
    /// # Arguments
    ///
    /// * `domains` - Email domains whose principals are auto-joined as members
    pub fn with_auto_join<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_auto_join_enabled = true;
        self.allowed_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether a principal with the given email domain may be
    /// auto-joined into this organization.
    ///
    /// Requires the organization to be active, auto-join to be enabled, and
    /// the domain to appear in the allowlist (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_org::Organization;
    ///
    /// let org = Organization::new("Acme", "acme").with_auto_join(["acme.com"]);
    /// assert!(org.allows_auto_join("acme.com"));
    /// assert!(org.allows_auto_join("ACME.com"));
    /// assert!(!org.allows_auto_join("other.com"));
    /// ```
    pub fn allows_auto_join(&self, email_domain: &str) -> bool {
        self.is_active
            && self.domain_auto_join_enabled
            && self
                .allowed_domains
                .iter()
                .any(|d| d.eq_ignore_ascii_case(email_domain))
    }

    /// Check whether a principal with the given email domain may select
    /// this organization as their active context.
    ///
    /// An organization without a domain restriction admits everyone; with
    /// one, the principal's email domain must equal it exactly
    /// (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_org::Organization;
    ///
    /// let open = Organization::new("Open", "open");
    /// assert!(open.admits_email_domain(Some("anything.com")));
    ///
    /// let locked = Organization::new("Corp", "corp").with_domain_restriction("corp.com");
    /// assert!(locked.admits_email_domain(Some("corp.com")));
    /// assert!(!locked.admits_email_domain(Some("other.com")));
    /// assert!(!locked.admits_email_domain(None));
    /// ```
    pub fn admits_email_domain(&self, email_domain: Option<&str>) -> bool {
        match &self.domain_restriction {
            None => true,
            Some(required) => {
                email_domain.is_some_and(|domain| required.eq_ignore_ascii_case(domain))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_creation() {
        let org = Organization::new("Acme Corp", "acme-corp");

        assert_eq!(org.name, "Acme Corp");
        assert_eq!(org.slug, "acme-corp");
        assert!(org.is_active);
        assert!(!org.is_master);
        assert!(org.domain_restriction.is_none());
        assert!(!org.domain_auto_join_enabled);
    }

    #[test]
    fn test_master_organization() {
        let org = Organization::new_master("Atrium HQ", "atrium-hq");
        assert!(org.is_master);
    }

    #[test]
    fn test_auto_join_requires_enabled_and_listed() {
        let mut org = Organization::new("Acme", "acme").with_auto_join(["acme.com", "acme.io"]);
        assert!(org.allows_auto_join("acme.com"));
        assert!(org.allows_auto_join("acme.io"));
        assert!(!org.allows_auto_join("acme.dev"));

        org.domain_auto_join_enabled = false;
        assert!(!org.allows_auto_join("acme.com"));
    }

    #[test]
    fn test_auto_join_inactive_org() {
        let mut org = Organization::new("Acme", "acme").with_auto_join(["acme.com"]);
        org.is_active = false;
        assert!(!org.allows_auto_join("acme.com"));
    }

    #[test]
    fn test_domain_restriction() {
        let org = Organization::new("Corp", "corp").with_domain_restriction("corp.com");
        assert!(org.admits_email_domain(Some("corp.com")));
        assert!(org.admits_email_domain(Some("CORP.COM")));
        assert!(!org.admits_email_domain(Some("sub.corp.com")));
        assert!(!org.admits_email_domain(None));
    }
}
