//! # Permissions
//!
//! The derived capability set and the pure derivation function. This is the
//! single place the visibility and write rules are encoded; everything
//! downstream reads the resulting [`Permissions`] value and nothing else.

use serde::{Deserialize, Serialize};

use atrium_org::{OrganizationConfig, OrganizationRole};

use crate::features::Feature;

/// The derived capability set for one actor in one effective organization.
///
/// Ephemeral and recomputed on every state change, never persisted. All
/// fields are plain flags so the value can be handed to UI code and feature
/// services without further interpretation.
///
/// The unresolved state (no authenticated principal, or no current
/// organization) is represented by [`Permissions::denied`]: every flag
/// false. Callers must never see a partially-initialized or previous value.
///
/// # Examples
///
/// ```
/// use atrium_authz::{Feature, Permissions};
/// use atrium_org::{OrganizationConfig, OrganizationRole};
///
/// let mut config = OrganizationConfig::default();
/// config.analytics = false;
///
/// // Master-org admin viewing a tenant: the tenant's config governs
/// let admin = Permissions::derive(OrganizationRole::Admin, true, true, &config);
/// assert!(!admin.can_view(Feature::Analytics));
///
/// // The tenant's own members are unaffected by the toggle
/// let member = Permissions::derive(OrganizationRole::Member, false, false, &config);
/// assert!(member.can_view(Feature::Analytics));
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permissions {
    // Role-derived flags
    /// Actor holds the Owner role in the current organization
    pub is_owner: bool,
    /// Actor holds Admin or Owner in the current organization
    pub is_admin: bool,
    /// Actor holds Member or above in the current organization
    pub is_member: bool,
    /// Actor holds any recognized role in the current organization
    pub is_viewer: bool,
    /// Actor is Admin or Owner of the master organization *and* the master
    /// organization is the current (not effective) one
    pub is_master_admin: bool,

    /// A cross-tenant impersonation overlay is active
    pub is_impersonating: bool,

    // Feature visibility for the effective organization
    /// Unified inbox is visible
    pub unified_inbox: bool,
    /// Business-app catalog is visible
    pub business_apps: bool,
    /// AI agent management is visible
    pub ai_agents: bool,
    /// MCP server management is visible
    pub mcp_servers: bool,
    /// Analytics dashboards are visible
    pub analytics: bool,
    /// CRM is visible
    pub crm: bool,

    /// Mask PII in list and detail views. Follows the effective
    /// organization's config for every actor; never bypassed.
    pub pii_masking: bool,

    // Action flags
    /// May edit organization settings
    pub can_manage_organization: bool,
    /// May invite, remove, and re-role members
    pub can_manage_members: bool,
    /// May enter impersonation into tenant organizations
    pub can_impersonate_orgs: bool,
    /// May list the full organization directory
    pub can_view_all_orgs: bool,
    /// May add/edit/delete MCP server definitions
    pub can_configure_mcp_servers: bool,
}

impl Permissions {
    /// The all-false, default-deny capability set.
    ///
    /// Returned whenever there is no authenticated principal or no resolved
    /// current organization.
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_authz::Permissions;
    ///
    /// let denied = Permissions::denied();
    /// assert!(!denied.is_viewer);
    /// assert!(!denied.crm);
    /// assert!(!denied.pii_masking);
    /// ```
    pub fn denied() -> Self {
        Self::default()
    }

    /// Derive the capability set for one actor and one effective
    /// organization.
    ///
    /// Pure: no side effects, no I/O; safe to call on every state change.
    ///
    /// # Arguments
    ///
    /// * `role` - The actor's role in the **current** organization
    /// * `is_master_context` - Whether the current organization is the
    ///   master organization
    /// * `is_impersonating` - Whether an impersonation overlay is active
    /// * `effective_config` - The **effective** organization's config (the
    ///   impersonated organization's when impersonating, otherwise the
    ///   current organization's)
    ///
    /// # Visibility rules
    ///
    /// For each gated feature:
    /// - A master-org admin (impersonating or not) sees the feature iff the
    ///   effective config enables it.
    /// - Any other actor sees every feature of their own organization
    ///   unconditionally, except the business-app catalog, which is
    ///   platform-admin-only.
    ///
    /// `pii_masking` always follows the effective config.
    ///
    /// # Write narrowing
    ///
    /// `can_configure_mcp_servers` requires a master-org admin who is *not*
    /// impersonating: platform infrastructure is configured only from the
    /// operator's own context.
    pub fn derive(
        role: OrganizationRole,
        is_master_context: bool,
        is_impersonating: bool,
        effective_config: &OrganizationConfig,
    ) -> Self {
        let is_owner = role == OrganizationRole::Owner;
        let is_admin = role.is_admin();
        let is_member = role.is_member();
        let is_master_admin = is_master_context && is_admin;

        let visible = |toggle: bool| {
            if is_master_admin {
                toggle
            } else {
                true
            }
        };

        Self {
            is_owner,
            is_admin,
            is_member,
            is_viewer: true,
            is_master_admin,
            is_impersonating,

            unified_inbox: visible(effective_config.unified_inbox),
            business_apps: if is_master_admin {
                effective_config.business_apps
            } else {
                false
            },
            ai_agents: visible(effective_config.ai_agents),
            mcp_servers: visible(effective_config.mcp_servers),
            analytics: visible(effective_config.analytics),
            crm: visible(effective_config.crm),

            pii_masking: effective_config.pii_masking,

            can_manage_organization: is_admin,
            can_manage_members: is_admin,
            can_impersonate_orgs: is_master_admin,
            can_view_all_orgs: is_master_admin,
            can_configure_mcp_servers: is_master_admin && !is_impersonating,
        }
    }

    /// Visibility of one gated feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_authz::{Feature, Permissions};
    /// use atrium_org::{OrganizationConfig, OrganizationRole};
    ///
    /// let perms = Permissions::derive(
    ///     OrganizationRole::Member,
    ///     false,
    ///     false,
    ///     &OrganizationConfig::default(),
    /// );
    /// assert!(perms.can_view(Feature::Crm));
    /// assert!(!perms.can_view(Feature::BusinessApps));
    /// ```
    pub fn can_view(&self, feature: Feature) -> bool {
        match feature {
            Feature::UnifiedInbox => self.unified_inbox,
            Feature::BusinessApps => self.business_apps,
            Feature::AiAgents => self.ai_agents,
            Feature::McpServers => self.mcp_servers,
            Feature::Analytics => self.analytics,
            Feature::Crm => self.crm,
        }
    }
}
