//! Organization feature configuration
//!
//! This module provides the per-organization toggle bundle read by the
//! capability authorizer. Only platform (master-org) administrators mutate
//! these toggles; tenant members never see the raw bundle, only the
//! capability set derived from it.

use serde::{Deserialize, Serialize};

/// Per-organization feature toggles.
///
/// Each toggle gates one dashboard surface for platform administrators
/// viewing the organization. `pii_masking` is different in kind: it is a
/// data-protection setting applied to whoever views the organization's
/// data, not a visibility toggle.
///
/// # Examples
///
/// ```
/// use atrium_org::OrganizationConfig;
///
/// let config = OrganizationConfig::default();
/// assert!(config.crm);
/// assert!(!config.business_apps);
/// assert!(!config.pii_masking);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationConfig {
    /// Unified inbox (shared email/SMS conversations)
    #[serde(default = "default_true")]
    pub unified_inbox: bool,

    /// Business-app catalog; platform-admin-only surface
    #[serde(default)]
    pub business_apps: bool,

    /// AI agent management
    #[serde(default = "default_true")]
    pub ai_agents: bool,

    /// MCP server management
    #[serde(default = "default_true")]
    pub mcp_servers: bool,

    /// Analytics dashboards
    #[serde(default = "default_true")]
    pub analytics: bool,

    /// CRM (contacts, deals, pipelines)
    #[serde(default = "default_true")]
    pub crm: bool,

    /// Mask personally identifiable information in list and detail views
    #[serde(default)]
    pub pii_masking: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            unified_inbox: true,
            business_apps: false,
            ai_agents: true,
            mcp_servers: true,
            analytics: true,
            crm: true,
            pii_masking: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OrganizationConfig::default();
        assert!(config.unified_inbox);
        assert!(config.ai_agents);
        assert!(config.mcp_servers);
        assert!(config.analytics);
        assert!(config.crm);
        assert!(!config.business_apps);
        assert!(!config.pii_masking);
    }

    #[test]
    fn test_config_partial_deserialization() {
        // Missing fields fall back to the serde defaults
        let config: OrganizationConfig =
            serde_json::from_str(r#"{"crm": false, "pii_masking": true}"#).unwrap();
        assert!(!config.crm);
        assert!(config.pii_masking);
        assert!(config.unified_inbox);
        assert!(!config.business_apps);
    }
}
