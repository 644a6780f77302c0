//! # Features
//!
//! Defines the gated dashboard surfaces. Visibility of each feature is
//! derived per actor and per effective organization by
//! [`crate::Permissions::derive`].

use serde::{Deserialize, Serialize};

/// A gated dashboard surface.
///
/// Every feature here has a matching toggle in
/// [`atrium_org::OrganizationConfig`]. `pii_masking` is deliberately *not*
/// a feature: it is a data-protection setting, not a surface that can be
/// hidden or shown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Unified inbox (shared email/SMS conversations)
    UnifiedInbox,

    /// Business-app catalog; platform-admin-only surface
    BusinessApps,

    /// AI agent management
    AiAgents,

    /// MCP server management
    McpServers,

    /// Analytics dashboards
    Analytics,

    /// CRM (contacts, deals, pipelines)
    Crm,
}

impl Feature {
    /// Get the string representation of the feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_authz::Feature;
    ///
    /// assert_eq!(Feature::UnifiedInbox.as_str(), "unified_inbox");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::UnifiedInbox => "unified_inbox",
            Feature::BusinessApps => "business_apps",
            Feature::AiAgents => "ai_agents",
            Feature::McpServers => "mcp_servers",
            Feature::Analytics => "analytics",
            Feature::Crm => "crm",
        }
    }

    /// Parse a feature from its string representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_authz::Feature;
    ///
    /// assert_eq!(Feature::parse("crm"), Some(Feature::Crm));
    /// assert_eq!(Feature::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unified_inbox" => Some(Feature::UnifiedInbox),
            "business_apps" => Some(Feature::BusinessApps),
            "ai_agents" => Some(Feature::AiAgents),
            "mcp_servers" => Some(Feature::McpServers),
            "analytics" => Some(Feature::Analytics),
            "crm" => Some(Feature::Crm),
            _ => None,
        }
    }

    /// All gated features.
    pub fn all() -> &'static [Feature] {
        &[
            Feature::UnifiedInbox,
            Feature::BusinessApps,
            Feature::AiAgents,
            Feature::McpServers,
            Feature::Analytics,
            Feature::Crm,
        ]
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_round_trip() {
        for feature in Feature::all() {
            assert_eq!(Feature::parse(feature.as_str()), Some(*feature));
        }
    }

    #[test]
    fn test_feature_parse_rejects_unknown() {
        assert_eq!(Feature::parse("pii_masking"), None);
        assert_eq!(Feature::parse(""), None);
    }
}
