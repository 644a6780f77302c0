//! Organization roles
//!
//! This module defines the hierarchical role a principal holds within an
//! organization, along with the privilege predicates derived from it.

use serde::{Deserialize, Serialize};

/// A principal's role within an organization.
///
/// Roles are hierarchical, with each role inheriting the privileges of lower
/// roles. The hierarchy is: Viewer < Member < Admin < Owner
///
/// # Privilege Model
///
/// - **Viewer**: Read-only access to organization resources
/// - **Member**: Day-to-day access to the organization's features
/// - **Admin**: Can manage the organization and its members
/// - **Owner**: Full organization control; granted to the founder
///
/// Domain auto-join always grants `Member`; the founding principal of an
/// organization always receives `Owner`.
///
/// # Examples
///
/// ```
/// use atrium_org::OrganizationRole;
///
/// let role = OrganizationRole::Member;
/// assert!(role.is_member());
/// assert!(!role.is_admin());
///
/// let admin = OrganizationRole::Admin;
/// assert!(admin.is_admin());
/// assert!(admin.is_member());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    /// Read-only access to organization resources
    Viewer = 1,

    /// Day-to-day access to the organization's features
    Member = 2,

    /// Can manage the organization and its members
    Admin = 3,

    /// Full organization control
    Owner = 4,
}

impl OrganizationRole {
    /// Check if this role has admin privileges.
    ///
    /// Admin privileges allow managing the organization and its members.
    ///
    /// # Returns
    ///
    /// `true` for Admin and Owner roles
    pub fn is_admin(&self) -> bool {
        *self >= OrganizationRole::Admin
    }

    /// Check if this role has member privileges.
    ///
    /// # Returns
    ///
    /// `true` for Member, Admin, and Owner roles
    pub fn is_member(&self) -> bool {
        *self >= OrganizationRole::Member
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(OrganizationRole)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_org::OrganizationRole;
    ///
    /// assert_eq!(OrganizationRole::parse("admin"), Some(OrganizationRole::Admin));
    /// assert_eq!(OrganizationRole::parse("VIEWER"), Some(OrganizationRole::Viewer));
    /// assert_eq!(OrganizationRole::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Get string representation of the role.
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_org::OrganizationRole;
    ///
    /// assert_eq!(OrganizationRole::Owner.as_str(), "owner");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Get a human-readable display name for the role.
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_org::OrganizationRole;
    ///
    /// assert_eq!(OrganizationRole::Admin.display_name(), "Admin");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Member => "Member",
            Self::Admin => "Admin",
            Self::Owner => "Owner",
        }
    }
}

impl Default for OrganizationRole {
    fn default() -> Self {
        Self::Viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(OrganizationRole::Owner > OrganizationRole::Admin);
        assert!(OrganizationRole::Admin > OrganizationRole::Member);
        assert!(OrganizationRole::Member > OrganizationRole::Viewer);
    }

    #[test]
    fn test_role_predicates() {
        assert!(!OrganizationRole::Viewer.is_member());
        assert!(OrganizationRole::Member.is_member());
        assert!(!OrganizationRole::Member.is_admin());
        assert!(OrganizationRole::Admin.is_admin());
        assert!(OrganizationRole::Owner.is_admin());
        assert!(OrganizationRole::Owner.is_member());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(
            OrganizationRole::parse("admin"),
            Some(OrganizationRole::Admin)
        );
        assert_eq!(
            OrganizationRole::parse("MEMBER"),
            Some(OrganizationRole::Member)
        );
        assert_eq!(OrganizationRole::parse("invalid"), None);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [
            OrganizationRole::Viewer,
            OrganizationRole::Member,
            OrganizationRole::Admin,
            OrganizationRole::Owner,
        ] {
            assert_eq!(OrganizationRole::parse(role.as_str()), Some(role));
        }
    }
}
