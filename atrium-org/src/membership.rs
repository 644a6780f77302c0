//! Membership domain model
//!
//! This module provides the membership entity linking principals to
//! organizations. A membership defines the principal's role within one
//! organization; the directory layer guarantees at most one membership per
//! (organization, principal) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::OrganizationRole;

/// How a membership came into existence.
///
/// The source is informational for audit views, with one behavioral rule:
/// `DomainAutoJoin` memberships are always created with the `Member` role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MembershipSource {
    /// Created together with the organization for its founding principal
    Founder,

    /// Created when an invitation was accepted
    Invitation,

    /// Created by email-domain auto-join
    DomainAutoJoin,
}

/// A principal's membership in an organization.
///
/// Memberships are created on organization creation (founder becomes
/// `Owner`), on invitation acceptance (the invited role), or on domain
/// auto-join (always `Member`). Creating a second membership for the same
/// (organization, principal) pair is a directory-level error, never a
/// silent overwrite.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use atrium_org::{Membership, MembershipSource, OrganizationRole};
///
/// let org_id = Uuid::now_v7();
/// let principal_id = Uuid::now_v7();
/// let membership = Membership::new(
///     org_id,
///     principal_id,
///     OrganizationRole::Member,
///     MembershipSource::DomainAutoJoin,
/// );
/// assert_eq!(membership.role, OrganizationRole::Member);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    /// Unique membership ID
    pub id: Uuid,

    /// Organization ID
    pub organization_id: Uuid,

    /// Principal ID
    pub principal_id: Uuid,

    /// Role within the organization
    pub role: OrganizationRole,

    /// How this membership was created
    pub source: MembershipSource,

    /// When the principal joined
    pub joined_at: DateTime<Utc>,

    /// Who invited this principal (if applicable)
    pub invited_by: Option<Uuid>,
}

impl Membership {
    /// Creates a new membership.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The organization ID
    /// * `principal_id` - The principal ID
    /// * `role` - The principal's role in the organization
    /// * `source` - How the membership came into existence
    pub fn new(
        organization_id: Uuid,
        principal_id: Uuid,
        role: OrganizationRole,
        source: MembershipSource,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            principal_id,
            role,
            source,
            joined_at: Utc::now(),
            invited_by: None,
        }
    }

    /// Creates the founding `Owner` membership for a new organization.
    pub fn founder(organization_id: Uuid, principal_id: Uuid) -> Self {
        Self::new(
            organization_id,
            principal_id,
            OrganizationRole::Owner,
            MembershipSource::Founder,
        )
    }

    /// Creates a domain auto-join membership. Always `Member`.
    pub fn auto_join(organization_id: Uuid, principal_id: Uuid) -> Self {
        Self::new(
            organization_id,
            principal_id,
            OrganizationRole::Member,
            MembershipSource::DomainAutoJoin,
        )
    }

    /// Set who invited this principal.
    ///
    /// # Arguments
    ///
    /// * `inviter_id` - The principal ID of who sent the invitation
    pub fn with_inviter(mut self, inviter_id: Uuid) -> Self {
        self.invited_by = Some(inviter_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_creation() {
        let org_id = Uuid::now_v7();
        let principal_id = Uuid::now_v7();
        let membership = Membership::new(
            org_id,
            principal_id,
            OrganizationRole::Admin,
            MembershipSource::Invitation,
        );

        assert_eq!(membership.organization_id, org_id);
        assert_eq!(membership.principal_id, principal_id);
        assert_eq!(membership.role, OrganizationRole::Admin);
        assert_eq!(membership.source, MembershipSource::Invitation);
        assert!(membership.invited_by.is_none());
    }

    #[test]
    fn test_founder_membership_is_owner() {
        let membership = Membership::founder(Uuid::now_v7(), Uuid::now_v7());
        assert_eq!(membership.role, OrganizationRole::Owner);
        assert_eq!(membership.source, MembershipSource::Founder);
    }

    #[test]
    fn test_auto_join_membership_is_member() {
        let membership = Membership::auto_join(Uuid::now_v7(), Uuid::now_v7());
        assert_eq!(membership.role, OrganizationRole::Member);
        assert_eq!(membership.source, MembershipSource::DomainAutoJoin);
    }

    #[test]
    fn test_membership_with_inviter() {
        let inviter_id = Uuid::now_v7();
        let membership = Membership::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            OrganizationRole::Viewer,
            MembershipSource::Invitation,
        )
        .with_inviter(inviter_id);

        assert_eq!(membership.invited_by, Some(inviter_id));
    }
}
