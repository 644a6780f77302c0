//! In-memory directory backend
//!
//! This backend is suitable for single-process deployments and testing.
//! Distributed deployments put a database-backed implementation behind the
//! same [`DirectoryGateway`] trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use atrium_org::{Membership, Organization, OrganizationConfig};

use crate::change::DirectoryChange;
use crate::error::{DirectoryError, DirectoryResult};
use crate::gateway::DirectoryGateway;

/// In-memory [`DirectoryGateway`] implementation.
///
/// Organizations and memberships live in `RwLock`-guarded maps; change
/// notifications go out over a broadcast channel. Memberships are keyed by
/// (organization, principal), which makes the uniqueness invariant a plain
/// map property.
pub struct MemoryDirectory {
    organizations: Arc<RwLock<HashMap<Uuid, Organization>>>,
    memberships: Arc<RwLock<HashMap<(Uuid, Uuid), Membership>>>,
    changes: broadcast::Sender<DirectoryChange>,
}

impl std::fmt::Debug for MemoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDirectory").finish()
    }
}

impl MemoryDirectory {
    /// Create an empty in-memory directory.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create with a custom change-channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity);
        Self {
            organizations: Arc::new(RwLock::new(HashMap::new())),
            memberships: Arc::new(RwLock::new(HashMap::new())),
            changes,
        }
    }

    fn notify(&self, change: DirectoryChange) {
        // No receivers is fine; notifications are best-effort
        let _ = self.changes.send(change);
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryGateway for MemoryDirectory {
    async fn organization(&self, org_id: Uuid) -> DirectoryResult<Option<Organization>> {
        Ok(self.organizations.read().await.get(&org_id).cloned())
    }

    async fn all_organizations(&self) -> DirectoryResult<Vec<Organization>> {
        Ok(self.organizations.read().await.values().cloned().collect())
    }

    async fn memberships_for_principal(
        &self,
        principal_id: Uuid,
    ) -> DirectoryResult<Vec<Membership>> {
        Ok(self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.principal_id == principal_id)
            .cloned()
            .collect())
    }

    async fn auto_join_candidates(
        &self,
        email_domain: &str,
    ) -> DirectoryResult<Vec<Organization>> {
        Ok(self
            .organizations
            .read()
            .await
            .values()
            .filter(|o| o.allows_auto_join(email_domain))
            .cloned()
            .collect())
    }

    async fn create_organization(
        &self,
        organization: Organization,
        founder_id: Uuid,
    ) -> DirectoryResult<Organization> {
        // Lock both maps for the whole operation so the organization and
        // its founding membership appear together or not at all.
        let mut organizations = self.organizations.write().await;
        let mut memberships = self.memberships.write().await;

        if organization.is_master && organizations.values().any(|o| o.is_master) {
            return Err(DirectoryError::MasterConflict);
        }
        if organizations.contains_key(&organization.id) {
            return Err(DirectoryError::Serialization(format!(
                "organization id collision: {}",
                organization.id
            )));
        }

        let founder = Membership::founder(organization.id, founder_id);
        let org_id = organization.id;

        organizations.insert(org_id, organization.clone());
        memberships.insert((org_id, founder_id), founder);
        drop(memberships);
        drop(organizations);

        tracing::debug!(organization_id = %org_id, "organization created");
        self.notify(DirectoryChange::OrganizationCreated(org_id));
        self.notify(DirectoryChange::MembershipCreated {
            organization_id: org_id,
            principal_id: founder_id,
        });

        Ok(organization)
    }

    async fn create_membership(&self, membership: Membership) -> DirectoryResult<Membership> {
        let organizations = self.organizations.read().await;
        if !organizations.contains_key(&membership.organization_id) {
            return Err(DirectoryError::NotFound(membership.organization_id));
        }
        drop(organizations);

        let mut memberships = self.memberships.write().await;
        let key = (membership.organization_id, membership.principal_id);
        if memberships.contains_key(&key) {
            return Err(DirectoryError::DuplicateMembership {
                organization_id: membership.organization_id,
                principal_id: membership.principal_id,
            });
        }
        memberships.insert(key, membership.clone());
        drop(memberships);

        tracing::debug!(
            organization_id = %membership.organization_id,
            principal_id = %membership.principal_id,
            role = membership.role.as_str(),
            "membership created"
        );
        self.notify(DirectoryChange::MembershipCreated {
            organization_id: membership.organization_id,
            principal_id: membership.principal_id,
        });

        Ok(membership)
    }

    async fn update_config(
        &self,
        org_id: Uuid,
        config: OrganizationConfig,
    ) -> DirectoryResult<Organization> {
        let mut organizations = self.organizations.write().await;
        let org = organizations
            .get_mut(&org_id)
            .ok_or(DirectoryError::NotFound(org_id))?;
        org.config = config;
        org.updated_at = Utc::now();
        let updated = org.clone();
        drop(organizations);

        tracing::debug!(organization_id = %org_id, "organization config updated");
        self.notify(DirectoryChange::ConfigUpdated(org_id));

        Ok(updated)
    }

    fn subscribe(&self) -> broadcast::Receiver<DirectoryChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_org::{MembershipSource, OrganizationRole};

    #[tokio::test]
    async fn test_create_organization_with_founder() {
        let directory = MemoryDirectory::new();
        let founder_id = Uuid::now_v7();

        let org = directory
            .create_organization(Organization::new("Acme", "acme"), founder_id)
            .await
            .unwrap();

        let memberships = directory
            .memberships_for_principal(founder_id)
            .await
            .unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].organization_id, org.id);
        assert_eq!(memberships[0].role, OrganizationRole::Owner);
        assert_eq!(memberships[0].source, MembershipSource::Founder);
    }

    #[tokio::test]
    async fn test_single_master_invariant() {
        let directory = MemoryDirectory::new();

        directory
            .create_organization(Organization::new_master("HQ", "hq"), Uuid::now_v7())
            .await
            .unwrap();

        let err = directory
            .create_organization(Organization::new_master("HQ 2", "hq-2"), Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::MasterConflict));

        // A failed creation leaves nothing behind
        let orgs = directory.all_organizations().await.unwrap();
        assert_eq!(orgs.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_creation_leaves_no_membership() {
        let directory = MemoryDirectory::new();
        let founder_id = Uuid::now_v7();

        directory
            .create_organization(Organization::new_master("HQ", "hq"), Uuid::now_v7())
            .await
            .unwrap();
        directory
            .create_organization(Organization::new_master("HQ 2", "hq-2"), founder_id)
            .await
            .unwrap_err();

        let memberships = directory
            .memberships_for_principal(founder_id)
            .await
            .unwrap();
        assert!(memberships.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_membership_fails() {
        let directory = MemoryDirectory::new();
        let org = directory
            .create_organization(Organization::new("Acme", "acme"), Uuid::now_v7())
            .await
            .unwrap();
        let principal_id = Uuid::now_v7();

        directory
            .create_membership(Membership::new(
                org.id,
                principal_id,
                OrganizationRole::Member,
                MembershipSource::Invitation,
            ))
            .await
            .unwrap();

        let err = directory
            .create_membership(Membership::new(
                org.id,
                principal_id,
                OrganizationRole::Admin,
                MembershipSource::Invitation,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateMembership { .. }));

        // The original membership is untouched
        let memberships = directory
            .memberships_for_principal(principal_id)
            .await
            .unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role, OrganizationRole::Member);
    }

    #[tokio::test]
    async fn test_membership_requires_existing_organization() {
        let directory = MemoryDirectory::new();
        let err = directory
            .create_membership(Membership::new(
                Uuid::now_v7(),
                Uuid::now_v7(),
                OrganizationRole::Member,
                MembershipSource::Invitation,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_auto_join_candidates() {
        let directory = MemoryDirectory::new();
        directory
            .create_organization(
                Organization::new("Acme", "acme").with_auto_join(["acme.com"]),
                Uuid::now_v7(),
            )
            .await
            .unwrap();
        directory
            .create_organization(Organization::new("Other", "other"), Uuid::now_v7())
            .await
            .unwrap();

        let candidates = directory.auto_join_candidates("acme.com").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].slug, "acme");

        assert!(directory
            .auto_join_candidates("nomatch.com")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_config_notifies_subscribers() {
        let directory = MemoryDirectory::new();
        let org = directory
            .create_organization(Organization::new("Acme", "acme"), Uuid::now_v7())
            .await
            .unwrap();

        let mut receiver = directory.subscribe();

        let mut config = org.config;
        config.analytics = false;
        let updated = directory.update_config(org.id, config).await.unwrap();
        assert!(!updated.config.analytics);

        let change = tokio::time::timeout(std::time::Duration::from_millis(100), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(change, DirectoryChange::ConfigUpdated(org.id));
    }

    #[tokio::test]
    async fn test_update_config_unknown_org() {
        let directory = MemoryDirectory::new();
        let err = directory
            .update_config(Uuid::now_v7(), OrganizationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }
}
