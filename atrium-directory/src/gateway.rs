//! Directory gateway trait
//!
//! This module defines the typed request/response interface over the tenant
//! directory store. The rest of the workspace talks to the store only
//! through this trait, so backends can range from the in-memory map used in
//! tests to a remote database service.

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use atrium_org::{Membership, Organization, OrganizationConfig};

use crate::change::DirectoryChange;
use crate::error::DirectoryResult;

/// Typed access to the tenant directory store.
///
/// All methods surface failures as [`crate::DirectoryError`] values rather
/// than blocking indefinitely; backends are expected to impose their own
/// timeouts. Implementations must uphold three invariants:
///
/// - at most one organization with `is_master = true`;
/// - one membership per (organization, principal) pair, with duplicate
///   creation failing typed rather than overwriting;
/// - [`create_organization`](DirectoryGateway::create_organization) writes
///   the organization and its founding owner membership as one logical
///   transaction.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    /// Load one organization by id. `Ok(None)` when it does not exist.
    async fn organization(&self, org_id: Uuid) -> DirectoryResult<Option<Organization>>;

    /// Load the full organization directory.
    ///
    /// Used by the impersonation overlay; only reachable by principals that
    /// already proved master-org admin rights during resolution.
    async fn all_organizations(&self) -> DirectoryResult<Vec<Organization>>;

    /// Load all memberships held by a principal.
    async fn memberships_for_principal(
        &self,
        principal_id: Uuid,
    ) -> DirectoryResult<Vec<Membership>>;

    /// Active organizations that auto-join principals of the given email
    /// domain.
    async fn auto_join_candidates(&self, email_domain: &str)
        -> DirectoryResult<Vec<Organization>>;

    /// Create an organization together with its founding `Owner`
    /// membership, as one logical transaction.
    ///
    /// Fails with [`crate::DirectoryError::MasterConflict`] when the
    /// organization claims `is_master` and a master organization already
    /// exists. On any failure, neither the organization nor the membership
    /// is persisted.
    async fn create_organization(
        &self,
        organization: Organization,
        founder_id: Uuid,
    ) -> DirectoryResult<Organization>;

    /// Create a membership.
    ///
    /// Fails with [`crate::DirectoryError::DuplicateMembership`] when the
    /// (organization, principal) pair already has one.
    async fn create_membership(&self, membership: Membership) -> DirectoryResult<Membership>;

    /// Replace an organization's feature configuration and notify
    /// subscribers.
    async fn update_config(
        &self,
        org_id: Uuid,
        config: OrganizationConfig,
    ) -> DirectoryResult<Organization>;

    /// Subscribe to directory change notifications.
    fn subscribe(&self) -> broadcast::Receiver<DirectoryChange>;
}
