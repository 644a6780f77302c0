//! Membership resolution
//!
//! This module turns a principal into the set of organizations they may
//! select as their current context, performing domain auto-join for
//! principals that arrive with no memberships at all.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use atrium_directory::{DirectoryError, DirectoryGateway};
use atrium_org::{Membership, Organization, OrganizationRole, Principal};

use crate::error::SessionResult;

/// The outcome of one resolution pass.
///
/// `organizations` is the selectable set, sorted by name
/// (case-insensitive) then by id so that default selection is
/// deterministic regardless of store return order. `full_directory` is
/// loaded only for master-org admins and backs the impersonation overlay;
/// for everyone else it is empty.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDirectory {
    /// Organizations the principal may select as current, in stable order
    pub organizations: Vec<Organization>,

    /// The principal's role per organization id
    pub roles: HashMap<Uuid, OrganizationRole>,

    /// The principal's role in the master organization, when they hold one
    pub master_role: Option<OrganizationRole>,

    /// All active organizations; populated only for master-org admins
    pub full_directory: Vec<Organization>,
}

impl ResolvedDirectory {
    /// Look up an organization in the selectable set.
    pub fn organization(&self, org_id: Uuid) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == org_id)
    }

    /// Look up an organization in the full directory.
    pub fn full_directory_organization(&self, org_id: Uuid) -> Option<&Organization> {
        self.full_directory.iter().find(|o| o.id == org_id)
    }

    /// The principal's role in an organization of the selectable set.
    pub fn role(&self, org_id: Uuid) -> Option<OrganizationRole> {
        self.roles.get(&org_id).copied()
    }

    /// Whether the principal is an owner or admin of the master
    /// organization.
    pub fn is_master_admin(&self) -> bool {
        self.master_role.is_some_and(|r| r.is_admin())
    }

    /// Whether the selectable set is empty.
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }
}

fn sort_organizations(organizations: &mut [Organization]) {
    organizations.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Resolves a principal's accessible organizations against the directory.
pub struct MembershipResolver {
    directory: Arc<dyn DirectoryGateway>,
}

impl MembershipResolver {
    /// Create a resolver over a directory gateway.
    pub fn new(directory: Arc<dyn DirectoryGateway>) -> Self {
        Self { directory }
    }

    /// Resolve the accessible organization set for a principal.
    ///
    /// A principal with no memberships goes through domain auto-join
    /// first. An empty result is a *successful* resolution; the caller
    /// routes the principal to onboarding. Any directory failure aborts
    /// the pass with a typed error; callers must drop previously cached
    /// sets rather than keep serving them.
    pub async fn resolve(&self, principal: &Principal) -> SessionResult<ResolvedDirectory> {
        let mut memberships = self
            .directory
            .memberships_for_principal(principal.id)
            .await?;

        if memberships.is_empty() {
            memberships = self.try_auto_join(principal).await?;
        }
        if memberships.is_empty() {
            return Ok(ResolvedDirectory::default());
        }

        let mut organizations = Vec::with_capacity(memberships.len());
        let mut roles = HashMap::with_capacity(memberships.len());
        for membership in &memberships {
            match self.directory.organization(membership.organization_id).await? {
                Some(org) if org.is_active => {
                    roles.insert(org.id, membership.role);
                    organizations.push(org);
                }
                _ => {
                    // Membership referencing a vanished or deactivated org:
                    // not selectable, not an error
                    tracing::debug!(
                        organization_id = %membership.organization_id,
                        "skipping membership in unavailable organization"
                    );
                }
            }
        }
        sort_organizations(&mut organizations);

        let master_role = organizations
            .iter()
            .find(|o| o.is_master)
            .and_then(|o| roles.get(&o.id))
            .copied();

        let full_directory = if master_role.is_some_and(|r| r.is_admin()) {
            let mut all = self.directory.all_organizations().await?;
            all.retain(|o| o.is_active);
            sort_organizations(&mut all);
            all
        } else {
            Vec::new()
        };

        Ok(ResolvedDirectory {
            organizations,
            roles,
            master_role,
            full_directory,
        })
    }

    /// Attempt domain auto-join for a membership-less principal.
    ///
    /// Exactly one candidate organization joins the principal as `Member`
    /// and re-queries. More than one candidate performs no join at all:
    /// picking one by store order could enroll the principal into the
    /// wrong tenant, so the ambiguity routes to onboarding instead.
    async fn try_auto_join(&self, principal: &Principal) -> SessionResult<Vec<Membership>> {
        let Some(domain) = principal.email_domain() else {
            return Ok(Vec::new());
        };

        let candidates = self.directory.auto_join_candidates(&domain).await?;
        match candidates.as_slice() {
            [] => Ok(Vec::new()),
            [candidate] => {
                let membership = Membership::auto_join(candidate.id, principal.id);
                match self.directory.create_membership(membership).await {
                    Ok(_) => {
                        tracing::info!(
                            organization_id = %candidate.id,
                            principal_id = %principal.id,
                            domain,
                            "domain auto-join created membership"
                        );
                    }
                    Err(DirectoryError::DuplicateMembership { .. }) => {
                        // Another device won the race; the membership
                        // exists and the re-query below will find it
                        tracing::debug!(
                            organization_id = %candidate.id,
                            principal_id = %principal.id,
                            "auto-join membership already exists"
                        );
                    }
                    // Creation and re-query are one logical step: a failed
                    // join surfaces as a failed resolution, never as a
                    // false "no organization" result
                    Err(e) => return Err(e.into()),
                }
                Ok(self
                    .directory
                    .memberships_for_principal(principal.id)
                    .await?)
            }
            candidates => {
                tracing::warn!(
                    principal_id = %principal.id,
                    domain,
                    candidates = candidates.len(),
                    "ambiguous domain auto-join; no membership created"
                );
                Ok(Vec::new())
            }
        }
    }
}
