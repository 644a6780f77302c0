//! Tenant session state machine
//!
//! One [`TenantSession`] per principal-device. All mutation goes through
//! the explicit commands on this type; downstream features only read the
//! derived outputs and subscribe to change events. There is no ambient
//! global context anywhere in the workspace.
//!
//! ## Atomicity and staleness
//!
//! Session state sits behind a single async mutex and every command holds
//! it for its full duration, directory round-trips included, so no two
//! commands interleave. Refreshes triggered by directory change
//! notifications run *without* the lock: they capture the state generation
//! first, query the directory, then re-acquire the lock and apply only if
//! the generation is unchanged. A stale result is discarded: a slow
//! directory response must never overwrite a newer organization switch or
//! impersonation change.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use atrium_authz::Permissions;
use atrium_directory::DirectoryGateway;
use atrium_org::{Organization, OrganizationConfig, OrganizationRole, Principal};

use crate::error::{SessionError, SessionResult};
use crate::events::{SessionEvent, SessionSnapshot};
use crate::resolver::{MembershipResolver, ResolvedDirectory};
use crate::store::SessionStore;

/// Mutable session state. Only ever touched under the session mutex.
#[derive(Debug, Default)]
struct SessionState {
    principal: Option<Principal>,
    resolved: ResolvedDirectory,
    current_organization_id: Option<Uuid>,
    impersonated_organization_id: Option<Uuid>,
    /// Bumped on every state mutation; stale async results are detected by
    /// comparing against the value they captured before querying
    generation: u64,
}

impl SessionState {
    fn current_organization(&self) -> Option<&Organization> {
        self.current_organization_id
            .and_then(|id| self.resolved.organization(id))
    }

    /// The organization whose data and config govern visibility right now.
    ///
    /// An impersonated organization that has vanished from the directory
    /// falls back to the current organization; it never yields stale data.
    fn effective_organization(&self) -> Option<&Organization> {
        if let Some(target) = self.impersonated_organization_id {
            if let Some(org) = self.resolved.full_directory_organization(target) {
                return Some(org);
            }
        }
        self.current_organization()
    }

    fn current_role(&self) -> Option<OrganizationRole> {
        self.current_organization_id
            .and_then(|id| self.resolved.role(id))
    }

    /// Derive permissions for the effective organization.
    ///
    /// Unresolved state (no principal, no current organization) is
    /// default-deny, never a partially-initialized or previous value.
    fn permissions(&self) -> Permissions {
        if self.principal.is_none() {
            return Permissions::denied();
        }
        let (Some(role), Some(current)) = (self.current_role(), self.current_organization())
        else {
            return Permissions::denied();
        };
        let is_master_context = current.is_master;
        let Some(effective) = self.effective_organization() else {
            return Permissions::denied();
        };
        Permissions::derive(
            role,
            is_master_context,
            self.impersonated_organization_id.is_some(),
            &effective.config,
        )
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            principal_id: self.principal.as_ref().map(|p| p.id),
            current_organization_id: self.current_organization_id,
            effective_organization_id: self.effective_organization().map(|o| o.id),
            is_impersonating: self.impersonated_organization_id.is_some(),
            role: self.current_role(),
            permissions: self.permissions(),
        }
    }

    fn clear_access(&mut self) {
        self.resolved = ResolvedDirectory::default();
        self.current_organization_id = None;
        self.impersonated_organization_id = None;
    }
}

/// The per-principal-device tenant session.
///
/// Construct one per device, wrap it in an [`Arc`], and optionally start
/// the change listener so directory edits made elsewhere reach this
/// session:
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use atrium_directory::MemoryDirectory;
/// use atrium_session::{MemorySessionStore, TenantSession};
///
/// let directory = Arc::new(MemoryDirectory::new());
/// let store = Arc::new(MemorySessionStore::new());
/// let session = Arc::new(TenantSession::new(directory, store));
/// let _listener = session.spawn_change_listener();
/// ```
pub struct TenantSession {
    resolver: MembershipResolver,
    directory: Arc<dyn DirectoryGateway>,
    store: Arc<dyn SessionStore>,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl TenantSession {
    /// Create a session over a directory gateway and a selection store.
    pub fn new(directory: Arc<dyn DirectoryGateway>, store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            resolver: MembershipResolver::new(Arc::clone(&directory)),
            directory,
            store,
            state: Mutex::new(SessionState::default()),
            events,
        }
    }

    /// Resolve the session for an authenticated principal.
    ///
    /// Loads memberships (running domain auto-join when there are none),
    /// restores the persisted current-organization selection when it is
    /// still valid, and otherwise selects the first organization of the
    /// deterministic resolver order that admits the principal's email
    /// domain. Impersonation is never restored: a fresh session always
    /// starts in direct context.
    ///
    /// Fails closed: a directory failure clears any previously resolved
    /// access before the error is returned, and an empty accessible set
    /// yields [`SessionError::NoAccessibleOrganization`] so the caller can
    /// route to onboarding.
    pub async fn resolve_session(&self, principal: Principal) -> SessionResult<SessionSnapshot> {
        let mut state = self.state.lock().await;
        let before = state.snapshot();
        state.generation += 1;
        state.principal = Some(principal.clone());

        let resolved = match self.resolver.resolve(&principal).await {
            Ok(resolved) => resolved,
            Err(e) => {
                state.clear_access();
                self.emit_if_changed(&before, &state);
                return Err(e);
            }
        };

        state.resolved = resolved;
        state.impersonated_organization_id = None;

        let email_domain = principal.email_domain();
        let persisted = match self.store.load_current(principal.id).await {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::warn!(error = %e, "session store read failed; using default selection");
                None
            }
        };

        let selection = persisted
            .filter(|id| {
                state
                    .resolved
                    .organization(*id)
                    .is_some_and(|o| o.admits_email_domain(email_domain.as_deref()))
            })
            .or_else(|| {
                state
                    .resolved
                    .organizations
                    .iter()
                    .find(|o| o.admits_email_domain(email_domain.as_deref()))
                    .map(|o| o.id)
            });

        let Some(org_id) = selection else {
            state.current_organization_id = None;
            self.emit_if_changed(&before, &state);
            return Err(SessionError::NoAccessibleOrganization);
        };

        state.current_organization_id = Some(org_id);
        self.persist_selection(principal.id, org_id).await;

        tracing::debug!(
            principal_id = %principal.id,
            organization_id = %org_id,
            restored = persisted == Some(org_id),
            "session resolved"
        );
        self.emit_if_changed(&before, &state);
        Ok(state.snapshot())
    }

    /// Select the current organization.
    ///
    /// Valid only for organizations in the resolved accessible set whose
    /// domain restriction (if any) matches the principal's email domain.
    /// Switching always exits impersonation, even when re-selecting the
    /// organization that is already current. Rejections leave state
    /// unchanged.
    pub async fn select_current_organization(
        &self,
        org_id: Uuid,
    ) -> SessionResult<SessionSnapshot> {
        let mut state = self.state.lock().await;
        let principal = state
            .principal
            .clone()
            .ok_or(SessionError::Unauthenticated)?;

        let email_domain = principal.email_domain();
        let admits = match state.resolved.organization(org_id) {
            None => {
                return Err(SessionError::InvalidOrganizationSwitch {
                    organization_id: org_id,
                    reason: "organization is not in the principal's accessible set".to_string(),
                });
            }
            Some(org) => org.admits_email_domain(email_domain.as_deref()),
        };
        if !admits {
            return Err(SessionError::InvalidOrganizationSwitch {
                organization_id: org_id,
                reason: "organization restricts access to another email domain".to_string(),
            });
        }

        let before = state.snapshot();
        state.generation += 1;
        state.current_organization_id = Some(org_id);
        // Switching organizations always exits impersonation
        state.impersonated_organization_id = None;
        self.persist_selection(principal.id, org_id).await;

        tracing::debug!(organization_id = %org_id, "current organization selected");
        self.emit_if_changed(&before, &state);
        Ok(state.snapshot())
    }

    /// Enter or exit impersonation.
    ///
    /// Entering requires an owner/admin role in the master organization,
    /// the master organization as the current context, and a non-master
    /// target present in the full directory. Exiting (`None`) is always
    /// permitted. Rejections leave state unchanged.
    pub async fn set_impersonated_organization(
        &self,
        org_id: Option<Uuid>,
    ) -> SessionResult<SessionSnapshot> {
        let mut state = self.state.lock().await;

        let Some(target) = org_id else {
            let before = state.snapshot();
            if state.impersonated_organization_id.take().is_some() {
                state.generation += 1;
                tracing::debug!("impersonation cleared");
            }
            self.emit_if_changed(&before, &state);
            return Ok(state.snapshot());
        };

        if state.principal.is_none() {
            return Err(SessionError::Unauthenticated);
        }
        if !state.resolved.is_master_admin() {
            return Err(SessionError::ImpersonationDenied {
                reason: "requires an owner or admin role in the master organization".to_string(),
            });
        }
        if !state.current_organization().is_some_and(|o| o.is_master) {
            return Err(SessionError::ImpersonationDenied {
                reason: "only available while the master organization is the current context"
                    .to_string(),
            });
        }
        match state.resolved.full_directory_organization(target) {
            None => {
                return Err(SessionError::ImpersonationDenied {
                    reason: format!("organization {target} is not in the directory"),
                });
            }
            Some(org) if org.is_master => {
                return Err(SessionError::ImpersonationDenied {
                    reason: "the master organization cannot be impersonated".to_string(),
                });
            }
            Some(_) => {}
        }

        let before = state.snapshot();
        state.generation += 1;
        state.impersonated_organization_id = Some(target);

        tracing::debug!(organization_id = %target, "impersonation entered");
        self.emit_if_changed(&before, &state);
        Ok(state.snapshot())
    }

    /// Write an organization's feature configuration.
    ///
    /// Permitted only for a master-org admin acting from their own master
    /// context and not impersonating; platform infrastructure and tenant
    /// privacy toggles are edited by id from the operator's own context.
    /// The session does not patch its own cached copy: the store's change
    /// notification (or an explicit refetch) drives a fresh resolution
    /// pass.
    pub async fn update_organization_config(
        &self,
        org_id: Uuid,
        config: OrganizationConfig,
    ) -> SessionResult<Organization> {
        let state = self.state.lock().await;
        if state.principal.is_none() {
            return Err(SessionError::Unauthenticated);
        }
        if state.impersonated_organization_id.is_some() {
            return Err(SessionError::ConfigWriteDenied {
                reason: "configuration writes are not permitted while impersonating".to_string(),
            });
        }
        if !state.permissions().is_master_admin {
            return Err(SessionError::ConfigWriteDenied {
                reason: "requires a master organization administrator".to_string(),
            });
        }

        let updated = self.directory.update_config(org_id, config).await?;
        tracing::debug!(organization_id = %org_id, "organization config written");
        Ok(updated)
    }

    /// Re-run resolution for the current principal.
    ///
    /// Re-validates the current selection and the impersonation overlay
    /// against the fresh directory. Fails closed on directory errors.
    pub async fn refetch_organizations(&self) -> SessionResult<SessionSnapshot> {
        let mut state = self.state.lock().await;
        let principal = state
            .principal
            .clone()
            .ok_or(SessionError::Unauthenticated)?;

        let before = state.snapshot();
        state.generation += 1;

        match self.resolver.resolve(&principal).await {
            Ok(resolved) => {
                self.apply_resolution(&mut state, resolved, &principal).await;
                self.emit_if_changed(&before, &state);
                if state.resolved.is_empty() {
                    return Err(SessionError::NoAccessibleOrganization);
                }
                Ok(state.snapshot())
            }
            Err(e) => {
                state.clear_access();
                self.emit_if_changed(&before, &state);
                Err(e)
            }
        }
    }

    /// Drop all session state (identity-provider sign-out).
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        let before = state.snapshot();
        let generation = state.generation + 1;
        *state = SessionState::default();
        state.generation = generation;
        self.emit_if_changed(&before, &state);
    }

    /// The organization whose data and config currently govern visibility.
    pub async fn effective_organization(&self) -> Option<Organization> {
        self.state.lock().await.effective_organization().cloned()
    }

    /// The derived capability set for the effective organization.
    pub async fn permissions(&self) -> Permissions {
        self.state.lock().await.permissions()
    }

    /// Whether a cross-tenant impersonation overlay is active.
    pub async fn is_impersonating(&self) -> bool {
        self.state
            .lock()
            .await
            .impersonated_organization_id
            .is_some()
    }

    /// The principal's role in the current organization.
    pub async fn current_role(&self) -> Option<OrganizationRole> {
        self.state.lock().await.current_role()
    }

    /// The organizations the principal may select as current, in the
    /// resolver's stable order. Feeds the organization switcher.
    pub async fn accessible_organizations(&self) -> Vec<Organization> {
        self.state.lock().await.resolved.organizations.clone()
    }

    /// A point-in-time view of the session.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Subscribe to session change events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Start consuming directory change notifications.
    ///
    /// Every notification triggers a fresh resolution pass; nothing is
    /// patched field-by-field from the notification payload. The returned
    /// handle stops the listener when dropped via
    /// [`tokio::task::JoinHandle::abort`].
    pub fn spawn_change_listener(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let session = Arc::clone(self);
        let mut changes = session.directory.subscribe();
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        tracing::debug!(?change, "directory change received");
                        session.refresh().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // A full resolution pass covers whatever was missed
                        tracing::debug!(skipped, "change stream lagged; running catch-up pass");
                        session.refresh().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// One notification-triggered resolution pass.
    ///
    /// Runs without the session lock while querying the directory. The
    /// captured generation token decides whether the result may be
    /// applied; anything older than the session's current generation is
    /// discarded.
    async fn refresh(&self) {
        let (principal, generation) = {
            let state = self.state.lock().await;
            (state.principal.clone(), state.generation)
        };
        let Some(principal) = principal else {
            return;
        };

        let result = self.resolver.resolve(&principal).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::warn!(
                captured = generation,
                current = state.generation,
                "discarding stale directory resolution"
            );
            return;
        }
        let before = state.snapshot();
        state.generation += 1;
        match result {
            Ok(resolved) => {
                self.apply_resolution(&mut state, resolved, &principal).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "directory refresh failed; failing closed");
                state.clear_access();
            }
        }
        self.emit_if_changed(&before, &state);
    }

    /// Install a fresh resolution, re-validating selection and overlay.
    async fn apply_resolution(
        &self,
        state: &mut SessionState,
        resolved: ResolvedDirectory,
        principal: &Principal,
    ) {
        state.resolved = resolved;
        let email_domain = principal.email_domain();

        let current_valid = state.current_organization_id.is_some_and(|id| {
            state
                .resolved
                .organization(id)
                .is_some_and(|o| o.admits_email_domain(email_domain.as_deref()))
        });
        if !current_valid {
            let fallback = state
                .resolved
                .organizations
                .iter()
                .find(|o| o.admits_email_domain(email_domain.as_deref()))
                .map(|o| o.id);
            if state.current_organization_id.is_some() {
                tracing::warn!(
                    previous = ?state.current_organization_id,
                    fallback = ?fallback,
                    "current organization no longer selectable"
                );
            }
            state.current_organization_id = fallback;
            if let Some(org_id) = fallback {
                self.persist_selection(principal.id, org_id).await;
            }
        }

        if let Some(target) = state.impersonated_organization_id {
            let master_admin = state.resolved.is_master_admin();
            let current_is_master = state.current_organization().is_some_and(|o| o.is_master);
            let target_valid = state
                .resolved
                .full_directory_organization(target)
                .is_some_and(|o| !o.is_master);
            if !(master_admin && current_is_master && target_valid) {
                tracing::warn!(
                    organization_id = %target,
                    "impersonation overlay no longer valid; reverting to direct context"
                );
                state.impersonated_organization_id = None;
            }
        }
    }

    /// Best-effort persistence of the current-organization selection.
    async fn persist_selection(&self, principal_id: Uuid, org_id: Uuid) {
        if let Err(e) = self.store.save_current(principal_id, org_id).await {
            tracing::warn!(error = %e, "failed to persist organization selection");
        }
    }

    fn emit_if_changed(&self, before: &SessionSnapshot, state: &SessionState) {
        let after = state.snapshot();
        if after.effective_organization_id != before.effective_organization_id
            || after.permissions != before.permissions
        {
            let _ = self.events.send(SessionEvent::ContextChanged(after));
        }
    }
}

impl std::fmt::Debug for TenantSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantSession").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySessionStore;
    use atrium_directory::MemoryDirectory;

    fn session_over(directory: &Arc<MemoryDirectory>) -> TenantSession {
        TenantSession::new(
            Arc::clone(directory) as Arc<dyn DirectoryGateway>,
            Arc::new(MemorySessionStore::new()),
        )
    }

    #[tokio::test]
    async fn test_unresolved_session_is_default_deny() {
        let directory = Arc::new(MemoryDirectory::new());
        let session = session_over(&directory);

        assert_eq!(session.permissions().await, Permissions::denied());
        assert!(session.effective_organization().await.is_none());
        assert!(!session.is_impersonating().await);
    }

    #[tokio::test]
    async fn test_commands_require_principal() {
        let directory = Arc::new(MemoryDirectory::new());
        let session = session_over(&directory);

        assert!(matches!(
            session.select_current_organization(Uuid::now_v7()).await,
            Err(SessionError::Unauthenticated)
        ));
        assert!(matches!(
            session
                .set_impersonated_organization(Some(Uuid::now_v7()))
                .await,
            Err(SessionError::Unauthenticated)
        ));
        assert!(matches!(
            session.refetch_organizations().await,
            Err(SessionError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_exit_impersonation_without_principal_is_noop() {
        let directory = Arc::new(MemoryDirectory::new());
        let session = session_over(&directory);

        // Exiting is unconditional even on an unresolved session
        let snapshot = session.set_impersonated_organization(None).await.unwrap();
        assert!(!snapshot.is_impersonating);
    }

    #[tokio::test]
    async fn test_clear_resets_to_default_deny() {
        let directory = Arc::new(MemoryDirectory::new());
        let principal = Principal::new(Uuid::now_v7(), "ada@acme.com");
        directory
            .create_organization(Organization::new("Acme", "acme"), principal.id)
            .await
            .unwrap();

        let session = session_over(&directory);
        session.resolve_session(principal).await.unwrap();
        assert!(session.effective_organization().await.is_some());

        session.clear().await;
        assert_eq!(session.permissions().await, Permissions::denied());
        assert!(session.effective_organization().await.is_none());
    }
}
