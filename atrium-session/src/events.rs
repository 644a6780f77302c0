//! Session change events
//!
//! Downstream features subscribe to the session instead of polling it. An
//! event is emitted whenever the effective organization or the derived
//! permission set changes; consumers re-read whatever else they need from
//! the session on receipt.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_authz::Permissions;
use atrium_org::OrganizationRole;

/// A point-in-time view of the session.
///
/// Carried by [`SessionEvent`] and returned by session commands so callers
/// can render without a second read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// The authenticated principal, when resolved
    pub principal_id: Option<Uuid>,

    /// The selected current organization
    pub current_organization_id: Option<Uuid>,

    /// The organization whose data and config currently govern visibility:
    /// the impersonated organization when the overlay is active, else the
    /// current organization
    pub effective_organization_id: Option<Uuid>,

    /// Whether a cross-tenant impersonation overlay is active
    pub is_impersonating: bool,

    /// The principal's role in the current organization
    pub role: Option<OrganizationRole>,

    /// The derived capability set for the effective organization
    pub permissions: Permissions,
}

impl SessionSnapshot {
    /// The unauthenticated, default-deny snapshot.
    pub fn empty() -> Self {
        Self {
            principal_id: None,
            current_organization_id: None,
            effective_organization_id: None,
            is_impersonating: false,
            role: None,
            permissions: Permissions::denied(),
        }
    }
}

/// An event on the session's subscription stream.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The effective organization or the permission set changed
    ContextChanged(SessionSnapshot),
}

impl SessionEvent {
    /// The snapshot carried by this event.
    pub fn snapshot(&self) -> &SessionSnapshot {
        match self {
            SessionEvent::ContextChanged(snapshot) => snapshot,
        }
    }
}
