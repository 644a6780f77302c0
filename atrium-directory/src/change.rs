//! Directory change notifications
//!
//! Push-style notifications emitted by the store when another session
//! mutates directory state. Consumers must treat any of these as a trigger
//! for a fresh resolution pass; patching individual fields from a
//! notification can leave session state violating its invariants.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A change pushed by the tenant directory store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryChange {
    /// A new organization was created
    OrganizationCreated(Uuid),

    /// An organization's fields were updated
    OrganizationUpdated(Uuid),

    /// An organization's feature configuration was updated
    ConfigUpdated(Uuid),

    /// A membership was created
    MembershipCreated {
        /// Organization the membership belongs to
        organization_id: Uuid,
        /// Principal the membership belongs to
        principal_id: Uuid,
    },
}

impl DirectoryChange {
    /// The organization the change is scoped to.
    pub fn organization_id(&self) -> Uuid {
        match self {
            DirectoryChange::OrganizationCreated(id)
            | DirectoryChange::OrganizationUpdated(id)
            | DirectoryChange::ConfigUpdated(id) => *id,
            DirectoryChange::MembershipCreated {
                organization_id, ..
            } => *organization_id,
        }
    }
}
