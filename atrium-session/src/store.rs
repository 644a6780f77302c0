//! Session persistence
//!
//! Exactly one value is persisted per principal-device: the last-selected
//! current organization id, used to restore the selection on the next
//! session start. The impersonation overlay is deliberately not persisted
//! and never restored; a fresh session always starts in direct context.
//!
//! Persistence is best-effort. A store failure costs the restore hint, not
//! the session: callers log and continue.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A session-store failure.
#[derive(Debug, Error)]
#[error("Session store unavailable: {0}")]
pub struct SessionStoreError(pub String);

/// Per-principal-device persistence of the current-organization selection.
///
/// Each device constructs its own [`crate::TenantSession`] with its own
/// store handle, so keys are principal ids; device scoping comes from the
/// store instance itself (browser local storage, a per-device file, a
/// device-keyed table).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted current-organization selection.
    async fn load_current(&self, principal_id: Uuid) -> Result<Option<Uuid>, SessionStoreError>;

    /// Persist the current-organization selection.
    async fn save_current(
        &self,
        principal_id: Uuid,
        organization_id: Uuid,
    ) -> Result<(), SessionStoreError>;

    /// Drop the persisted selection.
    async fn clear_current(&self, principal_id: Uuid) -> Result<(), SessionStoreError>;
}

/// In-memory [`SessionStore`] for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<Uuid, Uuid>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load_current(&self, principal_id: Uuid) -> Result<Option<Uuid>, SessionStoreError> {
        Ok(self.entries.read().await.get(&principal_id).copied())
    }

    async fn save_current(
        &self,
        principal_id: Uuid,
        organization_id: Uuid,
    ) -> Result<(), SessionStoreError> {
        self.entries
            .write()
            .await
            .insert(principal_id, organization_id);
        Ok(())
    }

    async fn clear_current(&self, principal_id: Uuid) -> Result<(), SessionStoreError> {
        self.entries.write().await.remove(&principal_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemorySessionStore::new();
        let principal_id = Uuid::now_v7();
        let org_id = Uuid::now_v7();

        assert_eq!(store.load_current(principal_id).await.unwrap(), None);

        store.save_current(principal_id, org_id).await.unwrap();
        assert_eq!(store.load_current(principal_id).await.unwrap(), Some(org_id));
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = MemorySessionStore::new();
        let principal_id = Uuid::now_v7();
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();

        store.save_current(principal_id, first).await.unwrap();
        store.save_current(principal_id, second).await.unwrap();
        assert_eq!(
            store.load_current(principal_id).await.unwrap(),
            Some(second)
        );
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemorySessionStore::new();
        let principal_id = Uuid::now_v7();

        store
            .save_current(principal_id, Uuid::now_v7())
            .await
            .unwrap();
        store.clear_current(principal_id).await.unwrap();
        assert_eq!(store.load_current(principal_id).await.unwrap(), None);
    }
}
