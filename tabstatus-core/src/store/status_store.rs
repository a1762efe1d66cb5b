//! src/store/status_store.rs
//!
//! The authoritative map of principal → raw status plus its backing file.
//! Every mutation and the rewrite that follows it happen under a single
//! lock, so concurrent updates cannot drop each other's entries on disk.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use tabstatus_common::models::{PlayerStatus, PrincipalId};
use tabstatus_common::traits::repository_traits::StatusRepository;
use crate::Error;

/// Result of a mutation as far as the disk is concerned. The in-memory
/// change has already happened in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Persisted,
    /// The save failed and was logged; memory is now ahead of disk.
    PersistFailed,
    /// Nothing changed, nothing was written.
    Unchanged,
}

pub struct StatusStore {
    statuses: Mutex<HashMap<PrincipalId, String>>,
    repo: Arc<dyn StatusRepository>,
}

impl StatusStore {
    pub fn new(repo: Arc<dyn StatusRepository>) -> Self {
        debug!("StatusStore::new() called");
        Self {
            statuses: Mutex::new(HashMap::new()),
            repo,
        }
    }

    /// Creates the store and loads the persisted document into it.
    pub async fn open(repo: Arc<dyn StatusRepository>) -> Result<Self, Error> {
        let store = Self::new(repo);
        store.load().await?;
        Ok(store)
    }

    /// Replaces the in-memory map with the persisted document. If reading
    /// fails the current entries are kept and the error is returned.
    pub async fn load(&self) -> Result<usize, Error> {
        let mut statuses = self.statuses.lock().await;
        let loaded = self.repo.load_all().await?;
        *statuses = loaded;
        info!("Loaded {} status(es).", statuses.len());
        Ok(statuses.len())
    }

    pub async fn get(&self, principal: &PrincipalId) -> Option<String> {
        self.statuses.lock().await.get(principal).cloned()
    }

    pub async fn get_entry(&self, principal: &PrincipalId) -> Option<PlayerStatus> {
        self.get(principal)
            .await
            .map(|raw| PlayerStatus::new(*principal, raw))
    }

    pub async fn contains(&self, principal: &PrincipalId) -> bool {
        self.statuses.lock().await.contains_key(principal)
    }

    pub async fn len(&self) -> usize {
        self.statuses.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.statuses.lock().await.is_empty()
    }

    /// Consistent copy of every entry, taken under the store lock.
    pub async fn snapshot(&self) -> HashMap<PrincipalId, String> {
        self.statuses.lock().await.clone()
    }

    /// Runs `read` against the live map with the store lock held, so no
    /// mutation can land until it returns.
    pub async fn read_locked<R>(&self, read: impl FnOnce(&HashMap<PrincipalId, String>) -> R) -> R {
        let statuses = self.statuses.lock().await;
        read(&statuses)
    }

    /// Stores `raw` for `principal` (last write wins) and rewrites the
    /// document. An empty `raw` removes the entry instead.
    pub async fn set(&self, principal: PrincipalId, raw: impl Into<String>) -> WriteOutcome {
        let raw = raw.into();
        if raw.is_empty() {
            return self.remove(&principal).await;
        }
        let mut statuses = self.statuses.lock().await;
        statuses.insert(principal, raw);
        self.persist_locked(&statuses).await
    }

    /// Idempotent delete; absent entries leave the document untouched.
    pub async fn remove(&self, principal: &PrincipalId) -> WriteOutcome {
        let mut statuses = self.statuses.lock().await;
        if statuses.remove(principal).is_none() {
            debug!("No status stored for {}; nothing to remove.", principal);
            return WriteOutcome::Unchanged;
        }
        self.persist_locked(&statuses).await
    }

    /// Writes the full document now.
    pub async fn save(&self) -> Result<(), Error> {
        let statuses = self.statuses.lock().await;
        self.repo.save_all(&statuses).await?;
        debug!("Statuses saved ({} entries).", statuses.len());
        Ok(())
    }

    async fn persist_locked(&self, statuses: &HashMap<PrincipalId, String>) -> WriteOutcome {
        match self.repo.save_all(statuses).await {
            Ok(()) => {
                debug!("Statuses saved ({} entries).", statuses.len());
                WriteOutcome::Persisted
            }
            Err(e) => {
                error!("Could not save statuses: {:?}", e);
                WriteOutcome::PersistFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStatusRepository;

    #[tokio::test]
    async fn test_set_overwrites_and_persists() {
        let repo = Arc::new(MemoryStatusRepository::new());
        let store = StatusStore::new(repo.clone());
        let id = PrincipalId::new_random();

        assert_eq!(store.set(id, "one").await, WriteOutcome::Persisted);
        assert_eq!(store.set(id, "two").await, WriteOutcome::Persisted);
        assert_eq!(store.get(&id).await.as_deref(), Some("two"));
        assert_eq!(repo.persisted().get(&id).map(String::as_str), Some("two"));
        assert_eq!(repo.save_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_status_is_removal() {
        let repo = Arc::new(MemoryStatusRepository::new());
        let store = StatusStore::new(repo.clone());
        let id = PrincipalId::new_random();

        store.set(id, "busy").await;
        assert_eq!(store.set(id, "").await, WriteOutcome::Persisted);
        assert!(!store.contains(&id).await);
        assert!(repo.persisted().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let repo = Arc::new(MemoryStatusRepository::new());
        let store = StatusStore::new(repo.clone());
        let other = PrincipalId::new_random();
        store.set(other, "x").await;

        let before = store.snapshot().await;
        assert_eq!(store.remove(&PrincipalId::new_random()).await, WriteOutcome::Unchanged);
        assert_eq!(store.snapshot().await, before);
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn test_load_replaces_wholesale() -> Result<(), Error> {
        let stale = PrincipalId::new_random();
        let fresh = PrincipalId::new_random();
        let repo = Arc::new(MemoryStatusRepository::new());
        let store = StatusStore::new(repo.clone());
        store.set(stale, "old").await;

        repo.overwrite(HashMap::from([(fresh, "new".to_string())]));
        assert_eq!(store.load().await?, 1);
        assert!(!store.contains(&stale).await);
        assert_eq!(store.get_entry(&fresh).await, Some(PlayerStatus::new(fresh, "new")));
        Ok(())
    }
}
