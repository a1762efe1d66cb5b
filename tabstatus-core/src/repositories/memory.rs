//! src/repositories/memory.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use parking_lot::Mutex;
use tabstatus_common::models::PrincipalId;
use tabstatus_common::traits::repository_traits::StatusRepository;
use crate::Error;

/// Keeps the "persisted" document in memory. Used when no status file is
/// wanted and by tests that need to inspect what was written.
#[derive(Debug, Default)]
pub struct MemoryStatusRepository {
    document: Mutex<HashMap<PrincipalId, String>>,
    saves: AtomicUsize,
}

impl MemoryStatusRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(statuses: HashMap<PrincipalId, String>) -> Self {
        Self {
            document: Mutex::new(statuses),
            saves: AtomicUsize::new(0),
        }
    }

    /// What the last save wrote.
    pub fn persisted(&self) -> HashMap<PrincipalId, String> {
        self.document.lock().clone()
    }

    /// Replaces the document behind the store's back, as an external edit would.
    pub fn overwrite(&self, statuses: HashMap<PrincipalId, String>) {
        *self.document.lock() = statuses;
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusRepository for MemoryStatusRepository {
    async fn load_all(&self) -> Result<HashMap<PrincipalId, String>, Error> {
        let mut statuses = self.document.lock().clone();
        statuses.retain(|_, raw| !raw.is_empty());
        Ok(statuses)
    }

    async fn save_all(&self, statuses: &HashMap<PrincipalId, String>) -> Result<(), Error> {
        *self.document.lock() = statuses.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
