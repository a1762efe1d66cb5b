// File: tabstatus-core/src/test_utils/helpers.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use tabstatus_common::capabilities::{ADMIN_SET, FORMAT_COLOR, GROUP_SET, SET_OWN};
use tabstatus_common::models::{GroupEntry, Participant, PrincipalId, StatusConfig};
use tabstatus_common::traits::{Presence, StatusRepository};
use crate::auth::{MemoryCapabilityProvider, WILDCARD};
use crate::config::ConfigManager;
use crate::presence::Roster;
use crate::repositories::MemoryStatusRepository;
use crate::services::StatusManager;
use crate::store::StatusStore;
use crate::Error;

/// Repository whose saves (and optionally loads) fail on demand, for
/// exercising the "memory ahead of disk" paths.
#[derive(Debug, Default)]
pub struct FailingStatusRepository {
    inner: MemoryStatusRepository,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
}

impl FailingStatusRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn persisted(&self) -> HashMap<PrincipalId, String> {
        self.inner.persisted()
    }
}

#[async_trait]
impl StatusRepository for FailingStatusRepository {
    async fn load_all(&self) -> Result<HashMap<PrincipalId, String>, Error> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(Error::Persistence("simulated load failure".into()));
        }
        self.inner.load_all().await
    }

    async fn save_all(&self, statuses: &HashMap<PrincipalId, String>) -> Result<(), Error> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Persistence("simulated save failure".into()));
        }
        self.inner.save_all(statuses).await
    }
}

/// Everything a StatusManager needs, wired in memory.
pub struct TestHarness {
    pub manager: Arc<StatusManager>,
    pub capabilities: Arc<MemoryCapabilityProvider>,
    pub roster: Arc<Roster>,
    pub store: Arc<StatusStore>,
    pub config: Arc<ConfigManager>,
}

impl TestHarness {
    /// Default config, empty in-memory repository.
    pub fn new() -> Self {
        Self::build(StatusConfig::default(), Arc::new(MemoryStatusRepository::new()))
    }

    pub fn with_config(config: StatusConfig) -> Self {
        Self::build(config, Arc::new(MemoryStatusRepository::new()))
    }

    /// The presentation layer is the harness roster.
    pub fn build(config: StatusConfig, repo: Arc<dyn StatusRepository>) -> Self {
        let roster = Arc::new(Roster::new());
        let mut harness = Self::build_with_presence(config, repo, roster.clone());
        harness.roster = roster;
        harness
    }

    /// Same as [`TestHarness::build`] with a custom presentation layer. The
    /// `roster` field is then only used for capability bookkeeping in `join`.
    pub fn build_with_presence(
        config: StatusConfig,
        repo: Arc<dyn StatusRepository>,
        presence: Arc<dyn Presence>,
    ) -> Self {
        let config = Arc::new(ConfigManager::in_memory(config));
        let store = Arc::new(StatusStore::new(repo));
        let capabilities = Arc::new(MemoryCapabilityProvider::new());
        capabilities.grant(PrincipalId::CONSOLE, WILDCARD);
        let roster = Arc::new(Roster::new());
        let manager = Arc::new(StatusManager::new(
            config.clone(),
            store.clone(),
            capabilities.clone(),
            presence,
        ));
        Self { manager, capabilities, roster, store, config }
    }

    /// Joins a participant holding `capabilities`.
    pub fn join(&self, name: &str, capabilities: &[&str]) -> Participant {
        let participant = Participant::named(name);
        self.roster.join(participant.clone());
        self.capabilities.grant_all(participant.id, capabilities.iter().copied());
        participant
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A player allowed to set their own status in color.
pub fn player_caps() -> Vec<&'static str> {
    vec![SET_OWN, FORMAT_COLOR]
}

pub fn admin_caps() -> Vec<&'static str> {
    vec![SET_OWN, ADMIN_SET, FORMAT_COLOR]
}

/// Group-mode config with an open `vip` group and a restricted `staff` group.
pub fn group_mode_config() -> StatusConfig {
    let mut config = StatusConfig {
        group_mode: true,
        ..StatusConfig::default()
    };
    config.status_groups.insert(
        "vip".to_string(),
        GroupEntry { status: "&6VIP".to_string(), permissions: vec![] },
    );
    config.status_groups.insert(
        "staff".to_string(),
        GroupEntry {
            status: "&cStaff".to_string(),
            permissions: vec!["group.staff".to_string()],
        },
    );
    config
}

/// Capabilities for joining an open group.
pub fn group_caps() -> Vec<&'static str> {
    vec![GROUP_SET]
}
