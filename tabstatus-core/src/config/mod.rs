//! src/config/mod.rs
//!
//! Loads `config.yml` and hands out immutable snapshots (settings plus the
//! group registry built from them). Reload and the admin setters swap in a
//! new snapshot; readers never see a half-updated config.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tabstatus_common::models::config::DEFAULT_MAX_STATUS_LENGTH;
use tabstatus_common::models::StatusConfig;
use crate::groups::GroupRegistry;
use crate::utils::fs::{read_optional, write_atomic};
use crate::Error;

#[derive(Debug)]
pub struct ConfigSnapshot {
    pub config: StatusConfig,
    pub groups: GroupRegistry,
}

impl ConfigSnapshot {
    fn new(config: StatusConfig) -> Self {
        let groups = GroupRegistry::from_config(&config.status_groups);
        Self { config, groups }
    }
}

pub struct ConfigManager {
    /// `None` for configs that only live in memory (embedding, tests).
    path: Option<PathBuf>,
    current: RwLock<Arc<ConfigSnapshot>>,
    /// Serializes read-modify-write of the config file.
    write_lock: Mutex<()>,
}

impl ConfigManager {
    pub fn in_memory(config: StatusConfig) -> Self {
        Self {
            path: None,
            current: RwLock::new(Arc::new(ConfigSnapshot::new(config))),
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let config = read_config_file(&path).await?;
        info!(
            "Config loaded from {} ({} status group(s), group mode {}).",
            path.display(),
            config.status_groups.len(),
            if config.group_mode { "on" } else { "off" }
        );
        Ok(Self {
            path: Some(path),
            current: RwLock::new(Arc::new(ConfigSnapshot::new(config))),
            write_lock: Mutex::new(()),
        })
    }

    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.current.read().clone()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn max_status_length(&self) -> usize {
        self.current.read().config.max_status_length
    }

    pub fn is_group_mode(&self) -> bool {
        self.current.read().config.group_mode
    }

    pub fn is_tablist_formatter(&self) -> bool {
        self.current.read().config.change_tablist_names
    }

    pub fn is_chat_formatter(&self) -> bool {
        self.current.read().config.chat_formatter
    }

    /// Re-reads the file. On a parse error the previous snapshot stays active.
    pub async fn reload(&self) -> Result<(), Error> {
        let Some(path) = self.path.as_ref() else {
            debug!("In-memory config; nothing to reload.");
            return Ok(());
        };
        let _guard = self.write_lock.lock().await;
        let config = read_config_file(path).await?;
        *self.current.write() = Arc::new(ConfigSnapshot::new(config));
        info!("Config reloaded.");
        Ok(())
    }

    pub async fn set_max_status_length(&self, max_length: usize) -> Result<(), Error> {
        if max_length == 0 {
            return Err(Error::ValidationError(
                "Max status length must be at least 1.".to_string(),
            ));
        }
        self.update(|cfg| cfg.max_status_length = max_length).await?;
        debug!("Max status length set to {}", max_length);
        Ok(())
    }

    pub async fn reset_max_status_length(&self) -> Result<(), Error> {
        self.update(|cfg| cfg.max_status_length = DEFAULT_MAX_STATUS_LENGTH).await?;
        debug!("Max status length reset to default");
        Ok(())
    }

    pub async fn set_group_mode(&self, group_mode: bool) -> Result<(), Error> {
        if self.is_group_mode() == group_mode {
            return Ok(());
        }
        self.update(|cfg| cfg.group_mode = group_mode).await?;
        debug!("Group mode set to {}", group_mode);
        Ok(())
    }

    /// Applies `change` to a copy of the current config, persists it (when
    /// file-backed) and only then makes it current.
    async fn update<F>(&self, change: F) -> Result<(), Error>
    where
        F: FnOnce(&mut StatusConfig),
    {
        let _guard = self.write_lock.lock().await;
        let mut config = self.snapshot().config.clone();
        change(&mut config);
        if let Some(path) = self.path.as_ref() {
            write_atomic(path, &serde_yaml::to_string(&config)?).await?;
            debug!("Config saved successfully.");
        }
        *self.current.write() = Arc::new(ConfigSnapshot::new(config));
        Ok(())
    }
}

async fn read_config_file(path: &Path) -> Result<StatusConfig, Error> {
    match read_optional(path).await? {
        Some(text) if !text.trim().is_empty() => serde_yaml::from_str(&text)
            .map_err(|e| Error::Config(format!("could not parse {}: {}", path.display(), e))),
        Some(_) => {
            warn!("Config file {} is empty; using defaults.", path.display());
            Ok(StatusConfig::default())
        }
        None => {
            let config = StatusConfig::default();
            write_atomic(path, &serde_yaml::to_string(&config)?).await?;
            info!("No config at {}; wrote defaults.", path.display());
            Ok(config)
        }
    }
}
