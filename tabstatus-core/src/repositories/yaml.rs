//! src/repositories/yaml.rs
//!
//! `statuses.yml`: a flat mapping of hyphenated UUID → raw status.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde_yaml::Value;
use tracing::{debug, warn};
use tabstatus_common::traits::repository_traits::StatusRepository;
use tabstatus_common::models::PrincipalId;
use crate::utils::fs::{read_optional, write_atomic};
use crate::Error;

#[derive(Debug, Clone)]
pub struct YamlStatusRepository {
    path: PathBuf,
}

impl YamlStatusRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatusRepository for YamlStatusRepository {
    async fn load_all(&self) -> Result<HashMap<PrincipalId, String>, Error> {
        let Some(text) = read_optional(&self.path).await? else {
            debug!("No status file at {}; starting empty.", self.path.display());
            return Ok(HashMap::new());
        };

        let document: Option<BTreeMap<String, Value>> = serde_yaml::from_str(&text).map_err(|e| {
            Error::Persistence(format!("could not parse {}: {}", self.path.display(), e))
        })?;

        let mut statuses = HashMap::new();
        for (key, value) in document.unwrap_or_default() {
            let id = match key.parse::<PrincipalId>() {
                Ok(id) => id,
                Err(_) => {
                    warn!("Skipping status entry with invalid id '{}'", key);
                    continue;
                }
            };
            let raw = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                other => {
                    warn!("Skipping non-scalar status for {}: {:?}", id, other);
                    continue;
                }
            };
            if raw.is_empty() {
                continue;
            }
            statuses.insert(id, raw);
        }

        debug!("Loaded {} status(es) from {}", statuses.len(), self.path.display());
        Ok(statuses)
    }

    async fn save_all(&self, statuses: &HashMap<PrincipalId, String>) -> Result<(), Error> {
        // sorted keys keep the file diff-friendly
        let document: BTreeMap<String, &str> = statuses
            .iter()
            .map(|(id, raw)| (id.to_string(), raw.as_str()))
            .collect();

        let text = serde_yaml::to_string(&document)?;
        write_atomic(&self.path, &text).await.map_err(|e| {
            Error::Persistence(format!("could not write {}: {}", self.path.display(), e))
        })?;

        debug!("Saved {} status(es) to {}", statuses.len(), self.path.display());
        Ok(())
    }
}
