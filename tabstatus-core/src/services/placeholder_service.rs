//! src/services/placeholder_service.rs
//!
//! Answers `status` and `status_<name>` placeholder lookups for external
//! placeholder engines.

use std::sync::Arc;
use tabstatus_common::models::Participant;
use crate::services::status_service::StatusManager;

pub const STATUS_IDENTIFIER: &str = "status";

pub struct StatusPlaceholders {
    manager: Arc<StatusManager>,
}

impl StatusPlaceholders {
    pub fn new(manager: Arc<StatusManager>) -> Self {
        Self { manager }
    }

    /// Raw statuses are returned; the caller renders them.
    ///
    /// * `status`: the requester's status, empty when none (or no requester)
    /// * `status_<name>`: the status of that online participant
    /// * anything else, or an offline name: `None`
    pub async fn resolve(&self, requester: Option<&Participant>, identifier: &str) -> Option<String> {
        let Some(requester) = requester else {
            return Some(String::new());
        };
        if identifier == STATUS_IDENTIFIER {
            return Some(self.manager.get_status(&requester.id).await.unwrap_or_default());
        }

        let name = identifier.strip_prefix("status_")?;
        if name.is_empty() {
            return None;
        }
        let target = self.manager.find_participant(name).ok()?;
        Some(self.manager.get_status(&target.id).await.unwrap_or_default())
    }
}
