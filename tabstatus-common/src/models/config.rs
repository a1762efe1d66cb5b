use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_STATUS_LENGTH: usize = 15;

/// One entry of the `statusGroups` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GroupEntry {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// The on-disk `config.yml`. Every key is optional; missing keys take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusConfig {
    pub max_status_length: usize,
    pub opening_character: String,
    pub closing_character: String,
    pub group_mode: bool,
    pub change_tablist_names: bool,
    pub chat_formatter: bool,
    pub logger_level: String,
    pub status_groups: BTreeMap<String, GroupEntry>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            max_status_length: DEFAULT_MAX_STATUS_LENGTH,
            opening_character: "[".to_string(),
            closing_character: "]".to_string(),
            group_mode: false,
            change_tablist_names: true,
            chat_formatter: true,
            logger_level: "info".to_string(),
            status_groups: BTreeMap::new(),
        }
    }
}
