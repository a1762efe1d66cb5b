use serde::{Deserialize, Serialize};

/// A named status that can be picked instead of free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub name: String,
    pub canonical_status: String,
    /// Holding any one of these is enough. Empty means "generic group permission".
    pub required_capabilities: Vec<String>,
}

impl GroupDefinition {
    /// Builds a definition, dropping blank and repeated capability names
    /// while keeping the configured order.
    pub fn new(
        name: impl Into<String>,
        canonical_status: impl Into<String>,
        required_capabilities: Vec<String>,
    ) -> Self {
        let mut caps: Vec<String> = Vec::with_capacity(required_capabilities.len());
        for cap in required_capabilities {
            let cap = cap.trim().to_string();
            if !cap.is_empty() && !caps.contains(&cap) {
                caps.push(cap);
            }
        }
        Self {
            name: name.into(),
            canonical_status: canonical_status.into(),
            required_capabilities: caps,
        }
    }

    pub fn is_open(&self) -> bool {
        self.required_capabilities.is_empty()
    }
}
