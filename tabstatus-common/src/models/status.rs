use serde::{Deserialize, Serialize};
use crate::models::principal::PrincipalId;

/// One stored status. The raw text keeps its markup; rendering happens on
/// every read because the owner's capabilities may change in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub principal_id: PrincipalId,
    pub raw_status: String,
}

impl PlayerStatus {
    pub fn new(principal_id: PrincipalId, raw_status: impl Into<String>) -> Self {
        Self {
            principal_id,
            raw_status: raw_status.into(),
        }
    }
}
