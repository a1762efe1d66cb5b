use std::collections::HashMap;
use async_trait::async_trait;
use crate::error::Error;
use crate::models::principal::PrincipalId;

/// Backing document of the status store. Persistence is always a complete
/// rewrite, never an incremental update.
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Missing storage means "no statuses", not an error.
    async fn load_all(&self) -> Result<HashMap<PrincipalId, String>, Error>;
    async fn save_all(&self, statuses: &HashMap<PrincipalId, String>) -> Result<(), Error>;
}
