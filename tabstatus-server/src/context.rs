//! tabstatus-server/src/context.rs
//!
//! Defines the server context: every component built once and shared as
//! `Arc` handles.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tabstatus_common::capabilities::SET_OWN;
use tabstatus_common::models::{Participant, PrincipalId};
use tabstatus_core::auth::{MemoryCapabilityProvider, WILDCARD};
use tabstatus_core::config::ConfigManager;
use tabstatus_core::presence::Roster;
use tabstatus_core::repositories::YamlStatusRepository;
use tabstatus_core::services::{ChatFormatter, StatusManager, StatusPlaceholders};
use tabstatus_core::store::StatusStore;
use tabstatus_core::tasks::DEFAULT_REFRESH_INTERVAL;
use tabstatus_core::Error;

use crate::Args;

/// Capabilities every participant gets on join.
pub const DEFAULT_CAPABILITIES: &[&str] = &[SET_OWN];

pub struct ServerContext {
    pub config: Arc<ConfigManager>,
    pub store: Arc<StatusStore>,
    pub capabilities: Arc<MemoryCapabilityProvider>,
    pub roster: Arc<Roster>,
    pub manager: Arc<StatusManager>,
    pub chat: ChatFormatter,
    pub placeholders: StatusPlaceholders,
    pub refresh_interval: Duration,
    pub shutdown_token: CancellationToken,
}

impl ServerContext {
    pub async fn new(args: &Args) -> Result<Self, Error> {
        let config = Arc::new(ConfigManager::load(args.config_path()).await?);
        let repo = Arc::new(YamlStatusRepository::new(args.statuses_path()));
        let store = Arc::new(StatusStore::open(repo).await?);

        let capabilities = Arc::new(MemoryCapabilityProvider::new());
        capabilities.grant(PrincipalId::CONSOLE, WILDCARD);
        let roster = Arc::new(Roster::new());

        let manager = Arc::new(StatusManager::new(
            config.clone(),
            store.clone(),
            capabilities.clone(),
            roster.clone(),
        ));

        let refresh_interval = if args.refresh_secs == 0 {
            DEFAULT_REFRESH_INTERVAL
        } else {
            Duration::from_secs(args.refresh_secs)
        };

        info!("Server context ready ({} stored status(es)).", store.len().await);
        Ok(Self {
            config,
            store,
            capabilities,
            roster,
            chat: ChatFormatter::new(manager.clone()),
            placeholders: StatusPlaceholders::new(manager.clone()),
            manager,
            refresh_interval,
            shutdown_token: CancellationToken::new(),
        })
    }

    pub fn console(&self) -> Participant {
        Participant::console()
    }

    /// Brings a participant online with the default capabilities.
    pub async fn join(&self, name: &str) -> Option<Participant> {
        let participant = Participant::named(name);
        if !self.roster.join(participant.clone()) {
            return None;
        }
        self.capabilities
            .grant_all(participant.id, DEFAULT_CAPABILITIES.iter().copied());
        self.manager.handle_join(&participant).await;
        Some(participant)
    }

    /// Stops background work and writes the final status document.
    pub async fn shutdown(&self) {
        self.shutdown_token.cancel();
        self.manager.shutdown().await;
    }
}
