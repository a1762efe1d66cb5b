// src/tasks/display_refresh.rs

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use crate::services::StatusManager;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Spawns a background task that periodically recomposes the display names
/// of everyone online. Runs until `shutdown` is cancelled.
pub fn spawn_display_refresh_task(
    manager: Arc<StatusManager>,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let every = if every.is_zero() {
        warn!("Display refresh interval of zero requested; using {:?}.", DEFAULT_REFRESH_INTERVAL);
        DEFAULT_REFRESH_INTERVAL
    } else {
        every
    };

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Display refresh task stopping.");
                    break;
                }
                _ = interval.tick() => {
                    manager.refresh_all_display_names().await;
                }
            }
        }
    })
}

/// Starts the refresh task only when list labels are managed at all.
pub fn start_display_refresh(
    manager: Arc<StatusManager>,
    every: Duration,
    shutdown: CancellationToken,
) -> Option<JoinHandle<()>> {
    if !manager.config().is_tablist_formatter() {
        info!("Tablist names are disabled; display refresh task not started.");
        return None;
    }
    info!("Refreshing display names every {:?}.", every);
    Some(spawn_display_refresh_task(manager, every, shutdown))
}
