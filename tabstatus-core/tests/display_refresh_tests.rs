// File: tabstatus-core/tests/display_refresh_tests.rs

use std::time::Duration;
use tabstatus_common::models::{DisplayName, StatusConfig};
use tabstatus_core::tasks::{spawn_display_refresh_task, start_display_refresh};
use tabstatus_core::test_utils::helpers::*;
use tabstatus_core::Error;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_refresh_task_applies_changed_capabilities() -> Result<(), Error> {
    use tabstatus_common::capabilities::FORMAT_COLOR;

    let h = TestHarness::new();
    let steve = h.join("Steve", &[tabstatus_common::capabilities::SET_OWN]);
    let console = tabstatus_common::models::Participant::console();
    h.manager.set_status(&steve, "&bBlue", &console).await?;
    assert_eq!(
        h.roster.display_name_of(&steve.id).map(|d| d.list_label),
        Some("[Blue§r] Steve".to_string())
    );

    let token = CancellationToken::new();
    let handle = spawn_display_refresh_task(h.manager.clone(), Duration::from_millis(20), token.clone());

    h.capabilities.grant(steve.id, FORMAT_COLOR);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(
        h.roster.display_name_of(&steve.id).map(|d| d.list_label),
        Some("[§bBlue§r] Steve".to_string())
    );

    token.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .map_err(|e| Error::Parse(e.to_string()))?
        .map_err(|e| Error::Parse(e.to_string()))?;
    Ok(())
}

#[tokio::test]
async fn test_refresh_all_covers_everyone_online() -> Result<(), Error> {
    let h = TestHarness::new();
    let steve = h.join("Steve", &player_caps());
    let alex = h.join("Alex", &player_caps());
    h.manager.set_status(&steve, "hi", &steve).await?;

    assert_eq!(h.manager.refresh_all_display_names().await, 2);
    assert_eq!(h.roster.display_name_of(&alex.id), Some(DisplayName::bare("Alex")));
    assert_eq!(
        h.roster.display_name_of(&steve.id).map(|d| d.chat_prefix),
        Some("[hi§r] Steve".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_refresh_not_started_without_tablist_names() {
    let config = StatusConfig { change_tablist_names: false, ..StatusConfig::default() };
    let h = TestHarness::with_config(config);
    let token = CancellationToken::new();
    assert!(start_display_refresh(h.manager.clone(), Duration::from_secs(30), token).is_none());
}

#[tokio::test]
async fn test_zero_interval_does_not_spin() -> Result<(), Error> {
    let h = TestHarness::new();
    let token = CancellationToken::new();
    let handle = start_display_refresh(h.manager.clone(), Duration::ZERO, token.clone());
    assert!(handle.is_some());

    token.cancel();
    if let Some(handle) = handle {
        handle.await.map_err(|e| Error::Parse(e.to_string()))?;
    }
    Ok(())
}
