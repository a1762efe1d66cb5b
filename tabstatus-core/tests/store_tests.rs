// File: tabstatus-core/tests/store_tests.rs

use std::collections::HashMap;
use std::sync::Arc;
use tabstatus_common::models::{PrincipalId, StatusConfig};
use tabstatus_common::traits::StatusRepository;
use tabstatus_core::repositories::YamlStatusRepository;
use tabstatus_core::store::{StatusStore, WriteOutcome};
use tabstatus_core::test_utils::helpers::*;
use tabstatus_core::Error;

#[tokio::test]
async fn test_yaml_save_then_load_round_trips() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("statuses.yml");
    let repo = YamlStatusRepository::new(&path);

    let mut statuses = HashMap::new();
    statuses.insert(PrincipalId::new_random(), "&aAFK".to_string());
    statuses.insert(PrincipalId::new_random(), "Tom & Jerry: 100%".to_string());
    statuses.insert(PrincipalId::new_random(), "#1 builder".to_string());
    statuses.insert(PrincipalId::new_random(), "yes".to_string());

    repo.save_all(&statuses).await?;
    let loaded = YamlStatusRepository::new(&path).load_all().await?;
    assert_eq!(loaded, statuses);
    Ok(())
}

#[tokio::test]
async fn test_store_survives_restart() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("data").join("statuses.yml");
    let steve = PrincipalId::from_name("Steve");
    let alex = PrincipalId::from_name("Alex");

    {
        let store = StatusStore::open(Arc::new(YamlStatusRepository::new(&path))).await?;
        assert!(store.is_empty().await);
        assert_eq!(store.set(steve, "&6Gold").await, WriteOutcome::Persisted);
        assert_eq!(store.set(alex, "temp").await, WriteOutcome::Persisted);
        assert_eq!(store.remove(&alex).await, WriteOutcome::Persisted);
    }

    let reopened = StatusStore::open(Arc::new(YamlStatusRepository::new(&path))).await?;
    assert_eq!(reopened.len().await, 1);
    assert_eq!(reopened.get(&steve).await.as_deref(), Some("&6Gold"));
    Ok(())
}

#[tokio::test]
async fn test_document_keys_are_hyphenated_uuids() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("statuses.yml");
    let store = StatusStore::new(Arc::new(YamlStatusRepository::new(&path)));
    let id = PrincipalId::new_random();
    store.set(id, "hello").await;

    let text = std::fs::read_to_string(&path)?;
    let doc: HashMap<String, String> = serde_yaml::from_str(&text)?;
    assert_eq!(doc.get(&id.to_string()).map(String::as_str), Some("hello"));
    Ok(())
}

#[tokio::test]
async fn test_reload_picks_up_external_edits() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("statuses.yml");
    let repo = Arc::new(YamlStatusRepository::new(&path));
    let h = TestHarness::build(StatusConfig::default(), repo);
    let steve = h.join("Steve", &player_caps());
    h.manager.set_status(&steve, "before", &steve).await?;

    std::fs::write(&path, format!("{}: \"&aafter\"\n", steve.id))?;
    assert_eq!(h.manager.reload().await?, 1);
    assert_eq!(h.manager.get_status(&steve.id).await.as_deref(), Some("&aafter"));
    assert_eq!(
        h.roster.display_name_of(&steve.id).map(|d| d.list_label),
        Some("[§aafter§r] Steve".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_concurrent_sets_are_all_persisted() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("statuses.yml");
    let store = Arc::new(StatusStore::new(Arc::new(YamlStatusRepository::new(&path))));

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.set(PrincipalId::new_random(), format!("status {}", i)).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.map_err(|e| Error::Parse(e.to_string()))?, WriteOutcome::Persisted);
    }

    let on_disk = YamlStatusRepository::new(&path).load_all().await?;
    assert_eq!(on_disk.len(), 16);
    assert_eq!(on_disk, store.snapshot().await);
    Ok(())
}
