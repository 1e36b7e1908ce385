//! File-backed recipient registry tests

use tempfile::TempDir;

use vulnwatch::infrastructure::registry::{FileRegistry, RecipientRegistry};

fn registry_in(dir: &TempDir) -> FileRegistry {
    FileRegistry::new(dir.path().join("activated_users.json"))
}

#[tokio::test]
async fn register_is_new_only_once() {
    let dir = TempDir::new().unwrap();
    let registry = registry_in(&dir);

    assert!(!registry.is_registered(42).await.unwrap());

    let first = registry.register(42, Some("alice")).await.unwrap();
    let second = registry.register(42, Some("alice")).await.unwrap();
    assert!(first);
    assert!(!second);

    assert!(registry.is_registered(42).await.unwrap());
}

#[tokio::test]
async fn get_returns_the_stored_registration() {
    let dir = TempDir::new().unwrap();
    let registry = registry_in(&dir);

    registry.register(42, Some("alice")).await.unwrap();

    let info = registry.get(42).await.unwrap().expect("registered");
    assert_eq!(info.chat_id, 42);
    assert_eq!(info.username.as_deref(), Some("alice"));
    assert!(!info.activated_at.is_empty());

    assert!(registry.get(7).await.unwrap().is_none());
}

#[tokio::test]
async fn repeat_registration_keeps_the_original_record() {
    let dir = TempDir::new().unwrap();
    let registry = registry_in(&dir);

    registry.register(42, Some("alice")).await.unwrap();
    let original = registry.get(42).await.unwrap().unwrap();

    registry.register(42, Some("impostor")).await.unwrap();
    let after = registry.get(42).await.unwrap().unwrap();
    assert_eq!(after, original);
}

#[tokio::test]
async fn all_ids_lists_every_registration() {
    let dir = TempDir::new().unwrap();
    let registry = registry_in(&dir);

    registry.register(1, None).await.unwrap();
    registry.register(-1002, Some("group")).await.unwrap();
    registry.register(3, Some("bob")).await.unwrap();

    let mut ids = registry.all_ids().await.unwrap();
    ids.sort();
    assert_eq!(ids, vec![-1002, 1, 3]);
}

#[tokio::test]
async fn registrations_survive_reopening_the_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("activated_users.json");

    let registry = FileRegistry::new(path.clone());
    registry.register(42, Some("alice")).await.unwrap();
    drop(registry);

    let reopened = FileRegistry::new(path);
    assert!(reopened.is_registered(42).await.unwrap());
    assert!(!reopened.register(42, Some("alice")).await.unwrap());
}

#[tokio::test]
async fn corrupt_file_degrades_to_an_empty_registry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("activated_users.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let registry = FileRegistry::new(path);
    assert!(!registry.is_registered(42).await.unwrap());
    assert!(registry.all_ids().await.unwrap().is_empty());

    // The store recovers by rewriting a clean file on first registration.
    assert!(registry.register(42, None).await.unwrap());
    assert!(registry.is_registered(42).await.unwrap());
}
