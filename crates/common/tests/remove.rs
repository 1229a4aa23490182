//! Integration tests for the removal workflow

mod common;

use bytes::Bytes;

use ::common::prelude::*;
use object_store::{ObjectStoreConfig, Storage};

use self::common::UPLOADER;

#[tokio::test]
async fn test_remove_deletes_object_and_ledger_entry() {
    let (service, _, storage) = common::setup().await;

    service
        .upload(UPLOADER, Some("a.txt".into()), Bytes::from("first"))
        .await
        .unwrap();
    service
        .upload(UPLOADER, Some("b.txt".into()), Bytes::from("second"))
        .await
        .unwrap();

    let remaining = service
        .remove(UPLOADER, &["a.txt".to_string()])
        .await
        .unwrap();

    assert_eq!(remaining.count(), 1);
    assert_eq!(remaining.total_size(), 6);
    assert!(remaining.contains("b.txt"));

    assert!(storage.get("user/1/a.txt").await.unwrap().is_none());
    assert!(storage.get("user/1/b.txt").await.unwrap().is_some());
}

#[tokio::test]
async fn test_remove_unknown_names_are_ignored() {
    let (service, _, _) = common::setup().await;

    service
        .upload(UPLOADER, Some("keep.txt".into()), Bytes::from("data"))
        .await
        .unwrap();

    let remaining = service
        .remove(UPLOADER, &["ghost.txt".to_string()])
        .await
        .unwrap();

    assert_eq!(remaining.count(), 1);
    assert!(remaining.contains("keep.txt"));
}

#[tokio::test]
async fn test_remove_unknown_principal() {
    let (service, _, _) = common::setup().await;

    let result = service.remove(99, &["a.txt".to_string()]).await;
    assert!(matches!(result, Err(FilesError::UnknownPrincipal(99))));
}

#[tokio::test]
async fn test_storage_failure_does_not_block_ledger() {
    common::init_tracing();

    let temp_dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(ObjectStoreConfig::Local {
        path: temp_dir.path().to_path_buf(),
    })
    .await
    .unwrap();

    let identities = MemoryIdentityProvider::new();
    identities
        .put(Principal::with_privileges(UPLOADER, [Privilege::CreateFile]))
        .await
        .unwrap();
    let service = FileService::new(
        identities.clone(),
        storage.clone(),
        common::quota(),
        common::access_links(),
    );

    service
        .upload(UPLOADER, Some("a.txt".into()), Bytes::from("first"))
        .await
        .unwrap();
    service
        .upload(UPLOADER, Some("b.txt".into()), Bytes::from("second"))
        .await
        .unwrap();

    // The empty name resolves to the principal's directory, which the
    // local backend refuses to delete. The batch still runs to
    // completion and the ledger commits regardless.
    let remaining = service
        .remove(UPLOADER, &["a.txt".to_string(), String::new()])
        .await
        .unwrap();

    assert_eq!(remaining.count(), 1);
    assert!(remaining.contains("b.txt"));

    let user_dir = temp_dir.path().join("user").join("1");
    assert!(!user_dir.join("a.txt").exists());
    assert!(user_dir.join("b.txt").exists());
}
