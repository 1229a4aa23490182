//! Shared test utilities for file service integration tests
#![allow(dead_code)]

use common::prelude::*;
use object_store::Storage;
use url::Url;

/// Principal seeded with the create-file privilege.
pub const UPLOADER: PrincipalId = 1;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const TEST_TTL_SECS: u64 = 300;

/// Quota used across the suite: 2 files, 1000 bytes.
pub fn quota() -> Quota {
    Quota {
        max_files: 2,
        max_bytes: 1000,
    }
}

pub fn access_links() -> AccessLinks {
    AccessLinks::new(
        LinkSigner::new(TEST_SECRET.into()),
        TEST_TTL_SECS,
        Url::parse("http://localhost:3001").unwrap(),
    )
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Set up a service over memory-backed identities and storage, seeded
/// with one ordinary uploader.
pub async fn setup() -> (
    FileService<MemoryIdentityProvider>,
    MemoryIdentityProvider,
    Storage,
) {
    setup_with_quota(quota()).await
}

/// Like [`setup`], but with a caller-chosen quota.
pub async fn setup_with_quota(
    quota: Quota,
) -> (
    FileService<MemoryIdentityProvider>,
    MemoryIdentityProvider,
    Storage,
) {
    init_tracing();

    let identities = MemoryIdentityProvider::new();
    let storage = Storage::memory();

    identities
        .put(Principal::with_privileges(UPLOADER, [Privilege::CreateFile]))
        .await
        .unwrap();

    let service = FileService::new(identities.clone(), storage.clone(), quota, access_links());
    (service, identities, storage)
}
