use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::provider::{IdentityError, IdentityProvider};
use crate::files::Ledger;
use crate::principal::{Principal, PrincipalId};

/// In-memory identity provider backed by a HashMap.
///
/// Used in tests and for ephemeral single-process setups; nothing
/// survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityProvider {
    inner: Arc<RwLock<HashMap<PrincipalId, Principal>>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryIdentityProviderError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    type Error = MemoryIdentityProviderError;

    async fn get(
        &self,
        id: PrincipalId,
    ) -> Result<Option<Principal>, IdentityError<Self::Error>> {
        let inner = self.inner.read().map_err(|e| {
            IdentityError::Provider(MemoryIdentityProviderError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })?;

        Ok(inner.get(&id).cloned())
    }

    async fn put(&self, principal: Principal) -> Result<(), IdentityError<Self::Error>> {
        let mut inner = self.inner.write().map_err(|e| {
            IdentityError::Provider(MemoryIdentityProviderError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })?;

        inner.insert(principal.id, principal);
        Ok(())
    }

    async fn set_files(
        &self,
        id: PrincipalId,
        files: Ledger,
    ) -> Result<(), IdentityError<Self::Error>> {
        let mut inner = self.inner.write().map_err(|e| {
            IdentityError::Provider(MemoryIdentityProviderError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })?;

        match inner.get_mut(&id) {
            Some(principal) => {
                principal.files = files;
                Ok(())
            }
            None => Err(IdentityError::UnknownPrincipal(id)),
        }
    }
}
