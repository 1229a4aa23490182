use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::files::Ledger;
use crate::principal::{Principal, PrincipalId};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError<T> {
    /// The provider failed in a way this layer cannot interpret
    #[error("unhandled identity provider error: {0}")]
    Provider(#[from] T),
    /// A write referred to a principal the provider does not know
    #[error("unknown principal: {0}")]
    UnknownPrincipal(PrincipalId),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + Clone + 'static {
    type Error: Display + Debug;

    /// Fetch a principal by id.
    ///
    /// # Returns
    /// * `Ok(Some(principal))` - The principal with its privileges and ledger
    /// * `Ok(None)` - No principal with this id exists
    /// * `Err(IdentityError)` - The provider failed
    async fn get(
        &self,
        id: PrincipalId,
    ) -> Result<Option<Principal>, IdentityError<Self::Error>>;

    /// Create or replace a principal record.
    async fn put(&self, principal: Principal) -> Result<(), IdentityError<Self::Error>>;

    /// Overwrite a principal's file collection.
    ///
    /// This is a whole-collection write, not a patch: callers read the
    /// current ledger, compute the replacement, and hand it back here.
    /// Two interleaved writers for the same principal can lose one of
    /// the updates; see the service-level consistency notes.
    ///
    /// Should fail with `IdentityError::UnknownPrincipal` when no
    /// principal with this id exists.
    async fn set_files(
        &self,
        id: PrincipalId,
        files: Ledger,
    ) -> Result<(), IdentityError<Self::Error>>;
}
