use bytes::Bytes;
use object_store::{Storage, StoreError};

use crate::access::{AccessLinks, SignedLink};
use crate::identity::{IdentityError, IdentityProvider};
use crate::principal::{Principal, PrincipalId, Privilege};

use super::ledger::{Ledger, Quota, QuotaError};
use super::name::{self, NameError};
use super::record::FileRecord;
use super::user_path;

/// Errors produced by the file workflows.
#[derive(Debug, thiserror::Error)]
pub enum FilesError<E> {
    #[error("principal {0} may not create files")]
    CreateNotPermitted(PrincipalId),
    #[error("quota error: {0}")]
    Quota(#[from] QuotaError),
    #[error("invalid filename: {0}")]
    InvalidName(#[from] NameError),
    #[error("file already exists: {0}")]
    Duplicate(String),
    #[error("unknown principal: {0}")]
    UnknownPrincipal(PrincipalId),
    #[error("not permitted to access this file")]
    AccessDenied,
    #[error("object written but metadata unavailable: {0}")]
    MissingMetadata(String),
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError<E>),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Two-clause download authorization predicate.
///
/// A requester may download a file when they own it, or when the owning
/// principal is a system-level account ([`Privilege::CreateFile`]) whose
/// files are readable by any authenticated principal.
pub fn may_download(requester: PrincipalId, owner: &Principal) -> bool {
    requester == owner.id || owner.has(Privilege::CreateFile)
}

/// The upload, removal, and download-authorization workflows.
///
/// Holds the identity provider (principal records and ledgers), the
/// object storage backend, the configured [`Quota`], and the
/// [`AccessLinks`] minter for signed download URLs.
///
/// # Consistency
///
/// Ledger updates are whole-collection overwrites with no per-principal
/// serialization: two interleaved mutations for the same principal can
/// lose one of the updates. Callers wanting stronger guarantees need a
/// compare-and-swap on the principal record or a per-principal
/// serialization point in front of this service.
#[derive(Debug, Clone)]
pub struct FileService<I: IdentityProvider> {
    identities: I,
    storage: Storage,
    quota: Quota,
    links: AccessLinks,
}

impl<I: IdentityProvider> FileService<I> {
    pub fn new(identities: I, storage: Storage, quota: Quota, links: AccessLinks) -> Self {
        Self {
            identities,
            storage,
            quota,
            links,
        }
    }

    /// The configured per-principal quota.
    pub fn quota(&self) -> Quota {
        self.quota
    }

    /// Store an uploaded object for a principal and record it in the
    /// ledger.
    ///
    /// `name_hint` is the client-proposed filename; without one a random
    /// name is generated. The checks run in a fixed order: create
    /// privilege, count quota, filename validation, duplicate name, byte
    /// quota. Only when all pass is the object written, after which the
    /// backend's metadata (not the client's claim) is recorded.
    pub async fn upload(
        &self,
        principal_id: PrincipalId,
        name_hint: Option<String>,
        content: Bytes,
    ) -> Result<FileRecord, FilesError<I::Error>> {
        let principal = self
            .identities
            .get(principal_id)
            .await?
            .ok_or(FilesError::UnknownPrincipal(principal_id))?;

        if !principal.has(Privilege::CreateFile) {
            return Err(FilesError::CreateNotPermitted(principal_id));
        }

        let unlimited = principal.has(Privilege::UnlimitedQuota);

        // Count first: a zero-length upload still consumes one unit of
        // count quota.
        if !unlimited {
            self.quota.check_count(principal.files.count())?;
        }

        let name = name::resolve(name_hint)?;

        if principal.files.contains(&name) {
            return Err(FilesError::Duplicate(name));
        }

        if !unlimited {
            self.quota
                .check_size(principal.files.total_size(), content.len() as u64)?;
        }

        let path = user_path(principal_id, &name);
        self.storage.put(&path, content).await?;

        // A missing head after a successful-looking write means the
        // object may be partially written; surface it rather than record
        // a guess.
        let meta = self
            .storage
            .meta(&path)
            .await?
            .ok_or_else(|| FilesError::MissingMetadata(path.clone()))?;

        let record = FileRecord {
            name,
            size: meta.size,
            last_modified: meta.last_modified,
            etag: meta.etag.unwrap_or_default(),
        };

        let files = principal.files.appended(record.clone());
        self.identities.set_files(principal_id, files).await?;

        tracing::info!(
            principal = principal_id,
            name = %record.name,
            size = record.size,
            "file uploaded"
        );

        Ok(record)
    }

    /// Remove a batch of named files for a principal.
    ///
    /// The storage delete and the ledger rewrite run concurrently and are
    /// deliberately independent: a storage-side failure is logged but
    /// does not keep the named entries on the books. The cost is a
    /// possible dangling object, which is accepted. Names not present in
    /// the ledger are ignored.
    ///
    /// Returns the remaining ledger.
    pub async fn remove(
        &self,
        principal_id: PrincipalId,
        names: &[String],
    ) -> Result<Ledger, FilesError<I::Error>> {
        let principal = self
            .identities
            .get(principal_id)
            .await?
            .ok_or(FilesError::UnknownPrincipal(principal_id))?;

        let remaining = principal.files.without(names);
        let paths: Vec<String> = names
            .iter()
            .map(|name| user_path(principal_id, name))
            .collect();

        let (deleted, rewritten) = tokio::join!(
            self.storage.delete_many(&paths),
            self.identities.set_files(principal_id, remaining.clone()),
        );

        if let Err(error) = deleted {
            tracing::warn!(
                principal = principal_id,
                %error,
                "storage delete failed; ledger rewritten without the named files"
            );
        }
        rewritten?;

        tracing::info!(
            principal = principal_id,
            removed = names.len(),
            remaining = remaining.count(),
            "files removed"
        );

        Ok(remaining)
    }

    /// The principal's current ledger.
    pub async fn list(&self, principal_id: PrincipalId) -> Result<Ledger, FilesError<I::Error>> {
        let principal = self
            .identities
            .get(principal_id)
            .await?
            .ok_or(FilesError::UnknownPrincipal(principal_id))?;
        Ok(principal.files)
    }

    /// Authorize a download and mint a signed link for it.
    ///
    /// Resolves the owning principal, applies [`may_download`], records
    /// an audit event, and mints a time-bounded fetch link. With
    /// `no_attachment` set the link omits the filename hint so the
    /// browser renders the object instead of saving it.
    ///
    /// Minting does not require the object to exist; a link for an
    /// unknown name verifies at the fetch endpoint and then misses.
    pub async fn authorize_download(
        &self,
        requester: PrincipalId,
        owner: PrincipalId,
        filename: &str,
        no_attachment: bool,
    ) -> Result<SignedLink, FilesError<I::Error>> {
        let owner_principal = self
            .identities
            .get(owner)
            .await?
            .ok_or(FilesError::UnknownPrincipal(owner))?;

        if !may_download(requester, &owner_principal) {
            return Err(FilesError::AccessDenied);
        }

        let path = user_path(owner, filename);

        // Audit size is best-effort: a failed head is recorded as zero
        // rather than failing the authorization.
        let size = match self.storage.meta(&path).await {
            Ok(Some(meta)) => meta.size,
            Ok(None) | Err(_) => 0,
        };

        tracing::info!(
            target: "depot::audit",
            requester,
            owner,
            path = %path,
            size,
            "download authorized"
        );

        let filename_hint = (!no_attachment).then_some(filename);
        Ok(self.links.mint(&path, filename_hint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_may_download() {
        let owner = Principal::new(1);
        assert!(may_download(1, &owner));
    }

    #[test]
    fn test_cross_principal_denied_for_plain_owner() {
        let owner = Principal::new(1);
        assert!(!may_download(2, &owner));
    }

    #[test]
    fn test_cross_principal_allowed_for_elevated_owner() {
        let owner = Principal::with_privileges(1, [Privilege::CreateFile]);
        assert!(may_download(2, &owner));
    }

    #[test]
    fn test_unlimited_quota_alone_does_not_open_files() {
        let owner = Principal::with_privileges(1, [Privilege::UnlimitedQuota]);
        assert!(!may_download(2, &owner));
    }
}
