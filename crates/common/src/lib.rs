/**
 * Signed access link protocol.
 *  - Keyed fingerprints binding a storage path
 *     to an expiry timestamp
 *  - Minting and verification of time-bounded
 *     fetch URLs
 */
pub mod access;
/**
 * Per-principal file storage.
 * Tracks what each principal holds (the ledger),
 *  enforces count and byte quotas, and drives the
 *  upload, removal, and download-authorization
 *  workflows.
 */
pub mod files;
/**
 * Identity provider abstraction.
 * Principals are owned by an external identity
 *  system; this crate reads them and rewrites
 *  their file collections through this interface.
 */
pub mod identity;
/**
 * Principal identities and their privileges.
 */
pub mod principal;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::access::{AccessLinks, LinkSigner, SignedLink, SigningSecret};
    pub use crate::files::{
        user_path, FileRecord, FileService, FilesError, Ledger, Quota, QuotaError,
    };
    pub use crate::identity::{IdentityError, IdentityProvider, MemoryIdentityProvider};
    pub use crate::principal::{Principal, PrincipalId, Privilege};
    pub use crate::version::build_info;
}
