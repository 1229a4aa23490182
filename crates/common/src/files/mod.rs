//! Per-principal file storage
//!
//! This module defines the core types for depot's quota-enforced file
//! storage:
//!
//! - **[`FileRecord`]**: ledger entry describing one stored object
//! - **[`Ledger`]**: a principal's insertion-ordered record collection
//! - **[`Quota`]**: configured count/byte ceilings and their checks
//! - **[`FileService`]**: the upload, removal, and download-authorization
//!   workflows over an identity provider and an object store
//!
//! # Architecture
//!
//! ## The ledger is authoritative
//!
//! The identity system persists each principal's ledger as a single
//! field; every mutation here reads the current collection, computes the
//! replacement, and writes the whole collection back. Storage holds the
//! bytes, the ledger holds the accounting.
//!
//! ## Path layout
//!
//! Objects live at `user/<principal-id>/<filename>`. The path is built by
//! direct string concatenation, which is why filenames are validated
//! against separators and parent-directory components before any write.

mod ledger;
mod name;
mod record;
mod service;

pub use ledger::{Ledger, Quota, QuotaError};
pub use name::{NameError, RANDOM_NAME_LEN};
pub use record::FileRecord;
pub use service::{may_download, FileService, FilesError};

use crate::principal::PrincipalId;

/// Storage path for a principal's file.
pub fn user_path(id: PrincipalId, name: &str) -> String {
    format!("user/{}/{}", id, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_path() {
        assert_eq!(user_path(42, "report.txt"), "user/42/report.txt");
    }
}
