//! # Principals
//!
//! Principals represent authenticated identities with storage privileges
//! and a per-principal file ledger.
//!
//! Each principal has:
//! - A unique integer **id**, assigned by the external identity system
//! - A set of **privileges** ([`Privilege`]) controlling what it may do
//! - A **file ledger** ([`Ledger`]) recording what it has stored
//!
//! ## Trust Model
//!
//! Authentication happens upstream; by the time a request reaches this
//! subsystem the requester's principal id is already established. This
//! crate only decides what an established identity is allowed to do.
//!
//! ## Quotas
//!
//! Count and byte quotas are configuration values shared by all
//! principals. A principal holding [`Privilege::UnlimitedQuota`] bypasses
//! both checks; everyone else is bounded by them during upload.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::files::Ledger;

/// Unique identifier for a principal, assigned by the identity system.
pub type PrincipalId = u64;

/// A privilege a principal may hold.
///
/// Privileges gate operations rather than roles: a principal may hold any
/// combination of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// May upload new files.
    ///
    /// Holders of this privilege also act as system-level accounts: files
    /// they own may be downloaded by any authenticated principal, not just
    /// themselves.
    CreateFile,

    /// Bypasses both the file-count and byte quota checks during upload.
    UnlimitedQuota,
}

impl std::fmt::Display for Privilege {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Privilege::CreateFile => write!(f, "create_file"),
            Privilege::UnlimitedQuota => write!(f, "unlimited_quota"),
        }
    }
}

/// A principal identity.
///
/// The identity system owns these records; this subsystem reads them and
/// rewrites the `files` collection as a whole when uploads or removals
/// commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// The principal's unique id.
    pub id: PrincipalId,
    /// The privileges this principal holds.
    #[serde(default)]
    pub privileges: HashSet<Privilege>,
    /// The principal's file ledger.
    #[serde(default)]
    pub files: Ledger,
}

impl Principal {
    /// Create a principal with no privileges and an empty ledger.
    pub fn new(id: PrincipalId) -> Self {
        Self {
            id,
            privileges: HashSet::new(),
            files: Ledger::default(),
        }
    }

    /// Create a principal holding the given privileges.
    pub fn with_privileges(
        id: PrincipalId,
        privileges: impl IntoIterator<Item = Privilege>,
    ) -> Self {
        Self {
            id,
            privileges: privileges.into_iter().collect(),
            files: Ledger::default(),
        }
    }

    /// Whether this principal holds the given privilege.
    pub fn has(&self, privilege: Privilege) -> bool {
        self.privileges.contains(&privilege)
    }
}
