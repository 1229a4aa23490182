use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ledger entry describing one stored object owned by a principal.
///
/// `size`, `last_modified`, and `etag` come from the storage backend's
/// metadata after the object is written, so the ledger reflects what
/// storage actually holds rather than what the client claimed to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Filename, unique within the owning principal.
    pub name: String,
    /// Object size in bytes.
    pub size: u64,
    /// When the object was last written.
    pub last_modified: DateTime<Utc>,
    /// Backend entity tag; empty when the backend reports none.
    #[serde(default)]
    pub etag: String,
}
