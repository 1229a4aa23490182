use serde::{Deserialize, Serialize};

use super::record::FileRecord;

/// A principal's file ledger: the insertion-ordered collection of
/// [`FileRecord`]s it owns, with derived count and aggregate size.
///
/// The ledger is a value type. Mutations produce a new ledger
/// ([`Ledger::appended`], [`Ledger::without`]) which the caller then
/// persists as a whole through the identity provider; there is no
/// incremental patching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger(Vec<FileRecord>);

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in the ledger.
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Sum of record sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.0.iter().map(|record| record.size).sum()
    }

    /// Whether a record with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|record| record.name == name)
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.0.iter().find(|record| record.name == name)
    }

    /// The records, in insertion order.
    pub fn records(&self) -> &[FileRecord] {
        &self.0
    }

    /// A new ledger with the record appended.
    pub fn appended(&self, record: FileRecord) -> Self {
        let mut records = self.0.clone();
        records.push(record);
        Self(records)
    }

    /// A new ledger with the named records removed.
    ///
    /// Names that do not appear in the ledger are ignored.
    pub fn without<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let records = self
            .0
            .iter()
            .filter(|record| !names.iter().any(|name| name.as_ref() == record.name))
            .cloned()
            .collect();
        Self(records)
    }
}

impl FromIterator<FileRecord> for Ledger {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors produced by quota checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuotaError {
    /// The principal already holds as many files as the count quota allows
    #[error("file count quota reached: {current} of {max} files")]
    FileCount { current: usize, max: usize },
    /// Accepting the new object would push aggregate size past the quota
    #[error("storage quota exceeded: {prospective} of {max} bytes")]
    TotalSize { prospective: u64, max: u64 },
}

/// Configured per-principal storage ceilings.
///
/// Quotas are resolved from configuration and shared by all principals;
/// a principal holding the unlimited-quota privilege is never checked
/// against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    /// Maximum number of files a principal may hold.
    pub max_files: usize,
    /// Maximum aggregate size in bytes across a principal's files.
    pub max_bytes: u64,
}

impl Quota {
    /// Check whether one more file fits under the count quota.
    ///
    /// Rejects when the principal already holds `max_files`; a zero-length
    /// upload still consumes one unit of count quota.
    pub fn check_count(&self, current: usize) -> Result<(), QuotaError> {
        if current >= self.max_files {
            return Err(QuotaError::FileCount {
                current,
                max: self.max_files,
            });
        }
        Ok(())
    }

    /// Check whether an incoming object fits under the byte quota.
    ///
    /// The check is on the prospective total (existing aggregate plus the
    /// new object): landing exactly on the quota passes, one byte over
    /// fails.
    pub fn check_size(&self, current_bytes: u64, incoming: u64) -> Result<(), QuotaError> {
        let prospective = current_bytes.saturating_add(incoming);
        if prospective > self.max_bytes {
            return Err(QuotaError::TotalSize {
                prospective,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(name: &str, size: u64) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            size,
            last_modified: Utc::now(),
            etag: String::new(),
        }
    }

    #[test]
    fn test_ledger_aggregates() {
        let ledger: Ledger = [record("a.txt", 400), record("b.txt", 300)]
            .into_iter()
            .collect();

        assert_eq!(ledger.count(), 2);
        assert_eq!(ledger.total_size(), 700);
        assert!(ledger.contains("a.txt"));
        assert!(!ledger.contains("c.txt"));
        assert_eq!(ledger.get("b.txt").unwrap().size, 300);
    }

    #[test]
    fn test_ledger_preserves_insertion_order() {
        let ledger = Ledger::new()
            .appended(record("first", 1))
            .appended(record("second", 2))
            .appended(record("third", 3));

        let names: Vec<&str> = ledger
            .records()
            .iter()
            .map(|record| record.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ledger_without() {
        let ledger: Ledger = [record("a", 1), record("b", 2), record("c", 3)]
            .into_iter()
            .collect();

        let remaining = ledger.without(&["a", "c", "never-existed"]);
        assert_eq!(remaining.count(), 1);
        assert!(remaining.contains("b"));
        assert_eq!(remaining.total_size(), 2);

        // The original ledger is untouched
        assert_eq!(ledger.count(), 3);
    }

    #[test]
    fn test_count_quota_boundary() {
        let quota = Quota {
            max_files: 2,
            max_bytes: 1000,
        };

        assert!(quota.check_count(0).is_ok());
        assert!(quota.check_count(1).is_ok());
        assert_eq!(
            quota.check_count(2),
            Err(QuotaError::FileCount { current: 2, max: 2 })
        );
        assert!(quota.check_count(3).is_err());
    }

    #[test]
    fn test_size_quota_boundary() {
        let quota = Quota {
            max_files: 10,
            max_bytes: 1000,
        };

        // Landing exactly on the quota passes
        assert!(quota.check_size(600, 400).is_ok());
        // One byte over fails
        assert_eq!(
            quota.check_size(600, 401),
            Err(QuotaError::TotalSize {
                prospective: 1001,
                max: 1000,
            })
        );
    }

    #[test]
    fn test_size_quota_does_not_overflow() {
        let quota = Quota {
            max_files: 10,
            max_bytes: 1000,
        };
        assert!(quota.check_size(u64::MAX, u64::MAX).is_err());
    }

    #[test]
    fn test_ledger_serde_is_transparent() {
        let ledger: Ledger = [record("a.txt", 400)].into_iter().collect();
        let json = serde_json::to_value(&ledger).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "a.txt");
        assert_eq!(json[0]["size"], 400);

        let parsed: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, ledger);
    }
}
