use rand::{distr::Alphanumeric, Rng};

/// Length of generated fallback filenames.
pub const RANDOM_NAME_LEN: usize = 16;

/// Errors produced by filename validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("filename is empty")]
    Empty,
    #[error("filename contains a path separator: {0}")]
    Separator(String),
    #[error("filename contains a parent-directory component: {0}")]
    ParentComponent(String),
}

/// Validate a filename for use in a storage path.
///
/// Storage paths are built by concatenating the principal id and the
/// filename, so a name carrying `/` or `..` could escape the principal's
/// namespace. Quota state never relaxes these checks.
pub fn validate(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.contains('/') {
        return Err(NameError::Separator(name.to_string()));
    }
    if name.contains("..") {
        return Err(NameError::ParentComponent(name.to_string()));
    }
    Ok(())
}

/// Resolve the filename an upload will be stored under.
///
/// A provided hint must validate; with no hint a random
/// [`RANDOM_NAME_LEN`]-character alphanumeric name is generated.
pub fn resolve(hint: Option<String>) -> Result<String, NameError> {
    match hint {
        Some(name) => {
            validate(&name)?;
            Ok(name)
        }
        None => Ok(random()),
    }
}

/// Generate a random alphanumeric filename.
pub fn random() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_NAME_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_names() {
        assert!(validate("report.txt").is_ok());
        assert!(validate("data.tar.gz").is_ok());
        assert!(validate("übung.pdf").is_ok());
        // A single dot is not a parent component
        assert!(validate(".gitignore").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate(""), Err(NameError::Empty));
    }

    #[test]
    fn test_rejects_separators() {
        assert!(matches!(
            validate("nested/file.txt"),
            Err(NameError::Separator(_))
        ));
        assert!(matches!(validate("/etc/passwd"), Err(NameError::Separator(_))));
    }

    #[test]
    fn test_rejects_parent_components() {
        assert!(matches!(
            validate("..secret"),
            Err(NameError::ParentComponent(_))
        ));
        assert!(matches!(
            validate("a..b"),
            Err(NameError::ParentComponent(_))
        ));
    }

    #[test]
    fn test_resolve_empty_hint_is_rejected() {
        assert_eq!(resolve(Some(String::new())), Err(NameError::Empty));
    }

    #[test]
    fn test_resolve_without_hint_generates_valid_name() {
        let name = resolve(None).unwrap();
        assert_eq!(name.len(), RANDOM_NAME_LEN);
        assert!(validate(&name).is_ok());
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
