use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The process-wide link-signing secret.
///
/// Resolved from configuration at startup and never transmitted to
/// clients. The Debug impl is redacted so config dumps cannot leak it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }
}

impl From<String> for SigningSecret {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl From<&str> for SigningSecret {
    fn from(secret: &str) -> Self {
        Self(secret.to_string())
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// Derives and verifies keyed fingerprints binding a storage path to an
/// expiry timestamp.
///
/// The fingerprint is `sha256(target || "/" || expiry || "/" || secret)`
/// in lowercase hex. No state is held beyond the secret, so any number
/// of tasks may mint and verify concurrently.
#[derive(Debug, Clone)]
pub struct LinkSigner {
    secret: SigningSecret,
}

impl LinkSigner {
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }

    /// Compute the fingerprint for a `(target, expiry)` pair.
    pub fn mint(&self, target: &str, expire: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(target.as_bytes());
        hasher.update(b"/");
        hasher.update(expire.to_string().as_bytes());
        hasher.update(b"/");
        hasher.update(self.secret.0.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Whether a presented fingerprint matches recomputation.
    ///
    /// Expiry-vs-now is the caller's responsibility; this only answers
    /// whether the fingerprint belongs to the pair.
    pub fn verify(&self, target: &str, expire: i64, fingerprint: &str) -> bool {
        self.mint(target, expire) == fingerprint
    }
}
