use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use common::prelude::{PrincipalId, Privilege, Quota, SigningSecret};
use object_store::ObjectStoreConfig;

/// Daemon configuration, loaded from a TOML file.
///
/// Every section has a usable default except `links.secret`: the daemon
/// refuses to start without a signing secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // http server configuration
    /// Port the HTTP server listens on
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    // logging
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files (optional, logs to stdout only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    // collaborators
    /// Object storage backend holding the uploaded bytes
    #[serde(default)]
    pub storage: ObjectStoreConfig,
    /// Principal database settings
    #[serde(default)]
    pub identity: IdentityConfig,

    // policy
    /// Per-principal quota ceilings
    #[serde(default)]
    pub limit: LimitConfig,
    /// Signed access link settings
    #[serde(default)]
    pub links: LinksConfig,

    /// Principals written into the identity database at startup
    #[serde(default)]
    pub principals: Vec<PrincipalSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdentityConfig {
    /// Path to the sqlite database; an in-memory database is used when
    /// not set
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitConfig {
    /// Maximum number of files a principal may hold
    #[serde(default = "default_user_files")]
    pub user_files: usize,
    /// Maximum aggregate size in bytes of a principal's files
    #[serde(default = "default_user_files_size")]
    pub user_files_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Process-wide link-signing secret; required
    #[serde(default)]
    pub secret: Option<SigningSecret>,
    /// Seconds a minted link stays valid
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// External base URL minted links are built against
    #[serde(default = "default_base_url")]
    pub base_url: Url,
}

/// A principal seeded into the identity database at startup.
///
/// Seeding is an upsert on privileges: a principal that already exists
/// keeps its file ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalSeed {
    pub id: PrincipalId,
    #[serde(default)]
    pub privileges: Vec<Privilege>,
}

fn default_listen_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_user_files() -> usize {
    100
}

fn default_user_files_size() -> u64 {
    // 100 MiB
    100 * 1024 * 1024
}

fn default_ttl_secs() -> u64 {
    600
}

fn default_base_url() -> Url {
    Url::parse("http://localhost:8080").unwrap()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            log_level: default_log_level(),
            log_dir: None,
            storage: ObjectStoreConfig::default(),
            identity: IdentityConfig::default(),
            limit: LimitConfig::default(),
            links: LinksConfig::default(),
            principals: Vec::new(),
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            user_files: default_user_files(),
            user_files_size: default_user_files_size(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_secs: default_ttl_secs(),
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// The log level as a tracing level, falling back to INFO when the
    /// configured string does not parse.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }

    /// The configured per-principal quota.
    pub fn quota(&self) -> Quota {
        Quota {
            max_files: self.limit.user_files,
            max_bytes: self.limit.user_files_size,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
        assert_eq!(config.limit.user_files, 100);
        assert_eq!(config.limit.user_files_size, 100 * 1024 * 1024);
        assert!(config.links.secret.is_none());
        assert!(config.principals.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            listen_port = 9000
            log_level = "debug"

            [storage]
            type = "local"
            path = "/var/lib/depot/objects"

            [identity]
            sqlite_path = "/var/lib/depot/depot.sqlite"

            [limit]
            user_files = 2
            user_files_size = 1000

            [links]
            secret = "server-secret"
            ttl_secs = 300
            base_url = "https://files.example.com"

            [[principals]]
            id = 1
            privileges = ["create_file"]

            [[principals]]
            id = 2
            privileges = ["create_file", "unlimited_quota"]
        "#;

        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.listen_port, 9000);
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
        assert!(matches!(
            config.storage,
            ObjectStoreConfig::Local { ref path } if path.ends_with("objects")
        ));
        assert_eq!(
            config.identity.sqlite_path.as_deref(),
            Some(Path::new("/var/lib/depot/depot.sqlite"))
        );
        assert_eq!(config.quota().max_files, 2);
        assert_eq!(config.quota().max_bytes, 1000);
        assert!(config.links.secret.is_some());
        assert_eq!(config.links.ttl_secs, 300);
        assert_eq!(config.principals.len(), 2);
        assert_eq!(config.principals[1].privileges.len(), 2);
    }

    #[test]
    fn test_sparse_config_fills_defaults() {
        let raw = r#"
            [links]
            secret = "server-secret"
        "#;

        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.listen_port, 8080);
        assert!(matches!(config.storage, ObjectStoreConfig::Memory));
        assert!(config.identity.sqlite_path.is_none());
        assert_eq!(config.links.ttl_secs, 600);
        assert_eq!(config.links.base_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_bad_log_level_falls_back_to_info() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }
}
