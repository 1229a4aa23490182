pub mod identity_provider;

use std::ops::Deref;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// URL of the transient database used when no `sqlite_path` is
/// configured.
pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Handle on the principals database.
///
/// Principal privileges and file ledgers are stored as JSON text
/// columns; the application is the only writer and treats both as
/// opaque documents (see [`identity_provider`]).
#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

impl Database {
    /// Connect to the database named by `database_url` and bring its
    /// schema up to date.
    ///
    /// Only `sqlite` URLs are accepted. A file-backed database is
    /// created on first use; the in-memory database is pinned to a
    /// single pooled connection so it survives for the life of the
    /// pool.
    pub async fn connect(database_url: &url::Url) -> Result<Self, DatabaseSetupError> {
        if database_url.scheme() != "sqlite" {
            return Err(DatabaseSetupError::UnknownDbType(
                database_url.scheme().to_string(),
            ));
        }

        let options = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(DatabaseSetupError::Unavailable)?
            .create_if_missing(true);

        // An in-memory sqlite database exists per connection; a pool
        // that recycles connections would silently drop the schema and
        // every row with them.
        let pool_options = if database_url.as_str() == MEMORY_DATABASE_URL {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(DatabaseSetupError::Unavailable)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DatabaseSetupError::MigrationFailed)?;

        Ok(Database(pool))
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("error occurred while attempting database migration: {0}")]
    MigrationFailed(sqlx::migrate::MigrateError),

    #[error("unable to perform initial connection and check of the database: {0}")]
    Unavailable(sqlx::Error),

    #[error("requested database type was not recognized: {0}")]
    UnknownDbType(String),
}
