use url::Url;

use common::prelude::{AccessLinks, FileService, IdentityProvider, LinkSigner, Principal};
use object_store::Storage;

use crate::database::{Database, DatabaseSetupError, MEMORY_DATABASE_URL};
use crate::service_config::Config;

/// Main service state - wires the collaborators together
#[derive(Clone)]
pub struct State {
    database: Database,
    storage: Storage,
    links: AccessLinks,
    files: FileService<Database>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup the principal database
        let sqlite_database_url = match config.identity.sqlite_path {
            Some(ref path) => {
                // the file itself is created on first connect
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse(MEMORY_DATABASE_URL).map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup object storage
        let storage = Storage::new(config.storage.clone()).await?;

        // 3. Setup the link minter; the signing secret is the one piece
        //    of configuration with no default
        let secret = config
            .links
            .secret
            .clone()
            .ok_or(StateSetupError::MissingSecret)?;
        let links = AccessLinks::new(
            LinkSigner::new(secret),
            config.links.ttl_secs,
            config.links.base_url.clone(),
        );

        // 4. Seed configured principals. Privileges are overwritten;
        //    an existing principal keeps its file ledger.
        for seed in &config.principals {
            let principal = match database
                .get(seed.id)
                .await
                .map_err(|e| StateSetupError::Seed(format!("principal {}: {}", seed.id, e)))?
            {
                Some(existing) => Principal {
                    id: seed.id,
                    privileges: seed.privileges.iter().copied().collect(),
                    files: existing.files,
                },
                None => Principal::with_privileges(seed.id, seed.privileges.iter().copied()),
            };

            database
                .put(principal)
                .await
                .map_err(|e| StateSetupError::Seed(format!("principal {}: {}", seed.id, e)))?;
            tracing::info!(id = seed.id, "seeded principal");
        }

        // 5. The file service drives the upload/remove/download workflows
        let files = FileService::new(
            database.clone(),
            storage.clone(),
            config.quota(),
            links.clone(),
        );

        Ok(Self {
            database,
            storage,
            links,
            files,
        })
    }

    pub fn files(&self) -> &FileService<Database> {
        &self.files
    }

    pub fn links(&self) -> &AccessLinks {
        &self.links
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        &self.database
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("links.secret must be configured")]
    MissingSecret,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
    #[error("Storage setup error: {0}")]
    StorageSetupError(#[from] object_store::StoreError),
    #[error("Seed error: {0}")]
    Seed(String),
}
