use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::Row;

use common::prelude::{
    IdentityError, IdentityProvider, Ledger, Principal, PrincipalId, Privilege,
};

use crate::database::Database;

// Privileges and ledgers live in JSON text columns. Sqlite never looks
// inside them; every read and write round-trips the whole document.

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, sqlx::Error> {
    serde_json::to_string(value).map_err(|e| sqlx::Error::Encode(e.into()))
}

fn decode_column<T: serde::de::DeserializeOwned>(
    column: &str,
    raw: &str,
) -> Result<T, sqlx::Error> {
    serde_json::from_str(raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: e.into(),
    })
}

#[async_trait]
impl IdentityProvider for Database {
    type Error = sqlx::Error;

    async fn get(
        &self,
        id: PrincipalId,
    ) -> Result<Option<Principal>, IdentityError<Self::Error>> {
        let row = sqlx::query("SELECT privileges, files FROM principals WHERE id = $1")
            .bind(id as i64)
            .fetch_optional(&**self)
            .await
            .map_err(IdentityError::Provider)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let privileges_json: String = row.try_get("privileges").map_err(IdentityError::Provider)?;
        let files_json: String = row.try_get("files").map_err(IdentityError::Provider)?;

        let privileges: HashSet<Privilege> = decode_column("privileges", &privileges_json)?;
        let files: Ledger = decode_column("files", &files_json)?;

        Ok(Some(Principal {
            id,
            privileges,
            files,
        }))
    }

    async fn put(&self, principal: Principal) -> Result<(), IdentityError<Self::Error>> {
        let privileges_json = encode_json(&principal.privileges)?;
        let files_json = encode_json(&principal.files)?;

        sqlx::query(
            r#"
            INSERT INTO principals (id, privileges, files)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                privileges = excluded.privileges,
                files = excluded.files,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(principal.id as i64)
        .bind(privileges_json)
        .bind(files_json)
        .execute(&**self)
        .await
        .map_err(IdentityError::Provider)?;

        Ok(())
    }

    async fn set_files(
        &self,
        id: PrincipalId,
        files: Ledger,
    ) -> Result<(), IdentityError<Self::Error>> {
        let files_json = encode_json(&files)?;

        let result = sqlx::query(
            "UPDATE principals SET files = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
        )
        .bind(files_json)
        .bind(id as i64)
        .execute(&**self)
        .await
        .map_err(IdentityError::Provider)?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::UnknownPrincipal(id));
        }

        Ok(())
    }
}
