use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use common::prelude::{FileRecord, FilesError};

use crate::http_server::extract::Requester;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Ledger record for the stored file, sized from backend metadata
    pub file: FileRecord,
}

/// Accept a multipart upload for the requesting principal.
///
/// The form carries an optional `filename` text part and a required
/// `file` part. Quota, naming, and duplicate checks happen in the file
/// service; this handler only parses the form.
pub async fn handler(
    State(state): State<ServiceState>,
    Requester(requester): Requester,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    let mut filename: Option<String> = None;
    let mut upload: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "filename" => {
                filename = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| UploadError::Multipart(e.to_string()))?,
                );
            }
            "file" => {
                let original_name = field.file_name().map(|s| s.to_string());
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
                upload = Some((original_name, content));
            }
            _ => {}
        }
    }

    let (original_name, content) =
        upload.ok_or_else(|| UploadError::InvalidRequest("a file part is required".into()))?;

    let record = state
        .files()
        .upload(requester, name_hint(filename, original_name), content)
        .await?;

    Ok((http::StatusCode::OK, Json(UploadResponse { file: record })).into_response())
}

/// Pick the filename hint for an upload.
///
/// The explicit `filename` field wins over the file part's own name;
/// blank values count as absent. With neither, the file service
/// generates a random name.
fn name_hint(filename: Option<String>, original_name: Option<String>) -> Option<String> {
    [filename, original_name]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Multipart error: {0}")]
    Multipart(String),
    #[error("Files error: {0}")]
    Files(#[from] FilesError<sqlx::Error>),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::InvalidRequest(msg) | UploadError::Multipart(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            UploadError::Files(error) => super::files_error_response(error),
        }
    }
}
