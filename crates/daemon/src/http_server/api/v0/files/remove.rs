use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use common::prelude::FilesError;

use crate::http_server::extract::Requester;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveRequest {
    /// Filenames to remove; names not on the ledger are ignored
    pub filenames: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub remaining_files: usize,
    pub remaining_bytes: u64,
}

/// Remove a batch of the requesting principal's files.
pub async fn handler(
    State(state): State<ServiceState>,
    Requester(requester): Requester,
    Json(req): Json<RemoveRequest>,
) -> Result<impl IntoResponse, RemoveError> {
    if req.filenames.is_empty() {
        return Err(RemoveError::InvalidRequest(
            "at least one filename is required".into(),
        ));
    }

    let remaining = state.files().remove(requester, &req.filenames).await?;

    Ok((
        http::StatusCode::OK,
        Json(RemoveResponse {
            remaining_files: remaining.count(),
            remaining_bytes: remaining.total_size(),
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Files error: {0}")]
    Files(#[from] FilesError<sqlx::Error>),
}

impl IntoResponse for RemoveError {
    fn into_response(self) -> Response {
        match self {
            RemoveError::InvalidRequest(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            RemoveError::Files(error) => super::files_error_response(error),
        }
    }
}
