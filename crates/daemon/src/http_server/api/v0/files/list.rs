use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use common::prelude::{FileRecord, FilesError, Quota};

use crate::http_server::extract::Requester;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub files: Vec<FileRecord>,
    pub count: usize,
    pub total_bytes: u64,
    /// The configured ceilings the aggregates are judged against
    pub quota: Quota,
}

/// List the requesting principal's ledger with its aggregates.
pub async fn handler(
    State(state): State<ServiceState>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ListError> {
    let ledger = state.files().list(requester).await?;

    Ok((
        http::StatusCode::OK,
        Json(ListResponse {
            count: ledger.count(),
            total_bytes: ledger.total_size(),
            quota: state.files().quota(),
            files: ledger.records().to_vec(),
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Files error: {0}")]
    Files(#[from] FilesError<sqlx::Error>),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        match self {
            ListError::Files(error) => super::files_error_response(error),
        }
    }
}
