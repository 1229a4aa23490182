use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use common::prelude::{FilesError, PrincipalId};

use crate::http_server::api::v0::files::files_error_response;
use crate::http_server::extract::Requester;
use crate::ServiceState;

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    /// Omit the filename hint so the browser renders the object inline
    /// instead of saving it
    #[serde(default)]
    pub no_attachment: Option<bool>,
}

/// Authorize a download and redirect to a freshly minted fetch link.
///
/// The redirect is a plain 302: links expire, so clients must come back
/// through this authorization step for every download rather than cache
/// the target.
pub async fn handler(
    State(state): State<ServiceState>,
    Requester(requester): Requester,
    Path((user_id, filename)): Path<(PrincipalId, String)>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, DownloadError> {
    let link = state
        .files()
        .authorize_download(
            requester,
            user_id,
            &filename,
            query.no_attachment.unwrap_or(false),
        )
        .await?;

    Ok((
        http::StatusCode::FOUND,
        [(http::header::LOCATION, link.url.to_string())],
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Files error: {0}")]
    Files(#[from] FilesError<sqlx::Error>),
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        match self {
            DownloadError::Files(error) => files_error_response(error),
        }
    }
}
