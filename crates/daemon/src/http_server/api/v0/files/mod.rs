use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use common::prelude::FilesError;

use crate::ServiceState;

pub mod list;
pub mod remove;
pub mod upload;

// Re-export for convenience
pub use remove::RemoveRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(list::handler))
        .route("/upload", post(upload::handler))
        .route("/remove", post(remove::handler))
        .with_state(state)
}

/// Shared response mapping for file workflow errors.
///
/// Quota and permission rejections surface as 403 so a client cannot
/// distinguish "no privilege" from "over quota" by status alone; the
/// body carries the detail. Backend failures log at error level and
/// return an opaque 500.
pub(crate) fn files_error_response(error: FilesError<sqlx::Error>) -> Response {
    match &error {
        FilesError::InvalidName(_) => (
            http::StatusCode::BAD_REQUEST,
            format!("Bad request: {}", error),
        )
            .into_response(),
        FilesError::Duplicate(_) => {
            (http::StatusCode::CONFLICT, error.to_string()).into_response()
        }
        FilesError::CreateNotPermitted(_) | FilesError::Quota(_) | FilesError::AccessDenied => {
            (http::StatusCode::FORBIDDEN, error.to_string()).into_response()
        }
        FilesError::UnknownPrincipal(_) => {
            (http::StatusCode::NOT_FOUND, error.to_string()).into_response()
        }
        FilesError::MissingMetadata(_) | FilesError::Identity(_) | FilesError::Storage(_) => {
            tracing::error!(%error, "file request failed");
            (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error".to_string(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::prelude::QuotaError;

    #[test]
    fn test_quota_rejection_maps_to_forbidden() {
        let error: FilesError<sqlx::Error> = FilesError::Quota(QuotaError::FileCount {
            current: 2,
            max: 2,
        });
        let response = files_error_response(error);
        assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let error: FilesError<sqlx::Error> = FilesError::Duplicate("report.txt".into());
        let response = files_error_response(error);
        assert_eq!(response.status(), http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_unknown_principal_maps_to_not_found() {
        let error: FilesError<sqlx::Error> = FilesError::UnknownPrincipal(9);
        let response = files_error_response(error);
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_backend_failure_is_opaque() {
        let error: FilesError<sqlx::Error> =
            FilesError::MissingMetadata("user/1/report.txt".into());
        let response = files_error_response(error);
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
