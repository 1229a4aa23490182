use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use common::prelude::PrincipalId;

/// Header carrying the authenticated requester's principal id.
///
/// Authentication happens in a fronting layer; by the time a request
/// reaches this daemon the header value is trusted.
pub const REQUESTER_HEADER: &str = "x-depot-user";

/// The authenticated principal making this request.
#[derive(Debug, Clone, Copy)]
pub struct Requester(pub PrincipalId);

#[async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = RequesterError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(REQUESTER_HEADER)
            .ok_or(RequesterError::Missing)?;

        let id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<PrincipalId>().ok())
            .ok_or(RequesterError::Malformed)?;

        Ok(Requester(id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequesterError {
    #[error("missing {REQUESTER_HEADER} header")]
    Missing,
    #[error("malformed {REQUESTER_HEADER} header")]
    Malformed,
}

impl IntoResponse for RequesterError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}
