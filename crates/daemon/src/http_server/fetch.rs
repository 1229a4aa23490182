use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use object_store::StoreError;

use crate::ServiceState;

/// Query parameters carried by a signed fetch URL.
///
/// These are exactly the pairs [`common::prelude::AccessLinks`] appends
/// when minting; a link is self-contained and nothing about it is
/// persisted server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchQuery {
    /// Storage path the link grants access to
    pub target: String,
    /// Optional filename hint for the attachment disposition
    #[serde(default)]
    pub filename: Option<String>,
    /// Unix timestamp the link expires at
    pub expire: i64,
    /// Keyed fingerprint over the target and expiry
    pub secret: String,
}

/// Serve the object behind a signed fetch URL.
///
/// Signature validation runs before any storage access. Expired and
/// forged links draw the same response, so the endpoint cannot be used
/// as an oracle for how close a guessed fingerprint was. A valid link
/// for a missing object is a plain 404.
pub async fn handler(
    State(state): State<ServiceState>,
    Query(query): Query<FetchQuery>,
) -> Result<Response, FetchError> {
    if !state
        .links()
        .verify(&query.target, query.expire, &query.secret)
    {
        return Err(FetchError::LinkDenied);
    }

    let data = state
        .storage()
        .get(&query.target)
        .await?
        .ok_or_else(|| FetchError::NotFound(query.target.clone()))?;

    tracing::info!(
        target: "depot::audit",
        path = %query.target,
        size = data.len(),
        "fetch served"
    );

    let mime = content_type(&query.target);

    match &query.filename {
        Some(filename) if !filename.is_empty() => {
            let disposition = format!("attachment; filename*=UTF-8''{}", rfc5987_encode(filename));
            Ok((
                http::StatusCode::OK,
                [
                    (http::header::CONTENT_TYPE, mime),
                    (http::header::CONTENT_DISPOSITION, disposition),
                ],
                data,
            )
                .into_response())
        }
        _ => Ok((
            http::StatusCode::OK,
            [(http::header::CONTENT_TYPE, mime)],
            data,
        )
            .into_response()),
    }
}

/// MIME type for a storage path.
///
/// `.out` and `.ans` files are plain text but have no registered
/// extension mapping; everything else goes through extension lookup
/// with an octet-stream fallback.
fn content_type(target: &str) -> String {
    if target.ends_with(".out") || target.ends_with(".ans") {
        return "text/plain".to_string();
    }
    mime_guess::from_path(target)
        .first_or_octet_stream()
        .to_string()
}

/// Characters left bare in an RFC 5987 `filename*` value: the attr-char
/// set (alphanumerics plus the marks below). Everything else is
/// percent-encoded, UTF-8 first.
const RFC5987_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

fn rfc5987_encode(filename: &str) -> String {
    utf8_percent_encode(filename, RFC5987_ENCODE_SET).to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid or expired link")]
    LinkDenied,
    #[error("no such object: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        match self {
            FetchError::LinkDenied => (
                http::StatusCode::FORBIDDEN,
                "invalid or expired link".to_string(),
            )
                .into_response(),
            FetchError::NotFound(_) => {
                (http::StatusCode::NOT_FOUND, "Not found".to_string()).into_response()
            }
            FetchError::Storage(error) => {
                tracing::error!(%error, "fetch failed");
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_special_cases_are_text() {
        assert_eq!(content_type("user/1/run.out"), "text/plain");
        assert_eq!(content_type("user/1/expected.ans"), "text/plain");
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type("user/1/report.txt"), "text/plain");
        assert_eq!(content_type("user/1/paper.pdf"), "application/pdf");
    }

    #[test]
    fn test_content_type_unknown_is_octet_stream() {
        assert_eq!(content_type("user/1/blob"), "application/octet-stream");
        assert_eq!(content_type("user/1/data.zzz"), "application/octet-stream");
    }

    #[test]
    fn test_rfc5987_keeps_attr_chars() {
        assert_eq!(rfc5987_encode("report-v1.2_final.txt"), "report-v1.2_final.txt");
    }

    #[test]
    fn test_rfc5987_encodes_spaces_and_unicode() {
        assert_eq!(rfc5987_encode("my report.txt"), "my%20report.txt");
        assert_eq!(rfc5987_encode("übung.pdf"), "%C3%BCbung.pdf");
    }

    #[test]
    fn test_rfc5987_encodes_quotes_and_percent() {
        assert_eq!(rfc5987_encode("a\"b.txt"), "a%22b.txt");
        assert_eq!(rfc5987_encode("100%.txt"), "100%25.txt");
    }
}
