//! Fallback proxy for the UI dev server.
//!
//! Requests that match no API route are fetched from the configured origin
//! and echoed back: status and body verbatim, headers minus the hop-by-hop
//! set whose values belong to this server's own transport. Only GET is
//! forwarded; the UI is static assets and everything else lives under /api.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header::HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::{ApiError, AppState};

/// Headers never copied from the origin response.
const EXCLUDED_HEADERS: [&str; 4] = [
    "content-encoding",
    "content-length",
    "transfer-encoding",
    "connection",
];

/// Fetch the request path from the UI origin and relay the response.
pub async fn forward_to_ui(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }

    let target = format!("{}{}", state.ui_origin, uri.path().trim_start_matches('/'));
    tracing::debug!(%target, "proxying to ui origin");

    let upstream = state.http.get(&target).send().await.map_err(|err| {
        tracing::warn!(%target, error = %err, "ui origin request failed");
        ApiError::BadGateway(format!("upstream request failed: {err}"))
    })?;

    let mut builder = Response::builder().status(upstream.status());
    for (name, value) in upstream.headers() {
        if !is_excluded(name) {
            builder = builder.header(name.clone(), value.clone());
        }
    }

    let body = upstream.bytes().await.map_err(|err| {
        tracing::warn!(%target, error = %err, "ui origin body read failed");
        ApiError::BadGateway(format!("upstream body read failed: {err}"))
    })?;

    builder
        .body(Body::from(body))
        .map_err(|err| ApiError::Internal(format!("assembling proxied response: {err}")))
}

fn is_excluded(name: &HeaderName) -> bool {
    EXCLUDED_HEADERS
        .iter()
        .any(|excluded| name.as_str().eq_ignore_ascii_case(excluded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_headers_match_case_insensitively() {
        assert!(is_excluded(&HeaderName::from_static("content-encoding")));
        assert!(is_excluded(&HeaderName::from_static("transfer-encoding")));
        assert!(!is_excluded(&HeaderName::from_static("content-type")));
        assert!(!is_excluded(&HeaderName::from_static("x-custom")));
    }
}
