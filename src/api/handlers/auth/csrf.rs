//! Origin-based CSRF guard for state-mutating requests.
//!
//! This is an origin-matching defense, not a token-exchange scheme: zero
//! client-side state in exchange for weaker guarantees. Requests carrying
//! neither an `Origin` nor a `Referer` header are allowed, since some
//! legitimate clients omit both.

use axum::extract::Request;
use axum::http::{
    header::{HOST, ORIGIN, REFERER},
    HeaderMap, Method,
};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::api::error::ApiError;

/// Credential-submission endpoints must stay reachable without a prior
/// same-origin page load.
const EXEMPT_PATHS: &[&str] = &[
    "/api/init",
    "/api/login",
    "/api/verify-hidden",
    "/api/bookmarks/auth",
];

/// Middleware rejecting cross-site state-changing requests.
pub async fn same_origin_guard(request: Request, next: Next) -> Response {
    let mutating = matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::DELETE | Method::PATCH
    );
    if !mutating || EXEMPT_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    match check_origin(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}

/// Compare the `Origin` (or `Referer`) host against the request's own host.
fn check_origin(headers: &HeaderMap) -> Result<(), ApiError> {
    let claimed = headers
        .get(ORIGIN)
        .or_else(|| headers.get(REFERER))
        .and_then(|value| value.to_str().ok());
    let Some(claimed) = claimed else {
        // Neither header present: allow.
        return Ok(());
    };

    let request_host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(host_component);
    let claimed_host = Url::parse(claimed)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string));

    match (claimed_host, request_host) {
        (Some(claimed), Some(host)) if claimed == host => Ok(()),
        _ => Err(ApiError::OriginMismatch),
    }
}

/// Strip the port from a `Host` header value, bracketed IPv6 included.
fn host_component(host: &str) -> String {
    if let Some(stripped) = host.strip_prefix('[') {
        if let Some((addr, _)) = stripped.split_once(']') {
            return format!("[{addr}]");
        }
    }
    host.split(':').next().unwrap_or(host).to_string()
}
