//! Request-boundary error type shared by all handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

/// Everything a handler can fail with. Recovered at the request boundary and
/// surfaced as a status code plus an `{"error": "..."}` body; never fatal to
/// the process.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Token expired")]
    TokenExpired,
    #[error("Session IP mismatch")]
    IpMismatch,
    #[error("Too many failed attempts, please retry in {0} minute(s)")]
    RateLimited(u64),
    #[error("Invalid credentials")]
    InvalidCredential,
    #[error("{0}")]
    Validation(String),
    #[error("Cross-origin request rejected")]
    OriginMismatch,
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Failed to fetch upstream resource")]
    Upstream(#[source] anyhow::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized
            | Self::TokenExpired
            | Self::IpMismatch
            | Self::InvalidCredential => StatusCode::UNAUTHORIZED,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation(_) | Self::NotConfigured(_) => StatusCode::BAD_REQUEST,
            Self::OriginMismatch => StatusCode::FORBIDDEN,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(err) => error!("Internal error: {err:?}"),
            Self::Upstream(err) => error!("Upstream fetch failed: {err:?}"),
            _ => {}
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::IpMismatch.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::RateLimited(3).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::InvalidCredential.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Validation("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::OriginMismatch.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotConfigured("bookmark password").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn rate_limited_message_names_the_wait() {
        let message = ApiError::RateLimited(15).to_string();
        assert!(message.contains("15 minute"));
    }
}
