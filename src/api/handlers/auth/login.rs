//! Admin login and session probing.

use axum::extract::{ConnectInfo, Extension};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use super::guard::AdminSession;
use super::lockout::LockoutDecision;
use super::password::verify_password;
use super::state::AuthState;
use super::tier::Tier;
use super::types::{LoginRequest, TokenResponse, VerifyTokenResponse};
use super::utils::{client_ip, lockout_key};
use crate::api::config_store::get_config;
use crate::api::error::ApiError;

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin session issued", body = TokenResponse),
        (status = 400, description = "Not initialized yet"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Locked out after repeated failures")
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    pool: Extension<SqlitePool>,
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Response, ApiError> {
    let ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));
    let ip_key = lockout_key(ip.as_deref());

    if let LockoutDecision::Locked { retry_after_minutes } = auth.attempts().check(&ip_key).await {
        return Err(ApiError::RateLimited(retry_after_minutes));
    }

    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let Some(stored_hash) = get_config(&pool, Tier::Admin.secret_key()).await? else {
        // Uninitialized instance: tell the client to run setup first.
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Password not initialized", "need_init": true })),
        )
            .into_response());
    };

    let username = get_config(&pool, "admin_username")
        .await?
        .unwrap_or_else(|| "admin".to_string());

    // Failures are recorded before answering so lockout accounting cannot be
    // bypassed by short-circuiting.
    if request.username != username {
        auth.attempts().record_failure(&ip_key).await;
        return Err(ApiError::InvalidCredential);
    }
    if !verify_password(request.password.expose_secret(), &stored_hash) {
        auth.attempts().record_failure(&ip_key).await;
        return Err(ApiError::InvalidCredential);
    }

    auth.attempts().record_success(&ip_key).await;
    let token = auth.tokens().issue(Tier::Admin, ip).await?;
    info!("Admin login from {ip_key}");

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            token,
            expires_in: Tier::Admin.expires_in(),
        }),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/verify-token",
    responses(
        (status = 200, description = "Session is live", body = VerifyTokenResponse),
        (status = 401, description = "Missing, expired or mismatched token")
    ),
    tag = "auth"
)]
pub async fn verify_token(_session: AdminSession) -> Json<VerifyTokenResponse> {
    // Guarded no-op: clients call this to probe session liveness.
    Json(VerifyTokenResponse { valid: true })
}
