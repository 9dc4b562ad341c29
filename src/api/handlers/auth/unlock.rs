//! Shared-secret unlocks for the hidden-links view and the bookmarks page.

use axum::extract::{ConnectInfo, Extension};
use axum::http::HeaderMap;
use axum::response::Json;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;

use super::lockout::LockoutDecision;
use super::password::verify_tier;
use super::state::AuthState;
use super::tier::Tier;
use super::types::{BookmarksCheckResponse, TokenResponse, UnlockRequest};
use super::utils::{client_ip, lockout_key};
use crate::api::config_store::{get_config, get_flag};
use crate::api::error::ApiError;

/// Credential check shared by both unlock endpoints: lockout first, then the
/// slow hash comparison, then a fresh tier token on success. Tiers without a
/// fallback pass `not_configured` to fail before the hash comparison when
/// their secret was never set.
async fn unlock(
    tier: Tier,
    not_configured: Option<&'static str>,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    pool: &SqlitePool,
    auth: &AuthState,
    payload: Option<Json<UnlockRequest>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let ip = client_ip(headers, peer);
    let ip_key = lockout_key(ip.as_deref());

    if let LockoutDecision::Locked { retry_after_minutes } = auth.attempts().check(&ip_key).await {
        return Err(ApiError::RateLimited(retry_after_minutes));
    }

    if let Some(name) = not_configured {
        if get_config(pool, tier.secret_key()).await?.is_none() {
            return Err(ApiError::NotConfigured(name));
        }
    }

    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    if !verify_tier(pool, tier, request.password.expose_secret()).await? {
        auth.attempts().record_failure(&ip_key).await;
        return Err(ApiError::InvalidCredential);
    }

    auth.attempts().record_success(&ip_key).await;
    let token = auth.tokens().issue(tier, ip).await?;

    Ok(Json(TokenResponse {
        token,
        expires_in: tier.expires_in(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/verify-hidden",
    request_body = UnlockRequest,
    responses(
        (status = 200, description = "Hidden-links unlock issued", body = TokenResponse),
        (status = 401, description = "Wrong password"),
        (status = 429, description = "Locked out after repeated failures")
    ),
    tag = "auth"
)]
pub async fn verify_hidden(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    pool: Extension<SqlitePool>,
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<UnlockRequest>>,
) -> Result<Json<TokenResponse>, ApiError> {
    // The hidden tier falls back to the admin hash, so it is never "not
    // configured" on an initialized instance.
    unlock(
        Tier::Hidden,
        None,
        &headers,
        peer.map(|ConnectInfo(addr)| addr),
        &pool,
        &auth,
        payload,
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/bookmarks/auth",
    request_body = UnlockRequest,
    responses(
        (status = 200, description = "Bookmarks unlock issued", body = TokenResponse),
        (status = 400, description = "Bookmark password not configured"),
        (status = 401, description = "Wrong password"),
        (status = 429, description = "Locked out after repeated failures")
    ),
    tag = "auth"
)]
pub async fn bookmarks_auth(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    pool: Extension<SqlitePool>,
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<UnlockRequest>>,
) -> Result<Json<TokenResponse>, ApiError> {
    unlock(
        Tier::Bookmark,
        Some("Bookmark password"),
        &headers,
        peer.map(|ConnectInfo(addr)| addr),
        &pool,
        &auth,
        payload,
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/bookmarks/check",
    responses(
        (status = 200, description = "Bookmarks protection status", body = BookmarksCheckResponse)
    ),
    tag = "auth"
)]
pub async fn bookmarks_check(
    pool: Extension<SqlitePool>,
) -> Result<Json<BookmarksCheckResponse>, ApiError> {
    // Status probe only; never touches the lockout tracker.
    Ok(Json(BookmarksCheckResponse {
        password_set: get_config(&pool, Tier::Bookmark.secret_key())
            .await?
            .is_some(),
        bookmark_hidden: get_flag(&pool, "bookmark_hidden").await?,
    }))
}
