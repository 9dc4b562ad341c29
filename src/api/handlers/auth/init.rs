//! First-run admin initialization.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use secrecy::ExposeSecret;
use sqlx::SqlitePool;

use super::password::{hash_password, is_strong_password};
use super::tier::Tier;
use super::types::{CheckInitResponse, InitRequest, MessageResponse};
use crate::api::config_store::{get_config, set_config};
use crate::api::error::ApiError;

#[utoipa::path(
    post,
    path = "/api/init",
    request_body = InitRequest,
    responses(
        (status = 200, description = "Admin account created", body = MessageResponse),
        (status = 400, description = "Already initialized or weak password")
    ),
    tag = "auth"
)]
pub async fn init(
    pool: Extension<SqlitePool>,
    payload: Option<Json<InitRequest>>,
) -> Result<Response, ApiError> {
    if get_config(&pool, Tier::Admin.secret_key()).await?.is_some() {
        return Err(ApiError::Validation("Already initialized".to_string()));
    }

    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    let password = request.password.expose_secret();
    if !is_strong_password(password) {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters and mix letters with digits".to_string(),
        ));
    }

    set_config(&pool, "admin_username", "admin").await?;
    set_config(&pool, Tier::Admin.secret_key(), &hash_password(password)?).await?;

    Ok((StatusCode::OK, Json(MessageResponse::new("Initialized"))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/check-init",
    responses(
        (status = 200, description = "Whether first-run setup is still needed", body = CheckInitResponse)
    ),
    tag = "auth"
)]
pub async fn check_init(pool: Extension<SqlitePool>) -> Result<Json<CheckInitResponse>, ApiError> {
    // Status probe only; never touches the lockout tracker.
    let need_init = get_config(&pool, Tier::Admin.secret_key()).await?.is_none();
    Ok(Json(CheckInitResponse { need_init }))
}
