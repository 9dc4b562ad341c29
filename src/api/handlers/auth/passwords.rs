//! Admin-side writes of the secondary tier secrets.

use axum::extract::Extension;
use axum::response::Json;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;

use super::guard::AdminSession;
use super::password::{hash_password, is_strong_password};
use super::tier::Tier;
use super::types::{MessageResponse, PasswordUpdateRequest};
use crate::api::config_store::set_config;
use crate::api::error::ApiError;

#[utoipa::path(
    put,
    path = "/api/config/hidden-password",
    request_body = PasswordUpdateRequest,
    responses(
        (status = 200, description = "Hidden password updated", body = MessageResponse),
        (status = 400, description = "Password too short"),
        (status = 401, description = "Admin session required")
    ),
    tag = "settings"
)]
pub async fn update_hidden_password(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<PasswordUpdateRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    let password = request.password.expose_secret();
    // The view-unlock secret tolerates a weaker policy than real credentials.
    if password.chars().count() < 4 {
        return Err(ApiError::Validation(
            "Password must be at least 4 characters".to_string(),
        ));
    }

    set_config(&pool, Tier::Hidden.secret_key(), &hash_password(password)?).await?;
    Ok(Json(MessageResponse::new("Hidden password updated")))
}

#[utoipa::path(
    put,
    path = "/api/config/bookmark-password",
    request_body = PasswordUpdateRequest,
    responses(
        (status = 200, description = "Bookmark password updated", body = MessageResponse),
        (status = 400, description = "Weak password"),
        (status = 401, description = "Admin session required")
    ),
    tag = "settings"
)]
pub async fn update_bookmark_password(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<PasswordUpdateRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    let password = request.password.expose_secret();
    if !is_strong_password(password) {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters and mix letters with digits".to_string(),
        ));
    }

    set_config(&pool, Tier::Bookmark.secret_key(), &hash_password(password)?).await?;
    Ok(Json(MessageResponse::new("Bookmark password updated")))
}
