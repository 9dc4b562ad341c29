//! Site, account, path and security settings over the config store.

use axum::extract::Extension;
use axum::response::Json;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;

use super::auth::types::MessageResponse;
use super::auth::{hash_password, is_strong_password, AdminSession, Tier};
use crate::api::config_store::{get_config, get_flag, set_config, set_flag};
use crate::api::error::ApiError;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SiteSettings {
    pub site_title: String,
    pub site_icon: String,
    pub favicon: String,
    pub footer_text: String,
    pub bookmark_hidden: bool,
    pub project_url: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct SiteSettingsUpdate {
    pub site_title: Option<String>,
    pub site_icon: Option<String>,
    pub favicon: Option<String>,
    pub footer_text: Option<String>,
    pub bookmark_hidden: Option<bool>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AdminAccount {
    pub username: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct AdminAccountUpdate {
    pub username: Option<String>,
    #[schema(value_type = Option<String>)]
    pub password: Option<SecretString>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AdminPath {
    pub admin_path: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct AdminPathUpdate {
    #[serde(default)]
    pub admin_path: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SecuritySettings {
    pub ip_binding_enabled: bool,
}

#[utoipa::path(
    get,
    path = "/api/site-settings",
    responses(
        (status = 200, description = "Public site settings", body = SiteSettings)
    ),
    tag = "settings"
)]
pub async fn get_site_settings(
    pool: Extension<SqlitePool>,
) -> Result<Json<SiteSettings>, ApiError> {
    Ok(Json(SiteSettings {
        site_title: get_config(&pool, "site_title")
            .await?
            .unwrap_or_else(|| "Nav".to_string()),
        site_icon: get_config(&pool, "site_icon")
            .await?
            .unwrap_or_else(|| "\u{1f96d}".to_string()),
        favicon: get_config(&pool, "favicon").await?.unwrap_or_default(),
        footer_text: get_config(&pool, "footer_text").await?.unwrap_or_default(),
        bookmark_hidden: get_flag(&pool, "bookmark_hidden").await?,
        project_url: env!("CARGO_PKG_REPOSITORY").to_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/site-settings",
    request_body = SiteSettingsUpdate,
    responses(
        (status = 200, description = "Settings stored", body = MessageResponse),
        (status = 401, description = "Admin session required")
    ),
    tag = "settings"
)]
pub async fn update_site_settings(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<SiteSettingsUpdate>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(update)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    if let Some(site_title) = &update.site_title {
        set_config(&pool, "site_title", site_title).await?;
    }
    if let Some(site_icon) = &update.site_icon {
        set_config(&pool, "site_icon", site_icon).await?;
    }
    if let Some(favicon) = &update.favicon {
        set_config(&pool, "favicon", favicon).await?;
    }
    if let Some(footer_text) = &update.footer_text {
        set_config(&pool, "footer_text", footer_text).await?;
    }
    if let Some(bookmark_hidden) = update.bookmark_hidden {
        set_flag(&pool, "bookmark_hidden", bookmark_hidden).await?;
    }

    Ok(Json(MessageResponse::new("Site settings updated")))
}

#[utoipa::path(
    get,
    path = "/api/admin-account",
    responses(
        (status = 200, description = "Admin account info", body = AdminAccount),
        (status = 401, description = "Admin session required")
    ),
    tag = "settings"
)]
pub async fn get_admin_account(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
) -> Result<Json<AdminAccount>, ApiError> {
    Ok(Json(AdminAccount {
        username: get_config(&pool, "admin_username")
            .await?
            .unwrap_or_else(|| "admin".to_string()),
    }))
}

#[utoipa::path(
    put,
    path = "/api/admin-account",
    request_body = AdminAccountUpdate,
    responses(
        (status = 200, description = "Account updated", body = MessageResponse),
        (status = 400, description = "Invalid username or weak password"),
        (status = 401, description = "Admin session required")
    ),
    tag = "settings"
)]
pub async fn update_admin_account(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<AdminAccountUpdate>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(update)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    if let Some(username) = &update.username {
        let username = username.trim();
        if username.chars().count() < 3 {
            return Err(ApiError::Validation(
                "Username must be at least 3 characters".to_string(),
            ));
        }
        if username.chars().count() > 32 {
            return Err(ApiError::Validation(
                "Username must be at most 32 characters".to_string(),
            ));
        }
        set_config(&pool, "admin_username", username).await?;
    }

    if let Some(password) = &update.password {
        let password = password.expose_secret();
        if !password.is_empty() {
            if !is_strong_password(password) {
                return Err(ApiError::Validation(
                    "Password must be at least 8 characters and mix letters with digits"
                        .to_string(),
                ));
            }
            set_config(&pool, Tier::Admin.secret_key(), &hash_password(password)?).await?;
        }
    }

    Ok(Json(MessageResponse::new("Account updated")))
}

#[utoipa::path(
    get,
    path = "/api/admin-path",
    responses(
        (status = 200, description = "Admin panel path", body = AdminPath),
        (status = 401, description = "Admin session required")
    ),
    tag = "settings"
)]
pub async fn get_admin_path(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
) -> Result<Json<AdminPath>, ApiError> {
    Ok(Json(AdminPath {
        admin_path: get_config(&pool, "admin_path")
            .await?
            .unwrap_or_else(|| "/admin".to_string()),
    }))
}

#[utoipa::path(
    put,
    path = "/api/admin-path",
    request_body = AdminPathUpdate,
    responses(
        (status = 200, description = "Admin path stored", body = AdminPath),
        (status = 400, description = "Empty, root or reserved path"),
        (status = 401, description = "Admin session required")
    ),
    tag = "settings"
)]
pub async fn update_admin_path(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<AdminPathUpdate>>,
) -> Result<Json<AdminPath>, ApiError> {
    let Some(Json(update)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let admin_path = normalized_admin_path(&update.admin_path)?;
    set_config(&pool, "admin_path", &admin_path).await?;

    Ok(Json(AdminPath { admin_path }))
}

fn normalized_admin_path(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("Path must not be empty".to_string()));
    }

    let path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };

    if path == "/" {
        return Err(ApiError::Validation(
            "The root path cannot be used".to_string(),
        ));
    }
    if path.starts_with("/api") || path.starts_with("/static") {
        return Err(ApiError::Validation(
            "Reserved paths cannot be used".to_string(),
        ));
    }

    Ok(path)
}

#[utoipa::path(
    get,
    path = "/api/security-settings",
    responses(
        (status = 200, description = "Security settings", body = SecuritySettings),
        (status = 401, description = "Admin session required")
    ),
    tag = "settings"
)]
pub async fn get_security_settings(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
) -> Result<Json<SecuritySettings>, ApiError> {
    Ok(Json(SecuritySettings {
        ip_binding_enabled: get_flag(&pool, "ip_binding_enabled").await?,
    }))
}

#[utoipa::path(
    put,
    path = "/api/security-settings",
    request_body = SecuritySettings,
    responses(
        (status = 200, description = "Security settings stored", body = MessageResponse),
        (status = 401, description = "Admin session required")
    ),
    tag = "settings"
)]
pub async fn update_security_settings(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<SecuritySettings>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(update)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    set_flag(&pool, "ip_binding_enabled", update.ip_binding_enabled).await?;

    Ok(Json(MessageResponse::new("Security settings updated")))
}
