//! Link CRUD and the hidden-links visibility rules.

use axum::extract::{ConnectInfo, Extension, Path, Query};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;
use url::Url;
use utoipa::{IntoParams, ToSchema};

use super::auth::{authorize, bearer_token, client_ip, AdminSession, AuthState, Tier};
use super::auth::types::MessageResponse;
use crate::api::error::ApiError;

#[derive(ToSchema, Serialize, Deserialize, sqlx::FromRow, Debug)]
pub struct Link {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub is_hidden: bool,
    pub sort_order: i64,
    pub created_at: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct LinkPayload {
    pub title: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct ReorderItem {
    pub id: i64,
    pub sort_order: i64,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct ReorderRequest {
    #[serde(default)]
    pub orders: Vec<ReorderItem>,
}

#[derive(IntoParams, Deserialize, Debug)]
pub struct LinksQuery {
    /// Set to include hidden links, together with `hidden_token`.
    pub show_hidden: Option<String>,
    /// Unlock token from `/api/verify-hidden`.
    pub hidden_token: Option<String>,
}

/// Title and URL present, URL limited to http(s).
fn validated_link(payload: &LinkPayload) -> Result<(String, String), ApiError> {
    let title = payload.title.as_deref().map(str::trim).unwrap_or_default();
    let url = payload.url.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() || url.is_empty() {
        return Err(ApiError::Validation(
            "Title and URL are required".to_string(),
        ));
    }
    require_safe_url(url)?;
    Ok((title.to_string(), url.to_string()))
}

/// Shared by links and bookmarks: stored URLs must be plain web links.
pub(crate) fn require_safe_url(url: &str) -> Result<(), ApiError> {
    let scheme_ok = Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false);
    if scheme_ok {
        Ok(())
    } else {
        Err(ApiError::Validation("Unsafe URL".to_string()))
    }
}

#[utoipa::path(
    get,
    path = "/api/links",
    params(LinksQuery),
    responses(
        (status = 200, description = "Links visible to the caller", body = [Link])
    ),
    tag = "links"
)]
pub async fn list_links(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    query: Query<LinksQuery>,
    pool: Extension<SqlitePool>,
    auth: Extension<Arc<AuthState>>,
) -> Result<Json<Vec<Link>>, ApiError> {
    let ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));

    // A hidden-tier unlock token or a live admin session reveals hidden rows.
    let mut can_see_hidden = false;
    if query.show_hidden.is_some() {
        if let Some(token) = &query.hidden_token {
            can_see_hidden = authorize(&auth, &pool, Tier::Hidden, token, ip.as_deref())
                .await
                .is_ok();
        }
    }
    if !can_see_hidden {
        if let Some(token) = bearer_token(&headers) {
            can_see_hidden = authorize(&auth, &pool, Tier::Admin, &token, ip.as_deref())
                .await
                .is_ok();
        }
    }

    let links = if can_see_hidden {
        sqlx::query_as::<_, Link>("SELECT * FROM links ORDER BY sort_order, id")
            .fetch_all(&*pool)
            .await?
    } else {
        sqlx::query_as::<_, Link>("SELECT * FROM links WHERE is_hidden = 0 ORDER BY sort_order, id")
            .fetch_all(&*pool)
            .await?
    };

    Ok(Json(links))
}

#[utoipa::path(
    post,
    path = "/api/links",
    request_body = LinkPayload,
    responses(
        (status = 200, description = "Link created"),
        (status = 400, description = "Missing title/URL or unsafe URL"),
        (status = 401, description = "Admin session required")
    ),
    tag = "links"
)]
pub async fn create_link(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<LinkPayload>>,
) -> Result<Json<Value>, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    let (title, url) = validated_link(&payload)?;

    let result = sqlx::query(
        "INSERT INTO links (title, url, icon, description, category_id, is_hidden, sort_order) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&title)
    .bind(&url)
    .bind(&payload.icon)
    .bind(&payload.description)
    .bind(payload.category_id)
    .bind(payload.is_hidden)
    .bind(payload.sort_order)
    .execute(&*pool)
    .await?;

    Ok(Json(
        json!({ "id": result.last_insert_rowid(), "message": "Created" }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/links/{id}",
    params(("id" = i64, Path, description = "Link id")),
    request_body = LinkPayload,
    responses(
        (status = 200, description = "Link updated", body = MessageResponse),
        (status = 400, description = "Missing title/URL or unsafe URL"),
        (status = 401, description = "Admin session required")
    ),
    tag = "links"
)]
pub async fn update_link(
    _session: AdminSession,
    Path(id): Path<i64>,
    pool: Extension<SqlitePool>,
    payload: Option<Json<LinkPayload>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    let (title, url) = validated_link(&payload)?;

    sqlx::query(
        "UPDATE links SET title = ?, url = ?, icon = ?, description = ?, category_id = ?, \
         is_hidden = ?, sort_order = ? WHERE id = ?",
    )
    .bind(&title)
    .bind(&url)
    .bind(&payload.icon)
    .bind(&payload.description)
    .bind(payload.category_id)
    .bind(payload.is_hidden)
    .bind(payload.sort_order)
    .bind(id)
    .execute(&*pool)
    .await?;

    Ok(Json(MessageResponse::new("Updated")))
}

#[utoipa::path(
    delete,
    path = "/api/links/{id}",
    params(("id" = i64, Path, description = "Link id")),
    responses(
        (status = 200, description = "Link deleted", body = MessageResponse),
        (status = 401, description = "Admin session required")
    ),
    tag = "links"
)]
pub async fn delete_link(
    _session: AdminSession,
    Path(id): Path<i64>,
    pool: Extension<SqlitePool>,
) -> Result<Json<MessageResponse>, ApiError> {
    sqlx::query("DELETE FROM links WHERE id = ?")
        .bind(id)
        .execute(&*pool)
        .await?;
    Ok(Json(MessageResponse::new("Deleted")))
}

#[utoipa::path(
    put,
    path = "/api/links/reorder",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Sort order updated", body = MessageResponse),
        (status = 401, description = "Admin session required")
    ),
    tag = "links"
)]
pub async fn reorder_links(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<ReorderRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    for item in &request.orders {
        sqlx::query("UPDATE links SET sort_order = ? WHERE id = ?")
            .bind(item.sort_order)
            .bind(item.id)
            .execute(&*pool)
            .await?;
    }

    Ok(Json(MessageResponse::new("Order updated")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_urls_are_web_links_only() {
        assert!(require_safe_url("https://example.com").is_ok());
        assert!(require_safe_url("http://example.com/path?q=1").is_ok());
        assert!(require_safe_url("javascript:alert(1)").is_err());
        assert!(require_safe_url("file:///etc/passwd").is_err());
        assert!(require_safe_url("not a url").is_err());
    }

    #[test]
    fn link_validation_requires_title_and_url() {
        let payload = LinkPayload {
            title: Some("  ".to_string()),
            url: Some("https://example.com".to_string()),
            icon: None,
            description: None,
            category_id: None,
            is_hidden: false,
            sort_order: 0,
        };
        assert!(validated_link(&payload).is_err());

        let payload = LinkPayload {
            title: Some("Example".to_string()),
            url: None,
            icon: None,
            description: None,
            category_id: None,
            is_hidden: false,
            sort_order: 0,
        };
        assert!(validated_link(&payload).is_err());
    }
}
