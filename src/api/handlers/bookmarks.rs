//! Private bookmarks, guarded only while marked private.

use axum::extract::{Extension, Path};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use utoipa::ToSchema;

use super::auth::types::MessageResponse;
use super::auth::BookmarkAccess;
use super::links::require_safe_url;
use crate::api::error::ApiError;

#[derive(ToSchema, Serialize, Deserialize, sqlx::FromRow, Debug)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub sort_order: i64,
    pub created_at: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct BookmarkPayload {
    pub title: Option<String>,
    pub url: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/bookmarks",
    responses(
        (status = 200, description = "All bookmarks", body = [Bookmark]),
        (status = 401, description = "Bookmark unlock required")
    ),
    tag = "bookmarks"
)]
pub async fn list_bookmarks(
    _access: BookmarkAccess,
    pool: Extension<SqlitePool>,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let bookmarks =
        sqlx::query_as::<_, Bookmark>("SELECT * FROM bookmarks ORDER BY sort_order, id DESC")
            .fetch_all(&*pool)
            .await?;
    Ok(Json(bookmarks))
}

#[utoipa::path(
    post,
    path = "/api/bookmarks",
    request_body = BookmarkPayload,
    responses(
        (status = 200, description = "Bookmark created"),
        (status = 400, description = "Missing title/URL or unsafe URL"),
        (status = 401, description = "Bookmark unlock required")
    ),
    tag = "bookmarks"
)]
pub async fn create_bookmark(
    _access: BookmarkAccess,
    pool: Extension<SqlitePool>,
    payload: Option<Json<BookmarkPayload>>,
) -> Result<Json<Value>, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    let title = payload.title.as_deref().map(str::trim).unwrap_or_default();
    let url = payload.url.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() || url.is_empty() {
        return Err(ApiError::Validation(
            "Title and URL are required".to_string(),
        ));
    }
    require_safe_url(url)?;

    let result = sqlx::query("INSERT INTO bookmarks (title, url, sort_order) VALUES (?, ?, 0)")
        .bind(title)
        .bind(url)
        .execute(&*pool)
        .await?;

    Ok(Json(
        json!({ "id": result.last_insert_rowid(), "message": "Created" }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/bookmarks/{id}",
    params(("id" = i64, Path, description = "Bookmark id")),
    responses(
        (status = 200, description = "Bookmark deleted", body = MessageResponse),
        (status = 401, description = "Bookmark unlock required")
    ),
    tag = "bookmarks"
)]
pub async fn delete_bookmark(
    _access: BookmarkAccess,
    Path(id): Path<i64>,
    pool: Extension<SqlitePool>,
) -> Result<Json<MessageResponse>, ApiError> {
    sqlx::query("DELETE FROM bookmarks WHERE id = ?")
        .bind(id)
        .execute(&*pool)
        .await?;
    Ok(Json(MessageResponse::new("Deleted")))
}
