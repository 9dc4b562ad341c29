//! Category CRUD and the default-category setting.

use axum::extract::{Extension, Path};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use utoipa::ToSchema;

use super::auth::types::MessageResponse;
use super::auth::AdminSession;
use super::links::ReorderRequest;
use crate::api::config_store::{get_config, set_config};
use crate::api::error::ApiError;

#[derive(ToSchema, Serialize, Deserialize, sqlx::FromRow, Debug)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub sort_order: i64,
    pub created_at: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct DefaultCategoryResponse {
    pub default_category_id: Option<i64>,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct DefaultCategoryRequest {
    pub category_id: Option<i64>,
}

fn validated_name(payload: &CategoryPayload) -> Result<String, ApiError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    Ok(name.to_string())
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories", body = [Category])
    ),
    tag = "categories"
)]
pub async fn list_categories(
    pool: Extension<SqlitePool>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY sort_order, id")
            .fetch_all(&*pool)
            .await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Category created"),
        (status = 400, description = "Missing name"),
        (status = 401, description = "Admin session required")
    ),
    tag = "categories"
)]
pub async fn create_category(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<CategoryPayload>>,
) -> Result<Json<Value>, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    let name = validated_name(&payload)?;

    let result = sqlx::query("INSERT INTO categories (name, parent_id, sort_order) VALUES (?, ?, ?)")
        .bind(&name)
        .bind(payload.parent_id)
        .bind(payload.sort_order)
        .execute(&*pool)
        .await?;

    Ok(Json(
        json!({ "id": result.last_insert_rowid(), "message": "Created" }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Category updated", body = MessageResponse),
        (status = 400, description = "Missing name"),
        (status = 401, description = "Admin session required")
    ),
    tag = "categories"
)]
pub async fn update_category(
    _session: AdminSession,
    Path(id): Path<i64>,
    pool: Extension<SqlitePool>,
    payload: Option<Json<CategoryPayload>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };
    let name = validated_name(&payload)?;

    sqlx::query("UPDATE categories SET name = ?, parent_id = ?, sort_order = ? WHERE id = ?")
        .bind(&name)
        .bind(payload.parent_id)
        .bind(payload.sort_order)
        .bind(id)
        .execute(&*pool)
        .await?;

    Ok(Json(MessageResponse::new("Updated")))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted, its links kept uncategorized", body = MessageResponse),
        (status = 401, description = "Admin session required")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    _session: AdminSession,
    Path(id): Path<i64>,
    pool: Extension<SqlitePool>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Links survive their category; the reference is nulled, not cascaded.
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&*pool)
        .await?;
    sqlx::query("UPDATE links SET category_id = NULL WHERE category_id = ?")
        .bind(id)
        .execute(&*pool)
        .await?;

    Ok(Json(MessageResponse::new("Deleted")))
}

#[utoipa::path(
    put,
    path = "/api/categories/reorder",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Sort order updated", body = MessageResponse),
        (status = 401, description = "Admin session required")
    ),
    tag = "categories"
)]
pub async fn reorder_categories(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<ReorderRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    for item in &request.orders {
        sqlx::query("UPDATE categories SET sort_order = ? WHERE id = ?")
            .bind(item.sort_order)
            .bind(item.id)
            .execute(&*pool)
            .await?;
    }

    Ok(Json(MessageResponse::new("Order updated")))
}

#[utoipa::path(
    get,
    path = "/api/default-category",
    responses(
        (status = 200, description = "Category preselected for new links", body = DefaultCategoryResponse)
    ),
    tag = "categories"
)]
pub async fn get_default_category(
    pool: Extension<SqlitePool>,
) -> Result<Json<DefaultCategoryResponse>, ApiError> {
    let default_category_id = get_config(&pool, "default_category_id")
        .await?
        .and_then(|value| value.parse().ok());
    Ok(Json(DefaultCategoryResponse {
        default_category_id,
    }))
}

#[utoipa::path(
    put,
    path = "/api/default-category",
    request_body = DefaultCategoryRequest,
    responses(
        (status = 200, description = "Default category updated", body = MessageResponse),
        (status = 401, description = "Admin session required")
    ),
    tag = "categories"
)]
pub async fn set_default_category(
    _session: AdminSession,
    pool: Extension<SqlitePool>,
    payload: Option<Json<DefaultCategoryRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation("Missing payload".to_string()));
    };

    let value = request
        .category_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    set_config(&pool, "default_category_id", &value).await?;

    Ok(Json(MessageResponse::new("Default category updated")))
}
