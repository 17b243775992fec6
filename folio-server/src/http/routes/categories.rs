//! Category endpoints
//!
//! Updates take the id in the body and deletes take it as `?id=`, matching
//! what the admin UI sends.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Category, CategoryRepo, CategoryUpdate, NewCategory};
use crate::http::error::ApiError;
use crate::http::extractors::{parse_id, CurrentAdmin, ValidJson};
use crate::http::server::AppState;
use crate::models::{RequiredText, Slug, ValidationError};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCategoryParams {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/categories
async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = CategoryRepo::new(&state.pool).list().await?;
    Ok(Json(categories))
}

/// POST /api/categories
async fn create_category(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let input = NewCategory {
        name: RequiredText::new("name", req.name.as_deref())?,
        slug: Slug::required(req.slug.as_deref())?,
        order: req.order.unwrap_or(0),
    };

    let category = CategoryRepo::new(&state.pool).create(input).await?;
    tracing::info!(admin = %admin.username, id = category.id, slug = %category.slug, "category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories
async fn update_category(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let id = req
        .id
        .filter(|id| *id > 0)
        .ok_or(ValidationError::Required { field: "id" })?;
    let input = CategoryUpdate {
        name: RequiredText::new("name", req.name.as_deref())?,
        slug: Slug::required(req.slug.as_deref())?,
        order: req.order,
    };

    let category = CategoryRepo::new(&state.pool).update(id, input).await?;
    tracing::info!(admin = %admin.username, id, "category updated");

    Ok(Json(category))
}

/// DELETE /api/categories?id=N
///
/// Succeeds whether or not the row existed.
async fn delete_category(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeleteCategoryParams>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let raw = params
        .id
        .ok_or(ValidationError::Required { field: "id" })?;
    let id = parse_id(&raw)?;

    let deleted = CategoryRepo::new(&state.pool).delete(id).await?;
    tracing::info!(admin = %admin.username, id, deleted, "category delete");

    Ok(Json(DeleteResponse { success: true }))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/categories",
        get(list_categories)
            .post(create_category)
            .put(update_category)
            .delete(delete_category),
    )
}
