//! About section endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::repos::{AboutContent, AboutRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentAdmin, ValidJson};
use crate::http::server::AppState;
use crate::models::{Paragraphs, RequiredText};

#[derive(Debug, Deserialize)]
pub struct UpdateAboutRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub paragraphs: Option<Vec<String>>,
}

/// GET /api/about
async fn get_about(State(state): State<Arc<AppState>>) -> Result<Json<AboutContent>, ApiError> {
    AboutRepo::new(&state.pool)
        .get()
        .await?
        .map(Json)
        .ok_or(ApiError::missing("about content"))
}

/// PATCH /api/about
async fn update_about(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<UpdateAboutRequest>,
) -> Result<Json<AboutContent>, ApiError> {
    let title = RequiredText::new("title", req.title.as_deref())?;
    let subtitle = RequiredText::new("subtitle", req.subtitle.as_deref())?;
    let paragraphs = Paragraphs::new(req.paragraphs)?;

    let about = AboutRepo::new(&state.pool)
        .upsert(&title, &subtitle, &paragraphs)
        .await?;

    tracing::info!(admin = %admin.username, "about content updated");
    Ok(Json(about))
}

/// About routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/about", get(get_about).patch(update_about))
}
