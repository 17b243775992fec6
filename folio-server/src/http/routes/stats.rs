//! Site statistics endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use crate::db::repos::{SiteStats, StatsRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentAdmin, ValidJson};
use crate::http::server::AppState;
use crate::models::RequiredText;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatsRequest {
    pub years_experience: Option<String>,
    pub projects_completed: Option<String>,
}

/// GET /api/stats
async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<SiteStats>, ApiError> {
    StatsRepo::new(&state.pool)
        .get()
        .await?
        .map(Json)
        .ok_or(ApiError::missing("site stats"))
}

/// PATCH /api/stats
async fn update_stats(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<UpdateStatsRequest>,
) -> Result<Json<SiteStats>, ApiError> {
    let years = RequiredText::new("yearsExperience", req.years_experience.as_deref())?;
    let projects = RequiredText::new("projectsCompleted", req.projects_completed.as_deref())?;

    let stats = StatsRepo::new(&state.pool).upsert(&years, &projects).await?;

    tracing::info!(admin = %admin.username, "site stats updated");
    Ok(Json(stats))
}

/// Stats routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats).patch(update_stats))
}
