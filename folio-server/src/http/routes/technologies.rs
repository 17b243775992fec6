//! Technology listing

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{Technology, TechnologyRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /api/technologies
async fn list_technologies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Technology>>, ApiError> {
    Ok(Json(TechnologyRepo::new(&state.pool).list().await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/technologies", get(list_technologies))
}
