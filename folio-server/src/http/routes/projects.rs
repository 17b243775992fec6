//! Project endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewProject, ProjectDetail, ProjectRepo, ProjectUpdate};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentAdmin, ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{nullable, RequiredText, TechnologyIds};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub technology_ids: TechnologyIds,
}

impl CreateProjectRequest {
    fn validate(self) -> Result<NewProject, ApiError> {
        Ok(NewProject {
            title: RequiredText::new("title", self.title.as_deref())?,
            description: RequiredText::new("description", self.description.as_deref())?,
            image_url: RequiredText::new("imageUrl", self.image_url.as_deref())?,
            demo_url: RequiredText::new("demoUrl", self.demo_url.as_deref())?,
            category_id: self.category_id.and_then(category_ref),
            technology_ids: self.technology_ids,
        })
    }
}

/// The admin form sends `0` for "no category"
fn category_ref(id: i32) -> Option<i32> {
    (id != 0).then_some(id)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category_id: Option<Option<i32>>,
    pub technology_ids: Option<TechnologyIds>,
}

impl UpdateProjectRequest {
    fn validate(self) -> Result<ProjectUpdate, ApiError> {
        Ok(ProjectUpdate {
            title: RequiredText::optional("title", self.title.as_deref())?,
            description: RequiredText::optional("description", self.description.as_deref())?,
            image_url: RequiredText::optional("imageUrl", self.image_url.as_deref())?,
            demo_url: RequiredText::optional("demoUrl", self.demo_url.as_deref())?,
            category_id: self.category_id.map(|id| id.and_then(category_ref)),
            technology_ids: self.technology_ids,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/projects
async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectDetail>>, ApiError> {
    Ok(Json(ProjectRepo::new(&state.pool).list().await?))
}

/// POST /api/projects
async fn create_project(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectDetail>), ApiError> {
    let input = req.validate()?;
    let project = ProjectRepo::new(&state.pool).create(input).await?;

    tracing::info!(
        admin = %admin.username,
        id = project.project.id,
        order = project.project.order,
        "project created"
    );
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects/{id}
async fn get_project(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<ProjectDetail>, ApiError> {
    Ok(Json(ProjectRepo::new(&state.pool).get(id).await?))
}

/// PATCH /api/projects/{id}
async fn update_project(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<UpdateProjectRequest>,
) -> Result<Json<ProjectDetail>, ApiError> {
    let update = req.validate()?;
    let project = ProjectRepo::new(&state.pool).update(id, update).await?;

    tracing::info!(admin = %admin.username, id, "project updated");
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
async fn delete_project(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = ProjectRepo::new(&state.pool).delete(id).await?;
    tracing::info!(admin = %admin.username, id, deleted, "project delete");

    Ok(Json(DeleteResponse { success: true }))
}

/// Project routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).patch(update_project).delete(delete_project),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;

    fn create_body(json: &str) -> CreateProjectRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn create_requires_image_url() {
        let req = create_body(
            r#"{"title":"Shop","description":"A store","demoUrl":"https://shop.example"}"#,
        );
        let err = req.validate().unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::Required { field: "imageUrl" })
        ));
    }

    #[test]
    fn create_normalizes_technology_ids() {
        let req = create_body(
            r#"{"title":"Shop","description":"A store","imageUrl":"/uploads/1.png",
                "demoUrl":"https://shop.example","categoryId":2,"technologyIds":[3,1,3]}"#,
        );
        let input = req.validate().unwrap();
        assert_eq!(input.technology_ids.as_slice(), &[1, 3]);
        assert_eq!(input.category_id, Some(2));
    }

    #[test]
    fn create_rejects_non_positive_technology_ids() {
        let parsed = serde_json::from_str::<CreateProjectRequest>(
            r#"{"title":"t","description":"d","imageUrl":"i","demoUrl":"u","technologyIds":[0]}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn update_distinguishes_null_category() {
        let clear: UpdateProjectRequest = serde_json::from_str(r#"{"categoryId":null}"#).unwrap();
        assert_eq!(clear.validate().unwrap().category_id, Some(None));

        let keep: UpdateProjectRequest = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        let update = keep.validate().unwrap();
        assert_eq!(update.category_id, None);
        assert_eq!(update.title.unwrap().as_str(), "New");
        assert!(update.technology_ids.is_none());
    }

    #[test]
    fn zero_category_means_uncategorized() {
        let req = create_body(
            r#"{"title":"Shop","description":"A store","imageUrl":"/uploads/1.png",
                "demoUrl":"https://shop.example","categoryId":0}"#,
        );
        assert_eq!(req.validate().unwrap().category_id, None);

        let clear: UpdateProjectRequest = serde_json::from_str(r#"{"categoryId":0}"#).unwrap();
        assert_eq!(clear.validate().unwrap().category_id, Some(None));

        let set: UpdateProjectRequest = serde_json::from_str(r#"{"categoryId":4}"#).unwrap();
        assert_eq!(set.validate().unwrap().category_id, Some(Some(4)));
    }

    #[test]
    fn update_rejects_blank_present_fields() {
        let req: UpdateProjectRequest = serde_json::from_str(r#"{"title":"  "}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
