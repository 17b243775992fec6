//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::server::AppState;
use crate::auth::{AdminSession, SESSION_COOKIE};
use crate::models::ValidationError;

/// The admin behind a valid `admin_session` cookie.
///
/// Handlers that mutate data take this as their first argument so the
/// request is rejected with 401 before the body is read.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub AdminSession);

impl FromRequestParts<Arc<AppState>> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .ok_or(ApiError::Unauthorized)?;

        let session = state.auth.verify_token(&token).map_err(|e| {
            tracing::debug!(error = %e, "rejected session cookie");
            ApiError::Unauthorized
        })?;

        Ok(Self(session))
    }
}

/// JSON body whose rejections render as validation errors
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::InvalidBody(rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}

/// Extract a positive integer id from path
pub struct ValidId(pub i32);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Required { field: "id" }))?;

        parse_id(&id).map(Self)
    }
}

/// Parse a positive row id.
pub(crate) fn parse_id(raw: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::Validation(ValidationError::InvalidFormat {
            field: "id",
            reason: "must be a positive integer",
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_positive_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        for raw in ["", "0", "-3", "abc", "1.5", "99999999999"] {
            assert!(parse_id(raw).is_err(), "accepted {raw:?}");
        }
    }
}
