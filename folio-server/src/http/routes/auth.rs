//! Login, logout and session probe
//!
//! The session token travels in the `admin_session` cookie. The cookie is
//! HttpOnly and SameSite=Lax, and carries `Secure` in production.

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::{AdminSession, SESSION_COOKIE, SESSION_MAX_AGE_SECS};
use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;
use crate::models::{RequiredText, ValidationError};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: AdminSession,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<AdminSession>,
}

/// `Set-Cookie` value carrying a freshly issued session token.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={SESSION_MAX_AGE_SECS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn removal_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let username = RequiredText::new("username", req.username.as_deref())?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or(ValidationError::Required { field: "password" })?;

    let Some(session) = state
        .auth
        .authenticate(&state.pool, username.as_str(), &password)
        .await?
    else {
        tracing::info!(username = username.as_str(), "failed admin login");
        return Err(ApiError::InvalidCredentials);
    };

    let token = state.auth.issue_token(&session)?;
    tracing::info!(username = %session.username, "admin logged in");

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, state.secure_cookies))],
        Json(LoginResponse {
            success: true,
            user: session,
        }),
    )
        .into_response())
}

/// POST /api/auth/logout
async fn logout(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::SET_COOKIE, removal_cookie(state.secure_cookies))],
        Json(LogoutResponse { success: true }),
    )
        .into_response()
}

/// GET /api/auth/session
async fn session(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<SessionResponse> {
    let user = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.auth.verify_token(cookie.value()).ok());

    Json(SessionResponse {
        authenticated: user.is_some(),
        user,
    })
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_flags() {
        let cookie = session_cookie("abc", false);
        assert!(cookie.starts_with("admin_session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn session_cookie_secure_in_production() {
        assert!(session_cookie("abc", true).ends_with("; Secure"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie(false);
        assert!(cookie.starts_with("admin_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
