//! Session gatekeeper for the admin UI
//!
//! Unauthenticated visits to the dashboard go to the login page, and an
//! admin who is already logged in skips the login page.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use super::server::AppState;
use crate::auth::SESSION_COOKIE;

pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// What to do with a request under `/admin`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Pass,
    RedirectTo(&'static str),
}

/// Decide how to route `path` given whether the caller holds a valid session.
///
/// `path` is the raw request path; it is decoded and normalized the same way
/// the file service resolves it before any rule applies.
pub fn gate(path: &str, authenticated: bool) -> Decision {
    let Some(path) = normalize(path) else {
        // Undecodable or escaping paths never reach the dashboard anonymously
        return if authenticated {
            Decision::Pass
        } else {
            Decision::RedirectTo(LOGIN_PATH)
        };
    };

    if !authenticated && path.starts_with(DASHBOARD_PATH) {
        return Decision::RedirectTo(LOGIN_PATH);
    }
    if authenticated && path == LOGIN_PATH {
        return Decision::RedirectTo(DASHBOARD_PATH);
    }
    Decision::Pass
}

/// Percent-decode `raw`, drop empty and `.` segments, reject `..`.
fn normalize(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            other => segments.push(other),
        }
    }
    Some(format!("/{}", segments.join("/")))
}

/// Middleware applying [`gate`] with the request's session cookie.
///
/// Nested routers see a stripped path, so the original URI is used when
/// present.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request
        .extensions()
        .get::<axum::extract::OriginalUri>()
        .map(|uri| uri.path().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let authenticated = CookieJar::from_headers(request.headers())
        .get(SESSION_COOKIE)
        .is_some_and(|cookie| state.auth.is_valid(cookie.value()));

    match gate(&path, authenticated) {
        Decision::Pass => next.run(request).await,
        Decision::RedirectTo(target) => {
            tracing::debug!(%path, target, "gatekeeper redirect");
            Redirect::temporary(target).into_response()
        }
    }
}
