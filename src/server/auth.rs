use super::AppState;
use crate::models::Credential;
use crate::session::{constant_time_eq, find_cookie, verify_session_cookie, SESSION_COOKIE};
use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::debug;

pub const PASSWORD_HEADER: &str = "password";

/// Shared-secret gate in front of every API route.
pub async fn require_password(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok());

    let authorized = match (provided, state.settings.password.as_deref()) {
        (Some(provided), Some(expected)) => {
            constant_time_eq(provided.as_bytes(), expected.as_bytes())
        }
        _ => false,
    };

    if authorized {
        return next.run(request).await;
    }

    debug!(path = %request.uri().path(), "rejected request without valid password");
    (StatusCode::UNAUTHORIZED, "Unauthorized: Wrong password").into_response()
}

/// Credential attached to the caller's signed session cookie, if any.
pub fn session_credential(state: &AppState, headers: &HeaderMap) -> Option<Credential> {
    let secret = state.settings.session_secret.as_deref()?;
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    let signed = find_cookie(cookies, SESSION_COOKIE)?;
    let session_id = verify_session_cookie(secret, signed)?;
    state.sessions.find_credential(&session_id)
}
