use super::auth::session_credential;
use super::{AppError, AppState};
use crate::error::ReadmeError;
use crate::github::{oauth, parse_repo_url};
use crate::orchestrator;
use crate::prompt;
use crate::session::{create_session_id, session_cookie_header, sign_session_id};
use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

// ── Health ──

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

// ── POST /generate-readme ──

#[derive(Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    readme: String,
}

pub async fn generate_readme(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, AppError> {
    let url = body
        .url
        .ok_or(ReadmeError::MalformedUrl)
        .map_err(AppError::from_url_error)?;
    let repo = parse_repo_url(&url).map_err(AppError::from_url_error)?;

    let credential = session_credential(&state, &headers);
    if state.settings.require_login && credential.is_none() {
        return Err(AppError::LoginRequired);
    }

    info!(repo = %repo, authenticated = credential.is_some(), "README requested");
    let generated = orchestrator::run(&state.orchestrator, &repo, credential.as_ref())
        .await
        .map_err(AppError::Internal)?;

    if prompt::is_fetch_error(&generated.markdown) {
        warn!(repo = %repo, "model reported repository data as unavailable");
    } else {
        let missing = prompt::missing_sections(&generated.markdown);
        if !missing.is_empty() {
            warn!(repo = %repo, missing = %missing.join(", "), "README is missing sections");
        }
    }

    Ok(Json(GenerateResponse {
        readme: generated.markdown,
    }))
}

// ── POST /github-auth ──

#[derive(Deserialize)]
pub struct AuthBody {
    #[serde(default)]
    code: Option<String>,
}

pub async fn github_auth(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AuthBody>,
) -> Result<Response, AppError> {
    let code = body
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or(AppError::Auth(StatusCode::BAD_REQUEST, "GitHub code is missing."))?;

    let credential = match oauth::exchange_code(&state.github, &code).await {
        Ok(Some(credential)) => credential,
        Ok(None) => {
            return Err(AppError::Auth(
                StatusCode::BAD_REQUEST,
                "Invalid or expired code from GitHub.",
            ))
        }
        Err(e) => {
            warn!(error = %e, "error fetching access token");
            return Err(AppError::Auth(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server failed to contact GitHub.",
            ));
        }
    };

    let secret = state.settings.session_secret.as_deref().ok_or_else(|| {
        AppError::Internal(ReadmeError::ConfigError("session secret missing".to_string()))
    })?;

    let session_id = create_session_id();
    state.sessions.save_credential(&session_id, credential);
    let cookie = session_cookie_header(
        &sign_session_id(secret, &session_id),
        state.settings.session_ttl_minutes,
    );

    info!("GitHub login stored in new session");
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(serde_json::json!({ "message": "success" })),
    )
        .into_response())
}
