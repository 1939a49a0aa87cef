mod auth;
mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::api::GeminiClient;
use crate::config::{Config, ServerSettings};
use crate::error::{ReadmeError, Result};
use crate::github::GithubClient;
use crate::orchestrator::OrchestratorContext;
use crate::session::{CredentialStore, InMemoryCredentialStore};

pub use auth::PASSWORD_HEADER;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

// ── App State ──

pub struct AppState {
    pub orchestrator: OrchestratorContext,
    pub github: Arc<GithubClient>,
    pub sessions: Arc<dyn CredentialStore>,
    pub settings: ServerSettings,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let model = Arc::new(GeminiClient::new(&config.model, config.request_timeout)?);
        let github = Arc::new(GithubClient::new(&config.github, config.request_timeout)?);
        let orchestrator = OrchestratorContext::new(model, github.clone())
            .with_settings(&config.orchestrator);

        Ok(Self {
            orchestrator,
            github,
            sessions: Arc::new(InMemoryCredentialStore::new(
                config.server.session_ttl_minutes,
            )),
            settings: config.server.clone(),
        })
    }
}

// ── Error Handling ──

pub enum AppError {
    InvalidUrl(String),
    LoginRequired,
    Auth(StatusCode, &'static str),
    Internal(ReadmeError),
}

impl AppError {
    fn from_url_error(err: ReadmeError) -> Self {
        match err {
            ReadmeError::InvalidUrl(_) | ReadmeError::MalformedUrl => {
                AppError::InvalidUrl(err.to_string())
            }
            other => AppError::Internal(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidUrl(message) => (StatusCode::NOT_FOUND, message).into_response(),
            AppError::LoginRequired => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Unauthorized: Login first" })),
            )
                .into_response(),
            AppError::Auth(status, message) => {
                (status, Json(serde_json::json!({ "error": message }))).into_response()
            }
            AppError::Internal(err) => {
                if err.is_transport() {
                    warn!(error = %err, "upstream service unreachable");
                } else {
                    error!(error = %err, "error in README generation");
                }
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

// ── Entrypoint ──

pub async fn serve(config: Config) -> Result<()> {
    config.server.validate()?;
    let state = Arc::new(AppState::from_config(&config)?);

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = sessions.purge_expired();
            if removed > 0 {
                info!(removed, "purged expired sessions");
            }
        }
    });

    let app = router(state);
    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("readmegen HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

/// Build the router (for testing without binding to a port).
pub fn router(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/generate-readme", post(handlers::generate_readme))
        .route("/github-auth", post(handlers::github_auth))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_password,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(gated)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Tests ──
