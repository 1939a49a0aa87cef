use super::GithubClient;
use crate::error::Result;
use crate::models::Credential;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Trade an OAuth authorization code for an access token.
///
/// `Ok(None)` means GitHub answered but issued no token (bad or expired
/// code); `Err` means GitHub could not be reached or the app is not
/// configured.
pub async fn exchange_code(client: &GithubClient, code: &str) -> Result<Option<Credential>> {
    let (client_id, client_secret) = client.oauth_app()?;
    let url = format!("{}/login/oauth/access_token", client.oauth_base());

    let response = client
        .http()
        .post(&url)
        .header(ACCEPT, "application/json")
        .json(&json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "code": code,
        }))
        .send()
        .await?;

    let status = response.status();
    let body: AccessTokenResponse = response.json().await?;

    match body.access_token.filter(|t| !t.is_empty()) {
        Some(token) => {
            debug!("OAuth code exchanged for access token");
            Ok(Some(Credential::new(token)))
        }
        None => {
            warn!(
                status = status.as_u16(),
                error = body.error.as_deref().unwrap_or("none"),
                "GitHub issued no access token"
            );
            Ok(None)
        }
    }
}
