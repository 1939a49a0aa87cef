use crate::config::GithubSettings;
use crate::error::{ReadmeError, Result};
use crate::models::Credential;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use std::time::Duration;
use url::Url;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

pub struct GithubClient {
    http: reqwest::Client,
    api_base: Url,
    oauth_base: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    fallback_token: Option<Credential>,
}

impl GithubClient {
    pub fn new(settings: &GithubSettings, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("readmegen/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_base: Url::parse(&settings.api_base).map_err(|e| {
                ReadmeError::ConfigError(format!("Invalid GitHub API base URL: {}", e))
            })?,
            oauth_base: settings.oauth_base.trim_end_matches('/').to_string(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            fallback_token: settings.token.clone().map(Credential::new),
        })
    }

    /// REST URL under the API base. Each segment is percent-encoded on its
    /// own, so `/` inside a name never adds a path level.
    pub fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ReadmeError::ConfigError("GitHub API base cannot hold a path".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn oauth_base(&self) -> &str {
        &self.oauth_base
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// OAuth app id/secret, or a config error when the exchange is unusable.
    pub fn oauth_app(&self) -> Result<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(ReadmeError::ConfigError(
                "GitHub OAuth client id/secret not configured".to_string(),
            )),
        }
    }

    /// GET against the REST API. The request credential wins over the
    /// server-wide token.
    pub fn get(&self, url: Url, credential: Option<&Credential>) -> reqwest::RequestBuilder {
        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(credential) = credential.or(self.fallback_token.as_ref()) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", credential.token()));
        }

        request
    }
}
