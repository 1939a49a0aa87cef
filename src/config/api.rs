use serde::{Deserialize, Serialize};

/// `api:` section of the config file (generative model endpoint).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub request_timeout: Option<u64>,
}

/// `github:` section of the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GithubConfig {
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub oauth_base: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// `orchestrator:` section of the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub max_round_trips: Option<usize>,
    #[serde(default)]
    pub run_timeout: Option<u64>,
}
