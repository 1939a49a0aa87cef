mod api;
mod defaults;
mod server;
mod validation;

use crate::cli::{Args, Command};
use crate::error::{ReadmeError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub use api::{ApiConfig, GithubConfig, OrchestratorConfig};
pub use defaults::{
    DEFAULT_API_ENDPOINT, DEFAULT_GITHUB_API_BASE, DEFAULT_GITHUB_OAUTH_BASE, DEFAULT_MODEL,
};
pub use server::{ServerConfig, ServerSettings};
pub use validation::{
    env_first, env_parse, expand_env_var_in_string, expand_optional, parse_flag,
};

/// Generative model connection settings.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
}

/// GitHub REST and OAuth settings.
#[derive(Debug, Clone)]
pub struct GithubSettings {
    pub api_base: String,
    pub oauth_base: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Server-wide token used when a request carries no credential of its own.
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub max_round_trips: usize,
    pub run_timeout: Duration,
}

pub struct Config {
    pub model: ModelSettings,
    pub github: GithubSettings,
    pub server: ServerSettings,
    pub orchestrator: OrchestratorSettings,
    pub request_timeout: Duration,
    pub verbose: bool,
}

/// On-disk configuration. Secrets are never read from here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub verbose: Option<bool>,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::from_sources(args, &file_config)
    }

    /// Precedence for every setting: CLI args > env var > config file > default.
    pub fn from_sources(args: &Args, file: &FileConfig) -> Result<Self> {
        let endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_first(&["README_API_ENDPOINT"]))
            .or_else(|| expand_optional(file.api.endpoint.as_ref()))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let model_name = args
            .model
            .clone()
            .or_else(|| env_first(&["README_MODEL"]))
            .or_else(|| expand_optional(file.api.model.as_ref()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let model = ModelSettings {
            api_key: env_first(&["GEMINI_API_KEY", "API_KEY"]),
            endpoint,
            model: model_name,
        };

        let github = GithubSettings {
            api_base: env_first(&["GITHUB_API_BASE"])
                .or_else(|| expand_optional(file.github.api_base.as_ref()))
                .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            oauth_base: expand_optional(file.github.oauth_base.as_ref())
                .unwrap_or_else(|| DEFAULT_GITHUB_OAUTH_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            client_id: env_first(&["GITHUB_CLIENT_ID", "CLIENT_ID"])
                .or_else(|| expand_optional(file.github.client_id.as_ref())),
            client_secret: env_first(&["GITHUB_CLIENT_SECRET", "CLIENT_SECRET"]),
            token: env_first(&["GITHUB_ACCESS_TOKEN"]),
        };

        let (arg_bind, arg_port) = match &args.command {
            Command::Serve { bind, port } => (bind.clone(), *port),
            Command::Generate { .. } => (None, None),
        };

        let port = match arg_port {
            Some(port) => port,
            None => match env_parse::<u16>("PORT")? {
                Some(port) => port,
                None => file.server.port.unwrap_or_else(defaults::default_port),
            },
        };

        let server = ServerSettings {
            bind: arg_bind
                .or_else(|| env_first(&["README_BIND"]))
                .or_else(|| expand_optional(file.server.bind.as_ref()))
                .unwrap_or_else(defaults::default_bind),
            port,
            password: env_first(&["README_PASSWORD", "PASSWORD"]),
            session_secret: env_first(&["SESSION_SECRET"]),
            require_login: env_first(&["README_REQUIRE_LOGIN"])
                .map(|v| parse_flag(&v))
                .or(file.server.require_login)
                .unwrap_or_else(defaults::default_require_login),
            session_ttl_minutes: file
                .server
                .session_ttl_minutes
                .unwrap_or_else(defaults::default_session_ttl_minutes),
        };

        let max_round_trips = match args.max_round_trips {
            Some(limit) => limit,
            None => env_parse::<usize>("README_MAX_ROUND_TRIPS")?
                .or(file.orchestrator.max_round_trips)
                .unwrap_or_else(defaults::default_max_round_trips),
        };
        if max_round_trips == 0 {
            return Err(ReadmeError::ConfigError(
                "max_round_trips must be at least 1".to_string(),
            ));
        }

        let run_timeout = env_parse::<u64>("README_RUN_TIMEOUT")?
            .or(file.orchestrator.run_timeout)
            .unwrap_or_else(defaults::default_run_timeout);
        if run_timeout == 0 {
            return Err(ReadmeError::ConfigError(
                "run_timeout must be at least 1 second".to_string(),
            ));
        }

        let request_timeout = env_parse::<u64>("README_REQUEST_TIMEOUT")?
            .or(file.api.request_timeout)
            .unwrap_or_else(defaults::default_request_timeout);
        if request_timeout == 0 {
            return Err(ReadmeError::ConfigError(
                "request_timeout must be at least 1 second".to_string(),
            ));
        }

        let verbose = args.verbose
            || env_first(&["README_VERBOSE"])
                .map(|v| parse_flag(&v))
                .or(file.verbose)
                .unwrap_or(false);

        Ok(Config {
            model,
            github,
            server,
            orchestrator: OrchestratorSettings {
                max_round_trips,
                run_timeout: Duration::from_secs(run_timeout),
            },
            request_timeout: Duration::from_secs(request_timeout),
            verbose,
        })
    }
}

impl FileConfig {
    pub fn load() -> anyhow::Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".readmegen.yaml"),
            PathBuf::from(".readmegen.yml"),
            PathBuf::from(".readmegen.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("readmegen");
            paths.push(config_dir.join("readmegen.yaml"));
            paths.push(config_dir.join("readmegen.yml"));
            paths.push(config_dir.join("readmegen.json"));
        }

        paths
    }
}
