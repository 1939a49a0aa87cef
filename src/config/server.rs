use serde::{Deserialize, Serialize};

use crate::error::{ReadmeError, Result};

/// `server:` section of the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub bind: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub require_login: Option<bool>,
    #[serde(default)]
    pub session_ttl_minutes: Option<i64>,
}

/// Resolved HTTP layer settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
    pub password: Option<String>,
    pub session_secret: Option<String>,
    pub require_login: bool,
    pub session_ttl_minutes: i64,
}

impl ServerSettings {
    /// The gate and the cookie signer both need their secrets before the
    /// server may start.
    pub fn validate(&self) -> Result<()> {
        if self.password.as_deref().map_or(true, str::is_empty) {
            return Err(ReadmeError::ConfigError(
                "README_PASSWORD (or PASSWORD) environment variable not set".to_string(),
            ));
        }
        if self.session_secret.as_deref().map_or(true, str::is_empty) {
            return Err(ReadmeError::ConfigError(
                "SESSION_SECRET environment variable not set".to_string(),
            ));
        }
        if self.session_ttl_minutes <= 0 {
            return Err(ReadmeError::ConfigError(
                "session_ttl_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
