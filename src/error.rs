use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadmeError {
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid URL")]
    MalformedUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Tool-call budget exceeded after {limit} model round trips")]
    ToolBudgetExceeded { limit: usize },

    #[error("Model returned neither text nor tool calls")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

impl ReadmeError {
    /// Errors that come from talking to an external service rather than from
    /// the request itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, ReadmeError::NetworkError(_) | ReadmeError::Timeout)
    }
}

impl From<anyhow::Error> for ReadmeError {
    fn from(err: anyhow::Error) -> Self {
        ReadmeError::Other(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, ReadmeError>;
