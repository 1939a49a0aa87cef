use super::models::{encode_turn, Content, FunctionDeclaration, RequestBody, ToolSet};
use super::response::{extract_finish_reason, parse_model_turn};
use super::{GenerateRequest, ModelBackend};
use crate::config::ModelSettings;
use crate::error::{ReadmeError, Result};
use crate::models::Turn;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(settings: &ModelSettings, timeout: Duration) -> Result<Self> {
        let api_key = settings.api_key.as_deref().ok_or_else(|| {
            ReadmeError::ConfigError("GEMINI_API_KEY environment variable not set".to_string())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| ReadmeError::ConfigError(format!("Invalid API key header: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/models/{}:generateContent",
                settings.endpoint.trim_end_matches('/'),
                settings.model
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub fn build_request_body(request: &GenerateRequest<'_>) -> RequestBody {
    let function_declarations: Vec<FunctionDeclaration> =
        request.tools.iter().map(FunctionDeclaration::from).collect();

    RequestBody {
        contents: request.history.iter().map(encode_turn).collect(),
        system_instruction: Some(Content::system(request.system_instruction)),
        tools: if function_declarations.is_empty() {
            Vec::new()
        } else {
            vec![ToolSet {
                function_declarations,
            }]
        },
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn generate<'a>(&'a self, request: GenerateRequest<'a>) -> Result<Turn> {
        let body = build_request_body(&request);
        debug!(turns = body.contents.len(), "[AI] Making API request");

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "[AI] Response status");

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReadmeError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let response_json: Value = response.json().await?;
        if let Some(reason) = extract_finish_reason(&response_json) {
            debug!(finish_reason = %reason, "[AI] Candidate finished");
        }

        parse_model_turn(&response_json)
    }
}
