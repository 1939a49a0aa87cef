pub mod client;
pub mod models;
pub mod response;

use crate::error::Result;
use crate::models::{ToolDeclaration, Turn};
use async_trait::async_trait;

pub use client::{build_request_body, GeminiClient};
pub use models::RequestBody;

/// Everything one model call sees: the fixed instruction, the declared tools
/// and the full history so far.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub system_instruction: &'a str,
    pub tools: &'a [ToolDeclaration],
    pub history: &'a [Turn],
}

/// A generative model that answers with text and/or tool-call requests.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate<'a>(&'a self, request: GenerateRequest<'a>) -> Result<Turn>;
}
