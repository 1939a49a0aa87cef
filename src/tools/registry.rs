use crate::error::{ReadmeError, Result};
use crate::github::RepoSource;
use crate::models::{
    Credential, ParameterSpec, RepoRef, ToolCallRequest, ToolCallResult, ToolDeclaration,
};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Payload error for a tool that failed while running.
pub const TOOL_FAILURE_MESSAGE: &str = "Failed to fetch repo or tree details.";

/// GitHub owner and repository names.
const NAME_PATTERN: &str = "^[A-Za-z0-9_.-]+$";
/// Git ref names as accepted by the tree endpoint.
const BRANCH_PATTERN: &str = "^[A-Za-z0-9_./-]+$";
const PATH_ARGUMENTS: [&str; 3] = ["owner", "repo", "branch"];

/// The closed set of tools the model may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    FetchMetadata,
    FetchTree,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::FetchMetadata, ToolKind::FetchTree];

    /// Name as declared to the model.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::FetchMetadata => "fetchRepo",
            ToolKind::FetchTree => "fetchTree",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn declaration(self) -> ToolDeclaration {
        match self {
            ToolKind::FetchMetadata => ToolDeclaration {
                name: self.name().to_string(),
                description: "Fetches metadata of a GitHub repository using the GitHub REST API."
                    .to_string(),
                parameters: vec![
                    ParameterSpec::string(
                        "owner",
                        "The username or organization name that owns the repository.",
                        true,
                    )
                    .with_pattern(NAME_PATTERN),
                    ParameterSpec::string("repo", "The name of the repository.", true)
                        .with_pattern(NAME_PATTERN),
                ],
            },
            ToolKind::FetchTree => ToolDeclaration {
                name: self.name().to_string(),
                description: "Fetches the complete file and folder tree of a GitHub repository."
                    .to_string(),
                parameters: vec![
                    ParameterSpec::string(
                        "owner",
                        "The username or organization that owns the repository.",
                        true,
                    )
                    .with_pattern(NAME_PATTERN),
                    ParameterSpec::string("repo", "The name of the repository.", true)
                        .with_pattern(NAME_PATTERN),
                    ParameterSpec::string(
                        "branch",
                        "Branch to list. Defaults to the repository's default branch.",
                        false,
                    )
                    .with_pattern(BRANCH_PATTERN),
                ],
            },
        }
    }
}

pub struct ToolRegistry {
    source: Arc<dyn RepoSource>,
}

impl ToolRegistry {
    pub fn new(source: Arc<dyn RepoSource>) -> Self {
        Self { source }
    }

    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        ToolKind::ALL.iter().map(|kind| kind.declaration()).collect()
    }

    pub fn resolve(&self, name: &str) -> Option<ToolKind> {
        ToolKind::from_name(name)
    }

    pub fn validate_arguments(
        &self,
        kind: ToolKind,
        arguments: &Value,
    ) -> std::result::Result<(), String> {
        let schema_value = kind.declaration().input_schema();

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_value)
            .map_err(|e| format!("Invalid tool schema: {}", e))?;

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(error_messages.join("; "));
        }

        // Values become URL path segments: no dot-only or empty components.
        for key in PATH_ARGUMENTS {
            if let Some(value) = arguments.get(key).and_then(Value::as_str) {
                let navigates = value
                    .split('/')
                    .any(|part| part.is_empty() || part == "." || part == "..");
                if navigates {
                    return Err(format!("/{}: \"{}\" is not a valid name", key, value));
                }
            }
        }

        Ok(())
    }

    /// Run one model-issued call. Always yields exactly one result.
    pub async fn dispatch(
        &self,
        call: &ToolCallRequest,
        credential: Option<&Credential>,
    ) -> ToolCallResult {
        let Some(kind) = self.resolve(&call.name) else {
            warn!(tool = %call.name, "model requested an undeclared tool");
            return ToolCallResult::error(&call.name, format!("Tool '{}' not found", call.name));
        };

        let arguments = Value::Object(call.args.clone());
        if let Err(e) = self.validate_arguments(kind, &arguments) {
            warn!(tool = %call.name, error = %e, "tool arguments rejected");
            return ToolCallResult::error(&call.name, format!("Invalid arguments: {}", e));
        }

        info!(tool = %call.name, args = %arguments, "calling tool");
        match self.invoke(kind, call, credential).await {
            Ok(payload) => ToolCallResult::response(&call.name, payload),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool invocation failed");
                ToolCallResult::error(&call.name, TOOL_FAILURE_MESSAGE)
            }
        }
    }

    async fn invoke(
        &self,
        kind: ToolKind,
        call: &ToolCallRequest,
        credential: Option<&Credential>,
    ) -> Result<Value> {
        let repo = repo_argument(call)?;

        match kind {
            ToolKind::FetchMetadata => {
                let fetched = self.source.fetch_metadata(&repo, credential).await?;
                Ok(fetched.to_payload())
            }
            ToolKind::FetchTree => {
                let tree = self
                    .source
                    .fetch_tree(&repo, call.str_arg("branch"), credential)
                    .await;
                Ok(tree.to_payload())
            }
        }
    }
}

fn repo_argument(call: &ToolCallRequest) -> Result<RepoRef> {
    let owner = call
        .str_arg("owner")
        .ok_or_else(|| ReadmeError::ToolError("Missing required argument: owner".to_string()))?;
    let repo = call
        .str_arg("repo")
        .ok_or_else(|| ReadmeError::ToolError("Missing required argument: repo".to_string()))?;
    Ok(RepoRef::new(owner, repo))
}
