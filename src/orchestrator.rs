use crate::api::{GenerateRequest, ModelBackend};
use crate::config::OrchestratorSettings;
use crate::error::{ReadmeError, Result};
use crate::github::RepoSource;
use crate::models::{Conversation, Credential, RepoRef, ToolCallRequest, ToolCallResult, Turn};
use crate::prompt::{initial_request, SYSTEM_INSTRUCTION};
use crate::tools::ToolRegistry;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info};

pub const DEFAULT_MAX_ROUND_TRIPS: usize = 8;
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OrchestratorContext {
    pub model: Arc<dyn ModelBackend>,
    pub tools: ToolRegistry,
    pub max_round_trips: usize,
    pub run_timeout: Duration,
}

impl OrchestratorContext {
    pub fn new(model: Arc<dyn ModelBackend>, source: Arc<dyn RepoSource>) -> Self {
        Self {
            model,
            tools: ToolRegistry::new(source),
            max_round_trips: DEFAULT_MAX_ROUND_TRIPS,
            run_timeout: DEFAULT_RUN_TIMEOUT,
        }
    }

    pub fn with_settings(mut self, settings: &OrchestratorSettings) -> Self {
        self.max_round_trips = settings.max_round_trips;
        self.run_timeout = settings.run_timeout;
        self
    }
}

#[derive(Debug)]
pub struct GeneratedReadme {
    pub markdown: String,
    /// Number of model calls the run needed.
    pub round_trips: usize,
    pub history: Conversation,
}

enum RunState {
    AwaitingModel,
    DispatchingTools(Turn),
    Done(String),
    Failed(ReadmeError),
}

/// Drive one README conversation to completion.
///
/// The model is called with the full history until it answers with text
/// only. Every tool-call turn is recorded verbatim, followed by exactly one
/// tool-result turn holding one result per call in request order. The run
/// fails closed when the model call errors, the round-trip budget runs out or
/// `run_timeout` elapses.
pub async fn run(
    context: &OrchestratorContext,
    repo: &RepoRef,
    credential: Option<&Credential>,
) -> Result<GeneratedReadme> {
    match timeout(context.run_timeout, drive(context, repo, credential)).await {
        Ok(result) => result,
        Err(_) => {
            error!(repo = %repo, timeout = ?context.run_timeout, "README generation timed out");
            Err(ReadmeError::Timeout)
        }
    }
}

async fn drive(
    context: &OrchestratorContext,
    repo: &RepoRef,
    credential: Option<&Credential>,
) -> Result<GeneratedReadme> {
    let declarations = context.tools.declarations();
    let mut history = Conversation::new();
    history.push(Turn::user_text(initial_request(repo)));

    let mut round_trips = 0;
    let mut state = RunState::AwaitingModel;

    loop {
        state = match state {
            RunState::AwaitingModel => {
                if round_trips >= context.max_round_trips {
                    RunState::Failed(ReadmeError::ToolBudgetExceeded {
                        limit: context.max_round_trips,
                    })
                } else {
                    round_trips += 1;
                    debug!(
                        repo = %repo,
                        round_trip = round_trips,
                        turns = history.len(),
                        "requesting model turn"
                    );

                    let request = GenerateRequest {
                        system_instruction: SYSTEM_INSTRUCTION,
                        tools: &declarations,
                        history: history.turns(),
                    };

                    let outcome = context.model.generate(request).await;
                    match outcome {
                        Ok(turn) => classify(turn, &mut history),
                        Err(e) => RunState::Failed(e),
                    }
                }
            }
            RunState::DispatchingTools(_) if round_trips >= context.max_round_trips => {
                // No model call left to read the results.
                RunState::Failed(ReadmeError::ToolBudgetExceeded {
                    limit: context.max_round_trips,
                })
            }
            RunState::DispatchingTools(turn) => {
                let calls: Vec<ToolCallRequest> =
                    turn.tool_calls().into_iter().cloned().collect();
                let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
                info!(repo = %repo, tools = %names.join(", "), "model is requesting tools");

                history.push(turn);
                let results = dispatch_all(&context.tools, &calls, credential).await;
                history.push(Turn::tool_results(results));
                RunState::AwaitingModel
            }
            RunState::Done(markdown) => {
                info!(repo = %repo, round_trips, "README generated");
                return Ok(GeneratedReadme {
                    markdown,
                    round_trips,
                    history,
                });
            }
            RunState::Failed(e) => {
                error!(repo = %repo, round_trips, error = %e, "README generation failed");
                return Err(e);
            }
        };
    }
}

fn classify(turn: Turn, history: &mut Conversation) -> RunState {
    if turn.has_tool_calls() {
        return RunState::DispatchingTools(turn);
    }

    match turn.text().filter(|text| !text.trim().is_empty()) {
        Some(text) => {
            history.push(turn);
            RunState::Done(text)
        }
        None => RunState::Failed(ReadmeError::EmptyResponse),
    }
}

/// Calls run concurrently; results come back in request order.
async fn dispatch_all(
    tools: &ToolRegistry,
    calls: &[ToolCallRequest],
    credential: Option<&Credential>,
) -> Vec<ToolCallResult> {
    join_all(calls.iter().map(|call| tools.dispatch(call, credential))).await
}
