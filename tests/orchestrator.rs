use async_trait::async_trait;
use readmegen::api::{GenerateRequest, ModelBackend};
use readmegen::config::OrchestratorSettings;
use readmegen::error::{ReadmeError, Result};
use readmegen::github::RepoSource;
use readmegen::models::{
    Credential, MetadataFetch, RepoMetadata, RepoRef, RepoTree, Role, Segment, ToolCallRequest,
    ToolCallResult, Turn,
};
use readmegen::orchestrator::{run, OrchestratorContext};
use readmegen::prompt::SYSTEM_INSTRUCTION;
use readmegen::tools::TOOL_FAILURE_MESSAGE;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays canned turns and records how much history each call saw.
struct ScriptedModel {
    turns: Mutex<VecDeque<Result<Turn>>>,
    seen_history: Mutex<Vec<usize>>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    fn new(turns: Vec<Result<Turn>>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            seen_history: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    fn calls(&self) -> Vec<usize> {
        self.seen_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelBackend for ScriptedModel {
    async fn generate<'a>(&'a self, request: GenerateRequest<'a>) -> Result<Turn> {
        assert_eq!(request.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(request.tools.len(), 2);
        self.seen_history.lock().unwrap().push(request.history.len());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ReadmeError::Other("script exhausted".to_string())))
    }
}

/// Metadata is slow and tree is fast, so completion order differs from
/// request order.
#[derive(Default)]
struct SlowSource {
    fail_metadata: bool,
    credentials: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl RepoSource for SlowSource {
    async fn fetch_metadata(
        &self,
        repo: &RepoRef,
        credential: Option<&Credential>,
    ) -> Result<MetadataFetch> {
        self.credentials
            .lock()
            .unwrap()
            .push(credential.map(|c| c.token().to_string()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        if self.fail_metadata {
            return Err(ReadmeError::Other("boom".to_string()));
        }
        let metadata: RepoMetadata =
            serde_json::from_value(json!({ "name": repo.repo, "description": null })).unwrap();
        Ok(MetadataFetch::Found(metadata))
    }

    async fn fetch_tree(
        &self,
        _repo: &RepoRef,
        _branch: Option<&str>,
        _credential: Option<&Credential>,
    ) -> RepoTree {
        RepoTree::empty()
    }
}

fn repo() -> RepoRef {
    RepoRef::new("octocat", "Hello-World")
}

fn both_tools() -> Turn {
    let args = json!({ "owner": "octocat", "repo": "Hello-World" });
    Turn::model(vec![
        Segment::ToolCall(ToolCallRequest::new("fetchRepo", args.clone())),
        Segment::ToolCall(ToolCallRequest::new("fetchTree", args)),
    ])
}

fn text(markdown: &str) -> Turn {
    Turn::model(vec![Segment::Text(markdown.to_string())])
}

fn context(model: Arc<ScriptedModel>, source: Arc<SlowSource>) -> OrchestratorContext {
    OrchestratorContext::new(model, source)
}

#[tokio::test]
async fn test_text_only_answer_finishes_in_one_round_trip() {
    let model = Arc::new(ScriptedModel::new(vec![Ok(text("# Hello-World"))]));
    let ctx = context(model.clone(), Arc::new(SlowSource::default()));

    let generated = run(&ctx, &repo(), None).await.unwrap();

    assert_eq!(generated.markdown, "# Hello-World");
    assert_eq!(generated.round_trips, 1);
    assert_eq!(model.calls(), vec![1]);
    assert_eq!(generated.history.len(), 2);
}

#[tokio::test]
async fn test_tool_round_trip_history_shape() {
    let model = Arc::new(ScriptedModel::new(vec![
        Ok(both_tools()),
        Ok(text("# Hello-World\n\nDone.")),
    ]));
    let ctx = context(model.clone(), Arc::new(SlowSource::default()));

    let generated = run(&ctx, &repo(), None).await.unwrap();

    assert_eq!(generated.round_trips, 2);
    // user, model calls, tool results, final model text
    assert_eq!(model.calls(), vec![1, 3]);
    let turns = generated.history.turns();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0].role, Role::User);
    assert!(turns[0].text().unwrap().contains("octocat/Hello-World"));
    assert_eq!(turns[1], both_tools());
    assert_eq!(turns[2].role, Role::ToolResult);
    match &turns[2].segments[0] {
        Segment::ToolResult(result) => {
            let payload = result.payload();
            assert_eq!(payload["name"], "Hello-World");
            assert!(payload["description"].is_null());
        }
        other => panic!("expected tool result, got {:?}", other),
    }
    assert_eq!(turns[3].text().as_deref(), Some("# Hello-World\n\nDone."));
}

#[tokio::test]
async fn test_results_keep_request_order() {
    let model = Arc::new(ScriptedModel::new(vec![
        Ok(both_tools()),
        Ok(text("# Hello-World")),
    ]));
    let ctx = context(model, Arc::new(SlowSource::default()));

    let generated = run(&ctx, &repo(), None).await.unwrap();

    let names: Vec<&str> = generated.history.turns()[2]
        .segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::ToolResult(result) => Some(result.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["fetchRepo", "fetchTree"]);
}

#[tokio::test]
async fn test_failing_tool_still_answers_every_call() {
    let model = Arc::new(ScriptedModel::new(vec![
        Ok(both_tools()),
        Ok(text("Error: Could not fetch repository data.")),
    ]));
    let source = Arc::new(SlowSource {
        fail_metadata: true,
        ..Default::default()
    });
    let ctx = context(model, source);

    let generated = run(&ctx, &repo(), None).await.unwrap();

    let results: Vec<&ToolCallResult> = generated.history.turns()[2]
        .segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::ToolResult(result) => Some(result),
            _ => None,
        })
        .collect();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].name, "fetchRepo");
    assert!(results[0].is_error());
    assert_eq!(results[0].payload(), json!({ "error": TOOL_FAILURE_MESSAGE }));

    assert_eq!(results[1].name, "fetchTree");
    assert!(!results[1].is_error());
    assert_eq!(results[1].payload(), json!({ "tree": [], "truncated": false }));
}

#[tokio::test]
async fn test_credential_reaches_tools() {
    let model = Arc::new(ScriptedModel::new(vec![
        Ok(both_tools()),
        Ok(text("# Hello-World")),
    ]));
    let source = Arc::new(SlowSource::default());
    let ctx = context(model, source.clone());

    let credential = Credential::new("gho_user");
    run(&ctx, &repo(), Some(&credential)).await.unwrap();

    assert_eq!(
        source.credentials.lock().unwrap().as_slice(),
        &[Some("gho_user".to_string())]
    );
}

#[tokio::test]
async fn test_model_error_fails_the_run() {
    let model = Arc::new(ScriptedModel::new(vec![Err(ReadmeError::ApiError {
        status: 500,
        message: "internal".to_string(),
    })]));
    let ctx = context(model, Arc::new(SlowSource::default()));

    let err = run(&ctx, &repo(), None).await.unwrap_err();

    assert!(matches!(err, ReadmeError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn test_empty_answer_fails_the_run() {
    let model = Arc::new(ScriptedModel::new(vec![Ok(text("   \n"))]));
    let ctx = context(model, Arc::new(SlowSource::default()));

    let err = run(&ctx, &repo(), None).await.unwrap_err();

    assert!(matches!(err, ReadmeError::EmptyResponse));
}

#[tokio::test]
async fn test_round_trip_budget_is_enforced() {
    let model = Arc::new(ScriptedModel::new(vec![
        Ok(both_tools()),
        Ok(both_tools()),
        Ok(both_tools()),
    ]));
    let ctx = context(model.clone(), Arc::new(SlowSource::default())).with_settings(
        &OrchestratorSettings {
            max_round_trips: 2,
            run_timeout: Duration::from_secs(30),
        },
    );

    let err = run(&ctx, &repo(), None).await.unwrap_err();

    assert!(matches!(err, ReadmeError::ToolBudgetExceeded { limit: 2 }));
    assert_eq!(model.calls().len(), 2);
}

#[tokio::test]
async fn test_last_budgeted_tool_calls_are_not_dispatched() {
    let model = Arc::new(ScriptedModel::new(vec![Ok(both_tools())]));
    let source = Arc::new(SlowSource::default());
    let ctx = context(model.clone(), source.clone()).with_settings(&OrchestratorSettings {
        max_round_trips: 1,
        run_timeout: Duration::from_secs(30),
    });

    let err = run(&ctx, &repo(), None).await.unwrap_err();

    assert!(matches!(err, ReadmeError::ToolBudgetExceeded { limit: 1 }));
    assert_eq!(model.calls().len(), 1);
    assert!(source.credentials.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_run_timeout() {
    let mut scripted = ScriptedModel::new(vec![Ok(text("# late"))]);
    scripted.delay = Some(Duration::from_millis(500));
    let ctx = context(Arc::new(scripted), Arc::new(SlowSource::default())).with_settings(
        &OrchestratorSettings {
            max_round_trips: 8,
            run_timeout: Duration::from_millis(50),
        },
    );

    let err = run(&ctx, &repo(), None).await.unwrap_err();

    assert!(matches!(err, ReadmeError::Timeout));
}
