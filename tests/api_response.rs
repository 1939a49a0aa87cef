use readmegen::api::response::{extract_finish_reason, parse_model_turn};
use readmegen::error::ReadmeError;
use readmegen::models::{Role, Segment};
use serde_json::json;

#[test]
fn test_model_text_is_concatenated() {
    let response = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": "# Hello" }, { "text": ", world!" }]
            },
            "finishReason": "STOP"
        }]
    });

    let turn = parse_model_turn(&response).unwrap();
    assert_eq!(turn.text(), Some("# Hello, world!".to_string()));
    assert!(!turn.has_tool_calls());
}

#[test]
fn test_call_only_turn_has_no_text() {
    let response = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "functionCall": { "name": "fetchRepo", "args": {} } }]
            }
        }]
    });

    let turn = parse_model_turn(&response).unwrap();
    assert_eq!(turn.text(), None);
    assert!(turn.has_tool_calls());
}

#[test]
fn test_empty_candidates_is_an_error() {
    let response = json!({ "candidates": [] });

    let result = parse_model_turn(&response);
    assert!(result.is_err());
}

#[test]
fn test_blocked_prompt_is_an_error() {
    let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });

    let err = parse_model_turn(&response).unwrap_err();
    assert!(matches!(err, ReadmeError::Other(ref m) if m.contains("SAFETY")));
}

#[test]
fn test_missing_content_reports_finish_reason() {
    let response = json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] });

    let err = parse_model_turn(&response).unwrap_err();
    assert!(err.to_string().contains("MAX_TOKENS"));
    assert_eq!(
        extract_finish_reason(&response),
        Some("MAX_TOKENS".to_string())
    );
}

#[test]
fn test_function_calls_keep_order_and_args() {
    let response = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {
                        "functionCall": {
                            "name": "fetchRepo",
                            "args": { "owner": "octocat", "repo": "Hello-World" }
                        }
                    },
                    {
                        "functionCall": {
                            "name": "fetchTree",
                            "args": { "owner": "octocat", "repo": "Hello-World" }
                        }
                    }
                ]
            }
        }]
    });

    let turn = parse_model_turn(&response).unwrap();
    let calls = turn.tool_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].name, "fetchRepo");
    assert_eq!(calls[0].str_arg("owner"), Some("octocat"));
    assert_eq!(calls[1].name, "fetchTree");
}

#[test]
fn test_text_turn_has_no_calls() {
    let response = json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": "done" }] }
        }]
    });

    let turn = parse_model_turn(&response).unwrap();
    assert!(turn.tool_calls().is_empty());
    assert_eq!(turn.text().as_deref(), Some("done"));
}

#[test]
fn test_thought_parts_are_skipped_but_kept_raw() {
    let response = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "thinking about it", "thought": true },
                    { "text": "# Readme" }
                ]
            }
        }]
    });

    let turn = parse_model_turn(&response).unwrap();
    assert_eq!(turn.role, Role::Model);
    assert_eq!(turn.segments, vec![Segment::Text("# Readme".to_string())]);
    let raw = turn.raw.unwrap();
    assert_eq!(raw["parts"].as_array().unwrap().len(), 2);
}

#[test]
fn test_raw_turn_gets_model_role_when_missing() {
    let response = json!({
        "candidates": [{
            "content": {
                "parts": [{
                    "functionCall": { "name": "fetchRepo", "args": {} },
                    "thoughtSignature": "abc"
                }]
            }
        }]
    });

    let turn = parse_model_turn(&response).unwrap();
    let raw = turn.raw.unwrap();
    assert_eq!(raw["role"], "model");
    assert_eq!(raw["parts"][0]["thoughtSignature"], "abc");
}
