use super::models::{decode_model_content, Candidate, Content};
use crate::error::{ReadmeError, Result};
use crate::models::Turn;
use serde_json::Value;

fn first_content(response_json: &Value) -> Result<&Value> {
    if let Some(reason) = response_json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(ReadmeError::Other(format!("Prompt blocked: {}", reason)));
    }

    let candidates = response_json
        .get("candidates")
        .and_then(|c| c.as_array())
        .ok_or_else(|| ReadmeError::Other("No candidates in response".to_string()))?;

    let first_candidate = candidates
        .first()
        .ok_or_else(|| ReadmeError::Other("Empty candidates array".to_string()))?;

    first_candidate.get("content").ok_or_else(|| {
        let reason = first_candidate
            .get("finishReason")
            .and_then(|r| r.as_str())
            .unwrap_or("unknown");
        ReadmeError::Other(format!("No content in response (finish reason: {})", reason))
    })
}

/// Decode a `generateContent` response into the model's turn.
pub fn parse_model_turn(response_json: &Value) -> Result<Turn> {
    let mut raw = first_content(response_json)?.clone();
    let content: Content = serde_json::from_value(raw.clone())?;
    if let Value::Object(map) = &mut raw {
        map.entry("role")
            .or_insert_with(|| Value::String("model".to_string()));
    }
    Ok(decode_model_content(&content, raw))
}

/// Finish reason reported for the first candidate.
pub fn extract_finish_reason(response_json: &Value) -> Option<String> {
    let candidate: Candidate = response_json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| serde_json::from_value(c.clone()).ok())?;
    candidate.finish_reason
}
