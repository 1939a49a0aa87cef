use super::tool::{ToolCallRequest, ToolCallResult};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
    ToolResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    ToolCall(ToolCallRequest),
    ToolResult(ToolCallResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub segments: Vec<Segment>,
    /// Provider-native encoding of the turn as it was received, replayed
    /// verbatim so nothing the model committed to is lost.
    pub raw: Option<Value>,
}

impl Turn {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            segments: vec![Segment::Text(text.into())],
            raw: None,
        }
    }

    pub fn model(segments: Vec<Segment>) -> Self {
        Self {
            role: Role::Model,
            segments,
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Batch every result of one dispatch step into a single turn.
    pub fn tool_results(results: Vec<ToolCallResult>) -> Self {
        Self {
            role: Role::ToolResult,
            segments: results.into_iter().map(Segment::ToolResult).collect(),
            raw: None,
        }
    }

    pub fn tool_calls(&self) -> Vec<&ToolCallRequest> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::ToolCall(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::ToolCall(_)))
    }

    /// Concatenated text segments, or `None` when the turn carries no text.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Append-only turn history. The model's context is exactly the replay of
/// these turns, so nothing is ever edited or removed once pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
