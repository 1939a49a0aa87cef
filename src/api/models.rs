use crate::models::{Role, Segment, ToolCallRequest, ToolDeclaration, Turn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub contents: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSet>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSet {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl From<&ToolDeclaration> for FunctionDeclaration {
    fn from(declaration: &ToolDeclaration) -> Self {
        Self {
            name: declaration.name.clone(),
            description: declaration.description.clone(),
            parameters: declaration.input_schema(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

pub fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
        Role::ToolResult => "function",
    }
}

/// Wire form of one history turn. Turns that arrived from the model are
/// replayed exactly as received.
pub fn encode_turn(turn: &Turn) -> Value {
    if let Some(raw) = &turn.raw {
        return raw.clone();
    }

    let parts: Vec<Value> = turn
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => json!({ "text": text }),
            Segment::ToolCall(call) => json!({
                "functionCall": { "name": call.name, "args": Value::Object(call.args.clone()) }
            }),
            Segment::ToolResult(result) => json!({
                "functionResponse": { "name": result.name, "response": result.payload() }
            }),
        })
        .collect();

    json!({ "role": role_name(turn.role), "parts": parts })
}

/// Domain view of a model content block. Thought parts are dropped from the
/// segments but survive in `raw`.
pub fn decode_model_content(content: &Content, raw: Value) -> Turn {
    let segments = content
        .parts
        .iter()
        .filter(|part| part.thought != Some(true))
        .filter_map(|part| {
            if let Some(call) = &part.function_call {
                Some(Segment::ToolCall(ToolCallRequest::new(
                    call.name.clone(),
                    call.args.clone(),
                )))
            } else {
                part.text.clone().map(Segment::Text)
            }
        })
        .collect();

    Turn::model(segments).with_raw(raw)
}
