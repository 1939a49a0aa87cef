use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub param_type: String,
    pub description: String,
    pub required: bool,
    /// Regex every value must match.
    pub pattern: Option<String>,
}

impl ParameterSpec {
    pub fn string(name: &str, description: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            param_type: "string".to_string(),
            description: description.to_string(),
            required,
            pattern: None,
        }
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl ToolDeclaration {
    /// JSON schema of the parameters, as handed to the model and used for
    /// argument validation.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            let mut property = json!({
                "type": param.param_type,
                "description": param.description,
            });
            if let Some(pattern) = &param.pattern {
                property["pattern"] = Value::String(pattern.clone());
            }
            properties.insert(param.name.clone(), property);
        }

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    pub name: String,
    pub args: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Response(Value),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub name: String,
    pub outcome: ToolOutcome,
}

impl ToolCallResult {
    pub fn response(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            outcome: ToolOutcome::Response(payload),
        }
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: ToolOutcome::Error(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Error(_))
    }

    /// The object the model sees as the function response.
    pub fn payload(&self) -> Value {
        match &self.outcome {
            ToolOutcome::Response(value) => value.clone(),
            ToolOutcome::Error(message) => json!({ "error": message }),
        }
    }
}
