mod registry;

pub use registry::{ToolKind, ToolRegistry, TOOL_FAILURE_MESSAGE};
