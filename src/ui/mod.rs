mod output;

pub use output::{display_error, display_readme, display_status, display_summary, tool_activity};
