use crate::models::{Conversation, Segment};
use crate::orchestrator::GeneratedReadme;
use colored::*;

/// One line per tool result in the conversation: `(tool name, failed)`.
pub fn tool_activity(history: &Conversation) -> Vec<(String, bool)> {
    history
        .turns()
        .iter()
        .flat_map(|turn| turn.segments.iter())
        .filter_map(|segment| match segment {
            Segment::ToolResult(result) => Some((result.name.clone(), result.is_error())),
            _ => None,
        })
        .collect()
}

/// Progress line on stderr so stdout stays clean markdown.
pub fn display_status(message: &str) {
    eprintln!("{}", format!("[readmegen] {}", message).dimmed());
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}

/// Print the generated README
pub fn display_readme(markdown: &str) {
    let sep = if markdown.ends_with('\n') { "" } else { "\n" };
    print!("{}{}", markdown, sep);
}

/// Round trips and tool calls of a finished run.
pub fn display_summary(generated: &GeneratedReadme) {
    let activity = tool_activity(&generated.history);
    eprintln!(
        "{}",
        format!(
            "[readmegen] Finished after {} model call(s), {} tool call(s)",
            generated.round_trips,
            activity.len()
        )
        .dimmed()
    );
    for (name, failed) in activity {
        if failed {
            eprintln!("  {} {}", "✗".red(), name);
        } else {
            eprintln!("  {} {}", "✓".green(), name);
        }
    }
}
