use tracing::{info, warn};

use mnemo_core::Conversation;

/// Returned when no conversation qualifies for analysis. Callers submit
/// it as-is; it is valid analyzable input, not an error.
pub const NO_LOGS_PLACEHOLDER: &str = "No conversation logs provided.";

const TRUNCATION_MARKER: &str = "\n\n[Logs truncated due to length]";
const ENTRY_TRUNCATION_MARKER: &str = "... [truncated]";

/// Thresholds for rendering conversations into one analysis block.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Conversations shorter than this are excluded.
    pub min_conversation_len: usize,
    /// Character budget for the whole block, truncation marker included.
    pub max_chars: usize,
    /// Per-entry content cap in characters.
    pub max_entry_chars: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            min_conversation_len: 3,
            max_chars: 50_000,
            max_entry_chars: 1_000,
        }
    }
}

/// Render conversations into one text block bounded by `opts.max_chars`
/// characters. Conversation numbering counts excluded conversations too,
/// so indexes stay stable across threshold changes.
pub fn format_for_analysis(conversations: &[Conversation], opts: &FormatOptions) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut rendered = 0usize;

    for (idx, conversation) in conversations.iter().enumerate() {
        if conversation.len() < opts.min_conversation_len {
            continue;
        }
        rendered += 1;

        lines.push(format!("=== Conversation {} ===", idx + 1));
        if let Some(date) = conversation.started_on() {
            lines.push(format!("Date: {}", date.format("%Y-%m-%d")));
        }
        lines.push(format!("Duration: {} exchanges", conversation.len()));
        lines.push(String::new());

        for entry in &conversation.entries {
            let content = cap_entry_content(&entry.content, opts.max_entry_chars);
            lines.push(format!(
                "[{}] {}: {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.role,
                content
            ));
        }
        lines.push(String::new());
    }

    if lines.is_empty() {
        return NO_LOGS_PLACEHOLDER.to_string();
    }

    let mut result = lines.join("\n");
    let total_chars = result.chars().count();
    if total_chars > opts.max_chars {
        warn!(
            chars = total_chars,
            budget = opts.max_chars,
            "formatted logs exceed budget, truncating"
        );
        let marker_chars = TRUNCATION_MARKER.chars().count();
        if opts.max_chars > marker_chars {
            result = truncate_chars(&result, opts.max_chars - marker_chars);
            result.push_str(TRUNCATION_MARKER);
        } else {
            result = truncate_chars(&result, opts.max_chars);
        }
    }

    info!(conversations = rendered, "formatted conversations for analysis");
    result
}

/// Cut `text` to at most `max_chars` characters, at a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let end = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(idx, _)| idx);
    text[..end].to_string()
}

fn cap_entry_content(content: &str, max_entry_chars: usize) -> String {
    if content.chars().count() > max_entry_chars {
        let mut capped = truncate_chars(content, max_entry_chars);
        capped.push_str(ENTRY_TRUNCATION_MARKER);
        capped
    } else {
        content.to_string()
    }
}
