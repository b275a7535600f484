use chrono::Duration;

use mnemo_core::{Conversation, LogEntry};

/// Group chronologically sorted entries into conversation sessions.
///
/// A new conversation starts when the gap to the previous entry is
/// strictly greater than `gap`; a gap exactly equal to the threshold
/// stays in the same conversation. The caller sorts across source files
/// beforehand. Short conversations are produced here too; exposure
/// filtering happens at formatting time.
pub fn segment(entries: Vec<LogEntry>, gap: Duration) -> Vec<Conversation> {
    let mut conversations = Vec::new();
    let mut current: Vec<LogEntry> = Vec::new();

    for entry in entries {
        if let Some(last) = current.last() {
            if entry.timestamp - last.timestamp > gap {
                conversations.push(Conversation {
                    entries: std::mem::take(&mut current),
                });
            }
        }
        current.push(entry);
    }

    if !current.is_empty() {
        conversations.push(Conversation { entries: current });
    }

    conversations
}
