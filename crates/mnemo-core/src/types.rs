use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Speaker of a log entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Returns the uppercase wire name for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Assistant => "ASSISTANT",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ASSISTANT" => Ok(Self::Assistant),
            other => Err(format!(
                "Invalid role '{other}'. Valid values: USER, ASSISTANT"
            )),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parsed transcript record. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log timestamps carry no zone, so they stay naive.
    pub timestamp: NaiveDateTime,
    pub role: Role,
    pub content: String,
}

/// A maximal run of entries with no inter-entry gap above the session
/// threshold. Derived on each run, never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversation {
    pub entries: Vec<LogEntry>,
}

impl Conversation {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Date of the first entry, if any.
    pub fn started_on(&self) -> Option<NaiveDate> {
        self.entries.first().map(|entry| entry.timestamp.date())
    }
}

/// One literal search/replace edit proposed by the analysis response.
///
/// Order is significant: amendments apply sequentially against the
/// evolving document, first occurrence only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amendment {
    pub search: String,
    pub replace: String,
}

/// Output format for CLI responses
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
