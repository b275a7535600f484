use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use glob::glob;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use mnemo_core::{LogEntry, Role};

/// Timestamp format inside the bracketed log header.
pub const LOG_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Entry header: `[YYYY-MM-DD HH:MM:SS] ROLE: ` anchored at line start.
/// Content runs from the end of one header to the start of the next.
const LOG_HEADER_PATTERN: &str =
    r"(?m)^\[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\] ((?i:USER|ASSISTANT)): ";

/// Parses raw transcript text into [`LogEntry`] records.
///
/// Parsing is a pure function of the input: re-parsing the same text
/// always yields the same sequence. A header whose timestamp does not
/// match the configured format is skipped, never fatal.
pub struct LogParser {
    header: Regex,
    date_format: String,
}

impl LogParser {
    pub fn new() -> Self {
        Self::with_date_format(LOG_DATE_FORMAT)
    }

    pub fn with_date_format(date_format: &str) -> Self {
        Self {
            header: Regex::new(LOG_HEADER_PATTERN).expect("log header pattern is valid"),
            date_format: date_format.to_string(),
        }
    }

    /// Parse all entries out of one blob of transcript text.
    ///
    /// Entry content may span multiple physical lines; it ends at the
    /// next bracketed-timestamp header or end of input, and is trimmed.
    pub fn parse(&self, text: &str) -> Vec<LogEntry> {
        let headers: Vec<_> = self
            .header
            .captures_iter(text)
            .map(|caps| {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                (
                    whole,
                    caps.get(1).map_or("", |m| m.as_str()).to_string(),
                    caps.get(2).map_or("", |m| m.as_str()).to_string(),
                )
            })
            .collect();

        let mut entries = Vec::with_capacity(headers.len());
        for (idx, (span, timestamp_str, role_str)) in headers.iter().enumerate() {
            let content_end = headers
                .get(idx + 1)
                .map_or(text.len(), |(next_span, _, _)| next_span.start);

            let timestamp = match NaiveDateTime::parse_from_str(timestamp_str, &self.date_format) {
                Ok(timestamp) => timestamp,
                Err(error) => {
                    warn!(timestamp = %timestamp_str, %error, "skipping entry with unparsable timestamp");
                    continue;
                }
            };
            let Ok(role) = role_str.parse::<Role>() else {
                warn!(role = %role_str, "skipping entry with unknown role");
                continue;
            };

            entries.push(LogEntry {
                timestamp,
                role,
                content: text[span.end..content_end].trim().to_string(),
            });
        }

        entries
    }

    /// Parse one transcript file. A missing file yields an empty vec.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<LogEntry>> {
        if !path.exists() {
            warn!(path = %path.display(), "log file not found");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read log file: {}", path.display()))?;
        let entries = self.parse(&content);
        info!(count = entries.len(), path = %path.display(), "parsed log file");
        Ok(entries)
    }

    /// Entries from all `*.log` files under `logs_dir` newer than `days`
    /// days, merged and sorted by timestamp.
    pub fn recent_entries(&self, logs_dir: &Path, days: u32) -> Result<Vec<LogEntry>> {
        self.recent_entries_at(logs_dir, days, Local::now().naive_local())
    }

    fn recent_entries_at(
        &self,
        logs_dir: &Path,
        days: u32,
        now: NaiveDateTime,
    ) -> Result<Vec<LogEntry>> {
        if !logs_dir.exists() {
            warn!(path = %logs_dir.display(), "logs directory not found");
            return Ok(Vec::new());
        }

        let cutoff = now - Duration::days(i64::from(days));
        let mut all_entries = Vec::new();

        for path in log_files(logs_dir)? {
            let entries = self.parse_file(&path)?;
            all_entries.extend(
                entries
                    .into_iter()
                    .filter(|entry| entry.timestamp >= cutoff),
            );
        }

        all_entries.sort_by_key(|entry| entry.timestamp);
        info!(
            count = all_entries.len(),
            days, "collected recent log entries"
        );
        Ok(all_entries)
    }

    /// Read-only reflection over the logs directory, for health reporting.
    pub fn log_stats(&self, logs_dir: &Path) -> Result<LogStats> {
        if !logs_dir.exists() {
            return Ok(LogStats {
                logs_dir_exists: false,
                ..LogStats::default()
            });
        }

        let mut stats = LogStats {
            logs_dir_exists: true,
            ..LogStats::default()
        };

        for path in log_files(logs_dir)? {
            stats.log_file_count += 1;
            for entry in self.parse_file(&path)? {
                stats.total_entries += 1;
                stats.earliest = Some(match stats.earliest {
                    Some(earliest) => earliest.min(entry.timestamp),
                    None => entry.timestamp,
                });
                stats.latest = Some(match stats.latest {
                    Some(latest) => latest.max(entry.timestamp),
                    None => entry.timestamp,
                });
            }
        }

        Ok(stats)
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics over the transcript directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogStats {
    pub logs_dir_exists: bool,
    pub log_file_count: usize,
    pub total_entries: usize,
    pub earliest: Option<NaiveDateTime>,
    pub latest: Option<NaiveDateTime>,
}

fn log_files(logs_dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let pattern = logs_dir.join("*.log");
    let pattern = pattern.to_string_lossy();
    let mut paths: Vec<_> = glob(&pattern)
        .with_context(|| format!("Invalid glob pattern: {pattern}"))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(error) => {
                warn!(%error, "skipping unreadable log path");
                None
            }
        })
        .collect();
    paths.sort();
    Ok(paths)
}
