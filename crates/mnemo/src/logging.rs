//! Per-run file logging for `mnemo process`.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;

/// Create a run-specific log writer under `{state_dir}/run-logs/`.
///
/// Returns a non-blocking writer and a worker guard that must be kept
/// alive for the duration of logging.
pub fn create_run_log_writer(
    state_dir: &Path,
) -> Result<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    let log_dir = state_dir.join("run-logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_name = format!("process-{}.log", Utc::now().format("%Y%m%d-%H%M%S"));
    let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    Ok((non_blocking, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_log_file_in_run_logs_dir() {
        let tmp = tempfile::tempdir().expect("Failed to create tempdir");

        let (_writer, _guard) =
            create_run_log_writer(tmp.path()).expect("Should create log writer");

        let log_dir = tmp.path().join("run-logs");
        assert!(log_dir.is_dir());

        let entries: Vec<_> = std::fs::read_dir(&log_dir)
            .expect("Should read log dir")
            .collect();
        assert_eq!(entries.len(), 1);

        let name = entries[0]
            .as_ref()
            .expect("Should read entry")
            .file_name()
            .to_string_lossy()
            .to_string();
        assert!(name.starts_with("process-"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_creates_nested_state_dir() {
        let tmp = tempfile::tempdir().expect("Failed to create tempdir");
        let state_dir = tmp.path().join("deep").join("state");

        let result = create_run_log_writer(&state_dir);
        assert!(result.is_ok());
        assert!(state_dir.join("run-logs").exists());
    }
}
