use std::io::Write;

use anyhow::Result;
use chrono::Duration;
use tracing::{error, info, warn};

use mnemo_config::{AUGMENT_MEMORY_PROMPT, Config, load_prompts};
use mnemo_core::{AppError, LogEntry};
use mnemo_logs::{FormatOptions, LogParser, format_for_analysis, segment, truncate_chars};
use mnemo_memory::{
    AnalysisClient, ApiClient, MemoryStore, apply_amendments, extract_amendments,
    request_within_limit,
};

pub async fn handle_process(
    config: &Config,
    log_file: Option<String>,
    days: Option<u32>,
    dry_run: bool,
    yes: bool,
) -> Result<i32> {
    info!("starting memory processing");

    let prompts = load_prompts(&config.storage.prompts_file)?;
    let template = prompts
        .get(AUGMENT_MEMORY_PROMPT)
        .cloned()
        .ok_or_else(|| AppError::PromptNotFound(AUGMENT_MEMORY_PROMPT.to_string()))?;

    let client = ApiClient::new(&config.llm)?;
    info!("testing analysis endpoint connection");
    if !client.test_connection().await {
        error!("cannot reach analysis endpoint");
        eprintln!("Cannot reach the analysis endpoint; check [llm] configuration.");
        return Ok(1);
    }

    run_pipeline(&client, config, &template, log_file, days, dry_run, yes).await
}

async fn run_pipeline(
    client: &dyn AnalysisClient,
    config: &Config,
    template: &str,
    log_file: Option<String>,
    days: Option<u32>,
    dry_run: bool,
    yes: bool,
) -> Result<i32> {
    let store = MemoryStore::new(config.storage.memory_file.clone());
    let current_memory = store.load()?;

    let entries = collect_entries(config, log_file, days)?;
    if entries.is_empty() {
        warn!("no log entries found to process");
        println!("No log entries found to process.");
        return Ok(0);
    }
    info!(count = entries.len(), "collected log entries");

    let conversations = segment(
        entries,
        Duration::minutes(config.processing.session_gap_minutes),
    );
    let opts = FormatOptions {
        min_conversation_len: config.processing.min_conversation_len,
        max_chars: config.processing.max_log_chars,
        max_entry_chars: config.processing.max_entry_chars,
    };
    let mut formatted_logs = format_for_analysis(&conversations, &opts);

    if !request_within_limit(&formatted_logs, &current_memory, template) {
        warn!("request too large, halving formatted logs");
        formatted_logs = truncate_chars(&formatted_logs, config.processing.max_log_chars / 2);
    }

    let analysis = client
        .analyze(&formatted_logs, &current_memory, template)
        .await?;

    let amendments = extract_amendments(&analysis);
    if amendments.is_empty() {
        info!("no amendments proposed");
        println!("=== Analysis ===");
        println!("{analysis}");
        return Ok(0);
    }

    println!("=== Proposed Amendments ===");
    for (idx, amendment) in amendments.iter().enumerate() {
        println!();
        println!("Amendment {}:", idx + 1);
        println!("SEARCH: {}", preview(&amendment.search));
        println!("REPLACE: {}", preview(&amendment.replace));
    }
    println!();
    println!("=== Full Analysis ===");
    println!("{analysis}");

    if dry_run {
        info!("dry run, no changes applied");
        println!();
        println!("[dry-run] No changes were applied to the memory document.");
        return Ok(0);
    }

    if !yes {
        let prompt = format!(
            "\nApply {} amendment(s) to memory? [y/N] ",
            amendments.len()
        );
        if !confirm(&prompt)? {
            info!("user declined memory update");
            return Ok(0);
        }
    }

    let report = apply_amendments(&store, &amendments)?;
    println!();
    if report.success() {
        let stats = store.stats()?;
        println!(
            "Applied {}/{} amendment(s) to {}",
            report.applied,
            report.total,
            store.memory_path().display()
        );
        println!("Memory document now {} characters.", stats.character_count);
        Ok(0)
    } else {
        println!("No amendments could be applied.");
        Ok(1)
    }
}

fn collect_entries(
    config: &Config,
    log_file: Option<String>,
    days: Option<u32>,
) -> Result<Vec<LogEntry>> {
    let parser = LogParser::new();
    match log_file {
        Some(name) => {
            info!(file = %name, "processing specific log file");
            parser.parse_file(&config.storage.logs_dir.join(name))
        }
        None => {
            let days = days.unwrap_or(config.processing.log_days);
            info!(days, "processing recent logs");
            parser.recent_entries(&config.storage.logs_dir, days)
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > 100 {
        format!("{}...", truncate_chars(text, 100))
    } else {
        text.to_string()
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mnemo_memory::NoopClient;
    use std::io::Write as _;

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.storage.memory_file = dir.join("memory.txt");
        config.storage.logs_dir = dir.join("logs");
        config.storage.prompts_file = dir.join("prompts.toml");
        config
    }

    fn write_log(dir: &std::path::Path, name: &str, body: &str) {
        std::fs::create_dir_all(dir).unwrap();
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        write!(file, "{body}").unwrap();
    }

    struct FixedResponseClient {
        response: String,
    }

    #[async_trait]
    impl AnalysisClient for FixedResponseClient {
        async fn analyze(&self, _logs: &str, _memory: &str, _template: &str) -> Result<String> {
            Ok(self.response.clone())
        }

        async fn test_connection(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_pipeline_no_entries_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let code = run_pipeline(&NoopClient, &config, "template", None, None, false, true)
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert!(!config.storage.memory_file.exists());
    }

    #[tokio::test]
    async fn test_pipeline_no_amendments_leaves_document_alone() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_log(
            &config.storage.logs_dir,
            "chat.log",
            "[2024-03-14 09:00:00] USER: a\n\
             [2024-03-14 09:01:00] ASSISTANT: b\n\
             [2024-03-14 09:02:00] USER: c\n",
        );

        let code = run_pipeline(
            &NoopClient,
            &config,
            "template",
            Some("chat.log".to_string()),
            None,
            false,
            true,
        )
        .await
        .unwrap();
        assert_eq!(code, 0);
        assert!(!config.storage.memory_file.exists());
    }

    #[tokio::test]
    async fn test_pipeline_applies_amendments_from_response() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_log(
            &config.storage.logs_dir,
            "chat.log",
            "[2024-03-14 09:00:00] USER: I love hiking\n\
             [2024-03-14 09:01:00] ASSISTANT: Noted\n\
             [2024-03-14 09:02:00] USER: Every weekend\n",
        );

        let client = FixedResponseClient {
            response: "\
<<<<<<< SEARCH
INTERESTS:
- [To be determined from conversations]
=======
INTERESTS:
- Hiking
>>>>>>> REPLACE"
                .to_string(),
        };

        let code = run_pipeline(
            &client,
            &config,
            "template",
            Some("chat.log".to_string()),
            None,
            false,
            true,
        )
        .await
        .unwrap();
        assert_eq!(code, 0);

        let saved = std::fs::read_to_string(&config.storage.memory_file).unwrap();
        assert!(saved.contains("- Hiking"));
    }

    #[tokio::test]
    async fn test_pipeline_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_log(
            &config.storage.logs_dir,
            "chat.log",
            "[2024-03-14 09:00:00] USER: a\n\
             [2024-03-14 09:01:00] ASSISTANT: b\n\
             [2024-03-14 09:02:00] USER: c\n",
        );

        let client = FixedResponseClient {
            response: "\
<<<<<<< SEARCH
INTERESTS:
=======
HOBBIES:
>>>>>>> REPLACE"
                .to_string(),
        };

        let code = run_pipeline(
            &client,
            &config,
            "template",
            Some("chat.log".to_string()),
            None,
            true,
            true,
        )
        .await
        .unwrap();
        assert_eq!(code, 0);
        assert!(!config.storage.memory_file.exists());
    }

    #[tokio::test]
    async fn test_pipeline_unmatched_amendments_report_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_log(
            &config.storage.logs_dir,
            "chat.log",
            "[2024-03-14 09:00:00] USER: a\n\
             [2024-03-14 09:01:00] ASSISTANT: b\n\
             [2024-03-14 09:02:00] USER: c\n",
        );

        let client = FixedResponseClient {
            response: "\
<<<<<<< SEARCH
text that exists nowhere in the template
=======
irrelevant
>>>>>>> REPLACE"
                .to_string(),
        };

        let code = run_pipeline(
            &client,
            &config,
            "template",
            Some("chat.log".to_string()),
            None,
            false,
            true,
        )
        .await
        .unwrap();
        assert_eq!(code, 1);
        assert!(!config.storage.memory_file.exists());
    }

    #[test]
    fn test_preview_caps_at_100_chars() {
        let short = "short text";
        assert_eq!(preview(short), short);

        let long = "z".repeat(150);
        let previewed = preview(&long);
        assert_eq!(previewed.chars().count(), 103);
        assert!(previewed.ends_with("..."));
    }
}
