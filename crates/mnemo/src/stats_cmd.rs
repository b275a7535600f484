use anyhow::Result;
use serde_json::json;

use mnemo_config::Config;
use mnemo_core::OutputFormat;
use mnemo_logs::LogParser;
use mnemo_memory::MemoryStore;

/// Health reporting over the memory document and the transcript
/// directory. Read-only; `valid_format` is advisory.
pub fn handle_stats(config: &Config, format: OutputFormat) -> Result<()> {
    let store = MemoryStore::new(config.storage.memory_file.clone());
    let memory = store.stats()?;

    let parser = LogParser::new();
    let logs = parser.log_stats(&config.storage.logs_dir)?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "memory": memory,
                    "logs": logs,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("=== Memory Document ===");
            println!("Path: {}", store.memory_path().display());
            if memory.exists {
                println!("Size: {} bytes", memory.file_size);
                println!("Characters: {}", memory.character_count);
                println!("Lines: {}", memory.line_count);
                if let Some(modified) = memory.last_modified {
                    println!("Last modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
                }
                println!(
                    "Format: {}",
                    if memory.valid_format { "ok" } else { "invalid" }
                );
            } else {
                println!("Not yet created (run `mnemo init`)");
            }
            println!();

            println!("=== Chat Logs ===");
            println!("Path: {}", config.storage.logs_dir.display());
            if logs.logs_dir_exists {
                println!("Log files: {}", logs.log_file_count);
                println!("Entries: {}", logs.total_entries);
                if let (Some(earliest), Some(latest)) = (logs.earliest, logs.latest) {
                    println!(
                        "Date range: {} .. {}",
                        earliest.format("%Y-%m-%d %H:%M:%S"),
                        latest.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            } else {
                println!("Directory not found");
            }
        }
    }

    Ok(())
}
