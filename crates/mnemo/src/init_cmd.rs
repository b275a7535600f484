use anyhow::{Context, Result};
use tracing::info;

use mnemo_config::{Config, DEFAULT_MEMORY_TEMPLATE, STARTER_PROMPTS_TOML};
use mnemo_memory::MemoryStore;

/// Set up directories, the initial memory document, and a starter
/// prompts file. Everything here is idempotent; nothing is overwritten.
pub fn handle_init(config: &Config) -> Result<()> {
    println!("=== mnemo initialization ===");

    std::fs::create_dir_all(&config.storage.logs_dir).with_context(|| {
        format!(
            "Failed to create logs dir: {}",
            config.storage.logs_dir.display()
        )
    })?;
    println!("Logs directory: {}", config.storage.logs_dir.display());

    let store = MemoryStore::new(config.storage.memory_file.clone());
    if store.create_initial(DEFAULT_MEMORY_TEMPLATE)? {
        println!("Created memory document: {}", store.memory_path().display());
    } else {
        println!(
            "Memory document already exists: {}",
            store.memory_path().display()
        );
    }

    let prompts_file = &config.storage.prompts_file;
    if prompts_file.exists() {
        println!("Prompts file already exists: {}", prompts_file.display());
    } else {
        if let Some(parent) = prompts_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        std::fs::write(prompts_file, STARTER_PROMPTS_TOML)
            .with_context(|| format!("Failed to write prompts file: {}", prompts_file.display()))?;
        info!(path = %prompts_file.display(), "wrote starter prompts file");
        println!("Created prompts file: {}", prompts_file.display());
    }

    let stats = store.stats()?;
    println!(
        "Document: {} characters, {} lines, format {}",
        stats.character_count,
        stats.line_count,
        if stats.valid_format { "ok" } else { "invalid" }
    );

    Ok(())
}
