use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Load prompt templates from a TOML file (`name -> template`).
///
/// A missing file is a valid state and yields an empty map; a file that
/// exists but cannot be read or parsed is an error.
pub fn load_prompts(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        warn!(path = %path.display(), "prompts file not found, continuing with no prompts");
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompts file: {}", path.display()))?;
    let prompts: HashMap<String, String> = toml::from_str(&content)
        .with_context(|| format!("Failed to parse prompts file: {}", path.display()))?;

    info!(count = prompts.len(), path = %path.display(), "loaded prompts");
    Ok(prompts)
}
