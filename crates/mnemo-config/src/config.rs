use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paths;

/// Environment variable consulted before `[llm].api_key`.
pub const API_KEY_ENV: &str = "MNEMO_API_KEY";

/// Top-level configuration, loaded from `config.toml`.
///
/// Constructed once and passed into components; there is no ambient
/// global state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub processing: ProcessingConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Load config from an explicit path, or from the default location.
    ///
    /// A missing file at the default location yields `Default`; an
    /// explicitly named file must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (paths::default_config_file(), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }
}

/// File locations for persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Memory document path. Backup lives at the fixed sibling
    /// `<file>.backup`.
    pub memory_file: PathBuf,
    /// Directory scanned for `*.log` chat transcripts.
    pub logs_dir: PathBuf,
    /// TOML prompt templates (`name -> template`).
    pub prompts_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            memory_file: paths::default_memory_file(),
            logs_dir: paths::default_logs_dir(),
            prompts_file: paths::default_prompts_file(),
        }
    }
}

/// Thresholds for log segmentation and formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Look-back window when no specific log file is named.
    pub log_days: u32,
    /// Inter-entry gap (minutes) above which a new conversation starts.
    pub session_gap_minutes: i64,
    /// Conversations shorter than this are excluded from formatting.
    pub min_conversation_len: usize,
    /// Character budget for the formatted analysis block.
    pub max_log_chars: usize,
    /// Per-entry content cap within the formatted block.
    pub max_entry_chars: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            log_days: 7,
            session_gap_minutes: 60,
            min_conversation_len: 3,
            max_log_chars: 50_000,
            max_entry_chars: 1_000,
        }
    }
}

/// Analysis endpoint configuration (OpenAI-compatible chat completions).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, e.g. "https://api.openai.com/v1" or a local proxy.
    pub base_url: String,
    /// API key; the MNEMO_API_KEY environment variable takes precedence.
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            model: "claude-3-5-haiku-20241022".to_string(),
            max_tokens: 4000,
            temperature: 0.1,
        }
    }
}

impl LlmConfig {
    /// Env var first, config second; None when neither is set.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Some(key);
            }
        }
        if self.api_key.trim().is_empty() {
            None
        } else {
            Some(self.api_key.clone())
        }
    }

    pub fn redacted_api_key(&self) -> String {
        mask_api_key(&self.api_key)
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.redacted_api_key())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn mask_api_key(api_key: &str) -> String {
    if api_key.is_empty() {
        return String::new();
    }

    let char_count = api_key.chars().count();
    let prefix: String = api_key.chars().take(3).collect();
    let suffix: String = api_key.chars().skip(char_count.saturating_sub(4)).collect();

    if char_count <= 4 {
        format!("***{suffix}")
    } else {
        format!("{prefix}...{suffix}")
    }
}
