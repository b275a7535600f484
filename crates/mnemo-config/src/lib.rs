mod config;
pub mod paths;
mod prompts;
mod template;

pub use config::{API_KEY_ENV, Config, LlmConfig, ProcessingConfig, StorageConfig};
pub use prompts::load_prompts;
pub use template::{
    AUGMENT_MEMORY_PROMPT, DEFAULT_MEMORY_TEMPLATE, REQUIRED_SECTIONS, STARTER_PROMPTS_TOML,
};
