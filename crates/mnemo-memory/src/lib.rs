mod applier;
mod extract;
mod llm_client;
mod store;

pub use applier::{ApplyReport, apply_amendments, apply_to_text};
pub use extract::extract_amendments;
pub use llm_client::{
    AnalysisClient, ApiClient, LOGS_PLACEHOLDER, MEMORY_PLACEHOLDER, NoopClient, estimate_tokens,
    render_prompt, request_within_limit,
};
pub use store::{MemoryStats, MemoryStore, validate_format};
