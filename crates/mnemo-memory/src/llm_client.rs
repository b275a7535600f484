use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use mnemo_config::LlmConfig;
use mnemo_core::AppError;

/// Rough approximation for English text.
const CHARS_PER_TOKEN: usize = 4;

/// Input ceiling, leaving headroom for response tokens.
const MAX_INPUT_TOKENS: usize = 190_000;

/// Placeholder substituted with the formatted logs.
pub const LOGS_PLACEHOLDER: &str = "{{LOGS}}";
/// Placeholder substituted with the current document.
pub const MEMORY_PLACEHOLDER: &str = "{{MEMORY}}";

/// The opaque analysis call: formatted logs, current document, and a
/// prompt template in; raw response text out.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, logs: &str, memory: &str, template: &str) -> Result<String>;

    /// Cheap liveness probe against the endpoint.
    async fn test_connection(&self) -> bool;
}

/// Substitute both placeholders into the template.
pub fn render_prompt(template: &str, logs: &str, memory: &str) -> String {
    template
        .replace(LOGS_PLACEHOLDER, logs)
        .replace(MEMORY_PLACEHOLDER, memory)
}

pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Whether the combined request fits the endpoint's context window.
pub fn request_within_limit(logs: &str, memory: &str, template: &str) -> bool {
    let estimated = estimate_tokens(logs) + estimate_tokens(memory) + estimate_tokens(template);
    if estimated > MAX_INPUT_TOKENS {
        warn!(estimated, "request size exceeds recommended input limit");
        return false;
    }
    debug!(estimated, "request size within limit");
    true
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or(AppError::MissingApiKey)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client: reqwest::Client::new(),
        })
    }

    async fn run_chat_completion(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": prompt}
                ],
                "max_tokens": max_tokens,
                "temperature": self.temperature
            }))
            .send()
            .await
            .map_err(|err| AppError::AnalysisFailed(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::AnalysisFailed(format!("unreadable body: {err}")))?;

        if !status.is_success() {
            return Err(AppError::AnalysisFailed(format!("status {status}: {body}")).into());
        }

        parse_completion_content(&body)
    }
}

#[async_trait]
impl AnalysisClient for ApiClient {
    async fn analyze(&self, logs: &str, memory: &str, template: &str) -> Result<String> {
        let prompt = render_prompt(template, logs, memory);
        info!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "sending analysis request"
        );

        let response = self.run_chat_completion(&prompt, self.max_tokens).await?;
        debug!(
            response_chars = response.chars().count(),
            "received analysis response"
        );
        Ok(response)
    }

    async fn test_connection(&self) -> bool {
        match self.run_chat_completion("Hello", 10).await {
            Ok(_) => {
                info!("analysis endpoint connection test successful");
                true
            }
            Err(err) => {
                error!(error = %err, "analysis endpoint connection test failed");
                false
            }
        }
    }
}

/// Client that proposes nothing; used by tests and offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClient;

#[async_trait]
impl AnalysisClient for NoopClient {
    async fn analyze(&self, _logs: &str, _memory: &str, _template: &str) -> Result<String> {
        Ok(String::new())
    }

    async fn test_connection(&self) -> bool {
        true
    }
}

fn parse_completion_content(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| AppError::AnalysisFailed(format!("malformed response JSON: {err}")))?;
    let content = value
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::AnalysisFailed("missing choices[0].message.content in response".to_string())
        })?;
    Ok(content)
}
