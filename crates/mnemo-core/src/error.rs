#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("No API key configured: set MNEMO_API_KEY or [llm].api_key")]
    MissingApiKey,

    #[error("Analysis request failed: {0}")]
    AnalysisFailed(String),

    #[error("Memory document is not writable at '{path}': {message}")]
    DocumentUnwritable { path: String, message: String },

    #[error("Prompt '{0}' not found in prompts file")]
    PromptNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_missing_api_key() {
        let err = AppError::MissingApiKey;
        assert_eq!(
            err.to_string(),
            "No API key configured: set MNEMO_API_KEY or [llm].api_key"
        );
    }

    #[test]
    fn test_display_analysis_failed() {
        let err = AppError::AnalysisFailed("status 500".into());
        assert_eq!(err.to_string(), "Analysis request failed: status 500");
    }

    #[test]
    fn test_display_document_unwritable() {
        let err = AppError::DocumentUnwritable {
            path: "/tmp/memory.txt".into(),
            message: "permission denied".into(),
        };
        assert_eq!(
            err.to_string(),
            "Memory document is not writable at '/tmp/memory.txt': permission denied"
        );
    }

    #[test]
    fn test_display_prompt_not_found() {
        let err = AppError::PromptNotFound("augment-memory".into());
        assert_eq!(
            err.to_string(),
            "Prompt 'augment-memory' not found in prompts file"
        );
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppError>();
    }
}
