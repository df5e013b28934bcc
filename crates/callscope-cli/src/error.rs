//! Error types for the CLI application.

use callscope_extractor::AnalysisError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model provider error
    #[error("LLM error: {0}")]
    Llm(#[from] callscope_llm::LlmError),

    /// Analysis pipeline error
    #[error("{}", .0.user_message())]
    Analysis(#[source] AnalysisError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] callscope_store::StoreError),

    /// Insights error
    #[error("{0}")]
    Insights(#[from] callscope_insights::InsightsError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No analysis with that id
    #[error("Analysis not found: {0}")]
    NotFound(String),
}

impl From<AnalysisError> for CliError {
    fn from(err: AnalysisError) -> Self {
        CliError::Analysis(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_shows_user_message() {
        let err: CliError = AnalysisError::AllChunksFailed { chunks: 3 }.into();
        assert_eq!(
            err.to_string(),
            "All chunks failed to parse. Try again or submit a shorter transcript."
        );
    }
}
