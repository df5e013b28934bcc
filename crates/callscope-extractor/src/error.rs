//! Error types for transcript analysis

use thiserror::Error;

/// Number of raw response characters kept for diagnostics
pub const RAW_EXCERPT_CHARS: usize = 300;

/// A single chunk's model response could not be read as an analysis
///
/// Recovered locally: the pipeline logs it and drops the chunk.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to parse model response: {reason} (raw: {raw_excerpt:?})")]
pub struct ExtractionError {
    /// Leading characters of the raw response
    pub raw_excerpt: String,
    /// Why parsing failed
    pub reason: String,
}

impl ExtractionError {
    /// Build an error, keeping only the first [`RAW_EXCERPT_CHARS`] of `raw`
    pub fn new(raw: &str, reason: impl Into<String>) -> Self {
        Self {
            raw_excerpt: raw.chars().take(RAW_EXCERPT_CHARS).collect(),
            reason: reason.into(),
        }
    }
}

/// Errors that end an analysis run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Every chunk's response failed to parse
    #[error("All {chunks} chunk(s) failed to parse")]
    AllChunksFailed {
        /// Number of chunks attempted
        chunks: usize,
    },

    /// The model call itself failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// The model call exceeded the configured timeout
    #[error("LLM call timed out after {0}s")]
    Timeout(u64),

    /// Nothing to analyze
    #[error("Transcript is empty")]
    EmptyTranscript,

    /// Invalid analyzer configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// Whether resubmitting (possibly a shorter transcript) may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalysisError::AllChunksFailed { .. })
    }

    /// Message suitable for showing to the person who submitted the transcript
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::AllChunksFailed { .. } => {
                "All chunks failed to parse. Try again or submit a shorter transcript."
            }
            AnalysisError::EmptyTranscript => "Transcript is empty.",
            AnalysisError::Config(_) => "Analyzer is misconfigured.",
            AnalysisError::Llm(_) | AnalysisError::Timeout(_) => "Analysis failed.",
        }
    }
}
