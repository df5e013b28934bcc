//! Error types for insight operations

use thiserror::Error;

/// Errors that can occur while aggregating analyses or writing collateral
#[derive(Error, Debug)]
pub enum InsightsError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Collateral generation exceeded the configured timeout
    #[error("Collateral generation timed out after {0}s")]
    Timeout(u64),

    /// The analysis has no marketing suggestion at that position
    #[error("No marketing suggestion at index {index} (analysis has {available})")]
    SuggestionNotFound {
        /// Requested 0-based index
        index: usize,
        /// Number of suggestions in the analysis
        available: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
