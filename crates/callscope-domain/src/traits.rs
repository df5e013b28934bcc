//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the analysis core and
//! infrastructure. Implementations live in other crates.

use crate::record::{AnalysisId, StoredAnalysis, TranscriptRecord, TranscriptStatus};
use std::future::Future;

/// Text-generation capability the analysis pipeline calls
///
/// Implemented by the infrastructure layer (callscope-llm). A call may take
/// seconds and may fail; the caller decides what a failure means.
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a free-text completion
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Generate a completion constrained to a JSON object
    ///
    /// Providers without a JSON response mode fall back to [`generate`] and
    /// rely on the prompt alone.
    ///
    /// [`generate`]: LlmProvider::generate
    fn generate_json(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        self.generate(prompt)
    }

    /// Whether [`generate_json`](LlmProvider::generate_json) enforces JSON output
    fn supports_json_mode(&self) -> bool {
        false
    }

    /// Model identifier, for logs and metadata
    fn model_name(&self) -> &str;
}

/// Trait for persisting transcripts and their analyses
///
/// Implemented by the infrastructure layer (callscope-store)
pub trait AnalysisStore {
    /// Error type for store operations
    type Error;

    /// Record a newly submitted transcript
    fn insert_transcript(&mut self, transcript: &TranscriptRecord) -> Result<(), Self::Error>;

    /// Update a transcript's processing state
    fn set_status(&mut self, id: AnalysisId, status: TranscriptStatus) -> Result<(), Self::Error>;

    /// Persist the merged analysis of a transcript
    fn save_analysis(&mut self, analysis: &StoredAnalysis) -> Result<(), Self::Error>;

    /// Fetch one analysis
    fn get_analysis(&self, id: AnalysisId) -> Result<Option<StoredAnalysis>, Self::Error>;

    /// All analyses, newest first
    fn list_analyses(&self) -> Result<Vec<StoredAnalysis>, Self::Error>;

    /// Delete a transcript and its analysis; returns whether anything was removed
    fn delete(&mut self, id: AnalysisId) -> Result<bool, Self::Error>;
}
