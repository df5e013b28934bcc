//! Result types for the Analyzer

use crate::error::ExtractionError;
use callscope_domain::StructuredAnalysis;
use serde::Serialize;

/// Result of one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    /// The merged analysis
    pub analysis: StructuredAnalysis,

    /// Chunks whose responses could not be parsed
    pub failures: Vec<ChunkFailure>,

    /// Run metadata
    pub metadata: AnalysisMetadata,
}

/// A chunk dropped from the merge
#[derive(Debug, Clone, Serialize)]
pub struct ChunkFailure {
    /// 1-based chunk number
    pub chunk: usize,

    /// Why the response was unreadable
    pub reason: String,

    /// Leading characters of the raw response
    pub raw_excerpt: String,
}

impl ChunkFailure {
    pub(crate) fn new(chunk: usize, error: ExtractionError) -> Self {
        Self {
            chunk,
            reason: error.reason,
            raw_excerpt: error.raw_excerpt,
        }
    }
}

/// Metadata about an analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// Model that produced the analysis
    pub model_name: String,

    /// Transcript length in characters
    pub transcript_chars: usize,

    /// Number of chunks the transcript was split into
    pub chunks_total: usize,

    /// Wall-clock processing time (milliseconds)
    pub processing_time_ms: u64,
}
