//! The chunk, extract and merge pipeline

use crate::chunking::TranscriptChunker;
use crate::config::AnalyzerConfig;
use crate::delay::{Delay, TokioDelay};
use crate::error::AnalysisError;
use crate::extractor::Extractor;
use crate::merge::Merger;
use crate::prompt::DEFAULT_PRODUCT_CONTEXT;
use crate::types::{AnalysisMetadata, AnalysisOutcome, ChunkFailure};
use callscope_domain::{LlmProvider, StructuredAnalysis};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turns a transcript into one merged [`StructuredAnalysis`]
///
/// Chunks are processed strictly in order, one model call at a time, with a
/// pause between calls. Unparseable chunk responses are skipped; a failed
/// model call aborts the run.
pub struct Analyzer<L, D = TokioDelay> {
    extractor: Extractor<L>,
    chunker: TranscriptChunker,
    merger: Merger,
    delay: D,
    config: AnalyzerConfig,
}

impl<L: LlmProvider> Analyzer<L, TokioDelay> {
    /// Create a new Analyzer that sleeps on the tokio timer between calls
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Config` if the configuration is invalid.
    pub fn new(llm: L, config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        Self::with_delay(llm, config, TokioDelay)
    }
}

impl<L: LlmProvider, D: Delay> Analyzer<L, D> {
    /// Create a new Analyzer with a custom delay
    pub fn with_delay(llm: L, config: AnalyzerConfig, delay: D) -> Result<Self, AnalysisError> {
        config.validate().map_err(AnalysisError::Config)?;

        let context = config
            .product_context
            .clone()
            .unwrap_or_else(|| DEFAULT_PRODUCT_CONTEXT.to_string());

        Ok(Self {
            extractor: Extractor::new(llm, context, config.call_timeout()),
            chunker: TranscriptChunker::new(config.max_chunk_chars),
            merger: Merger::new(config.dedup_scope),
            delay,
            config,
        })
    }

    /// The analyzer configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The wrapped provider
    pub fn llm(&self) -> &L {
        self.extractor.llm()
    }

    /// The product context embedded in prompts
    pub fn product_context(&self) -> &str {
        self.extractor.context()
    }

    /// Analyze a transcript
    pub async fn analyze(&self, text: &str) -> Result<StructuredAnalysis, AnalysisError> {
        self.analyze_detailed(text).await.map(|outcome| outcome.analysis)
    }

    /// Analyze a transcript, also reporting skipped chunks and run metadata
    ///
    /// # Errors
    ///
    /// - `EmptyTranscript` if `text` is blank
    /// - `Llm` / `Timeout` if any model call fails
    /// - `AllChunksFailed` if no chunk response could be parsed
    pub async fn analyze_detailed(&self, text: &str) -> Result<AnalysisOutcome, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyTranscript);
        }

        let start_time = Instant::now();
        let chunks = self.chunker.split(text);
        let chunk_count = chunks.len();
        let transcript_chars = text.chars().count();

        info!(
            transcript_chars,
            chunks = chunk_count,
            model = self.llm().model_name(),
            "Processing transcript"
        );

        let mut records = Vec::with_capacity(chunk_count);
        let mut failures = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            if idx > 0 {
                self.delay.wait(self.config.inter_chunk_delay()).await;
            }

            debug!("Processing chunk {}/{}", chunk.number, chunk_count);

            match self.extractor.extract(&chunk.text, idx, chunk_count).await? {
                Ok(record) => records.push(record),
                Err(e) => failures.push(ChunkFailure::new(chunk.number, e)),
            }
        }

        let parsed = records.len();
        let analysis = self
            .merger
            .merge(records)
            .ok_or(AnalysisError::AllChunksFailed {
                chunks: chunk_count,
            })
            .inspect_err(|_| warn!(chunks = chunk_count, "All chunks failed to parse"))?;

        info!(
            parsed,
            skipped = failures.len(),
            objections = analysis.objections.len(),
            opportunities = analysis.opportunities.len(),
            suggestions = analysis.marketing_suggestions.len(),
            "Analysis complete"
        );

        Ok(AnalysisOutcome {
            analysis,
            failures,
            metadata: AnalysisMetadata {
                model_name: self.llm().model_name().to_string(),
                transcript_chars,
                chunks_total: chunk_count,
                processing_time_ms: start_time.elapsed().as_millis() as u64,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::NoDelay;
    use callscope_llm::MockProvider;

    #[tokio::test]
    async fn test_analyze_empty_transcript() {
        let analyzer =
            Analyzer::with_delay(MockProvider::default(), AnalyzerConfig::default(), NoDelay)
                .unwrap();
        assert_eq!(
            analyzer.analyze("   \n\t").await,
            Err(AnalysisError::EmptyTranscript)
        );
        assert_eq!(analyzer.llm().call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = AnalyzerConfig {
            call_timeout_secs: 0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            Analyzer::new(MockProvider::default(), config),
            Err(AnalysisError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_product_context_override() {
        let config = AnalyzerConfig {
            product_context: Some("Acme sells anvils.".to_string()),
            ..AnalyzerConfig::default()
        };
        let llm = MockProvider::default();
        let analyzer = Analyzer::with_delay(llm.clone(), config, NoDelay).unwrap();
        analyzer.analyze("Rep: hello").await.unwrap();

        let prompt = &llm.calls()[0].prompt;
        assert!(prompt.contains("Acme sells anvils."));
        assert!(!prompt.contains("HyperVerge"));
    }
}
