//! Single-chunk extraction

use crate::error::{AnalysisError, ExtractionError};
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use callscope_domain::{LlmProvider, StructuredAnalysis};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Runs one model call per chunk and parses the response
pub struct Extractor<L> {
    llm: L,
    context: String,
    call_timeout: Duration,
}

impl<L: LlmProvider> Extractor<L> {
    /// Create a new Extractor
    pub fn new(llm: L, context: impl Into<String>, call_timeout: Duration) -> Self {
        Self {
            llm,
            context: context.into(),
            call_timeout,
        }
    }

    /// The wrapped provider
    pub fn llm(&self) -> &L {
        &self.llm
    }

    /// The product context embedded in prompts
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Analyze chunk `chunk_index` (0-based) of `chunk_count`
    ///
    /// The outer error is fatal to the run (the model call failed or timed
    /// out). The inner error is a response that could not be parsed, which
    /// callers may skip.
    pub async fn extract(
        &self,
        chunk_text: &str,
        chunk_index: usize,
        chunk_count: usize,
    ) -> Result<Result<StructuredAnalysis, ExtractionError>, AnalysisError> {
        let prompt = PromptBuilder::new(&self.context)
            .with_part(chunk_index + 1, chunk_count)
            .build(chunk_text);

        debug!(
            chunk = chunk_index + 1,
            prompt_chars = prompt.len(),
            json_mode = self.llm.supports_json_mode(),
            "Calling model"
        );

        let response = self.call_llm(&prompt).await?;

        debug!(chunk = chunk_index + 1, response_chars = response.len(), "Model responded");

        Ok(parse_llm_response(&response).inspect_err(|e| {
            warn!(
                chunk = chunk_index + 1,
                reason = %e.reason,
                raw = %e.raw_excerpt,
                "Chunk response failed to parse"
            );
        }))
    }

    /// Call the model in JSON mode, bounded by the per-call timeout
    async fn call_llm(&self, prompt: &str) -> Result<String, AnalysisError> {
        timeout(self.call_timeout, self.llm.generate_json(prompt))
            .await
            .map_err(|_| AnalysisError::Timeout(self.call_timeout.as_secs()))?
            .map_err(|e| AnalysisError::Llm(e.to_string()))
    }
}
