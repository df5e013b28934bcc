//! Marketing collateral drafting

use crate::config::InsightsConfig;
use crate::error::InsightsError;
use callscope_domain::{LlmProvider, MarketingSuggestion, StoredAnalysis};
use callscope_extractor::{collateral_prompt, DEFAULT_PRODUCT_CONTEXT};
use tracing::{debug, info, warn};

/// Drafts a marketing asset from one suggestion of a stored analysis
pub struct CollateralWriter<L: LlmProvider> {
    llm: L,
    product_context: String,
    config: InsightsConfig,
}

impl<L: LlmProvider> CollateralWriter<L> {
    /// Create a writer using the given product context
    pub fn new(llm: L, product_context: impl Into<String>, config: InsightsConfig) -> Self {
        Self {
            llm,
            product_context: product_context.into(),
            config,
        }
    }

    /// Create a writer using the built-in product context
    pub fn with_default_context(llm: L, config: InsightsConfig) -> Self {
        Self::new(llm, DEFAULT_PRODUCT_CONTEXT, config)
    }

    /// Look up a suggestion by 0-based position
    pub fn suggestion_at(
        analysis: &StoredAnalysis,
        index: usize,
    ) -> Result<&MarketingSuggestion, InsightsError> {
        let suggestions = &analysis.analysis.marketing_suggestions;
        suggestions
            .get(index)
            .ok_or(InsightsError::SuggestionNotFound {
                index,
                available: suggestions.len(),
            })
    }

    /// Draft the asset described by a suggestion
    ///
    /// Returns the model's free-form text unchanged.
    pub async fn generate(
        &self,
        suggestion: &MarketingSuggestion,
        additional_context: Option<&str>,
    ) -> Result<String, InsightsError> {
        let prompt = collateral_prompt(&self.product_context, suggestion, additional_context);
        debug!(
            title = %suggestion.title,
            prompt_chars = prompt.chars().count(),
            "Requesting collateral"
        );

        let timeout = self.config.collateral_timeout();
        let content = match tokio::time::timeout(timeout, self.llm.generate(&prompt)).await {
            Err(_) => {
                warn!(
                    secs = self.config.collateral_timeout_secs,
                    "Collateral generation timed out"
                );
                return Err(InsightsError::Timeout(self.config.collateral_timeout_secs));
            }
            Ok(result) => result.map_err(|e| InsightsError::Llm(e.to_string()))?,
        };

        info!(
            title = %suggestion.title,
            model = self.llm.model_name(),
            chars = content.chars().count(),
            "Collateral generated"
        );
        Ok(content)
    }

    /// Draft the asset for the suggestion at `index` of a stored analysis
    pub async fn generate_for(
        &self,
        analysis: &StoredAnalysis,
        index: usize,
        additional_context: Option<&str>,
    ) -> Result<String, InsightsError> {
        let suggestion = Self::suggestion_at(analysis, index)?;
        self.generate(suggestion, additional_context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscope_domain::{AnalysisId, ContentType, StructuredAnalysis};
    use callscope_llm::{LlmError, MockProvider};

    fn analysis_with_suggestion() -> StoredAnalysis {
        StoredAnalysis {
            id: AnalysisId::new(),
            title: "Bank call".to_string(),
            source: "manual".to_string(),
            created_at: 0,
            analysis: StructuredAnalysis {
                marketing_suggestions: vec![MarketingSuggestion {
                    kind: Some(ContentType::CaseStudy),
                    title: "How a lender cut KYC time".to_string(),
                    description: "Onboarding speed story".to_string(),
                    addresses: "Slow onboarding".to_string(),
                    ..MarketingSuggestion::default()
                }],
                ..StructuredAnalysis::default()
            },
        }
    }

    #[test]
    fn test_suggestion_at_out_of_range() {
        let analysis = analysis_with_suggestion();
        let err = CollateralWriter::<MockProvider>::suggestion_at(&analysis, 3).unwrap_err();
        assert!(matches!(
            err,
            InsightsError::SuggestionNotFound {
                index: 3,
                available: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_generate_returns_text_verbatim() {
        let llm = MockProvider::new("# Case Study\n\nBody text");
        let writer = CollateralWriter::with_default_context(llm.clone(), InsightsConfig::default());

        let content = writer
            .generate_for(&analysis_with_suggestion(), 0, Some("Focus on banks"))
            .await
            .unwrap();

        assert_eq!(content, "# Case Study\n\nBody text");
        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].json_mode);
        assert!(calls[0].prompt.contains("How a lender cut KYC time"));
        assert!(calls[0].prompt.contains("Focus on banks"));
    }

    #[tokio::test]
    async fn test_generate_propagates_provider_error() {
        let llm = MockProvider::default();
        llm.push_error(LlmError::RateLimitExceeded("30 rpm".into()));
        let writer = CollateralWriter::new(llm, "ctx", InsightsConfig::default());

        let err = writer
            .generate_for(&analysis_with_suggestion(), 0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, InsightsError::Llm(_)));
    }
}
