//! Runtime selection of the model backend.

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::Result;
use callscope_domain::LlmProvider;
use callscope_llm::{GroqProvider, LlmError, MockProvider, OllamaProvider};
use std::future::Future;

/// Collateral drafts are longer and looser than analyses
const COLLATERAL_TEMPERATURE: f32 = 0.5;
const COLLATERAL_MAX_TOKENS: u32 = 3000;

/// The configured backend.
pub enum Provider {
    /// Groq chat completions
    Groq(GroqProvider),
    /// Local Ollama
    Ollama(OllamaProvider),
    /// Canned responses
    Mock(MockProvider),
}

impl Provider {
    /// Build the provider used for transcript analysis.
    pub fn for_analysis(config: &ProviderConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Build the provider used for collateral drafting.
    pub fn for_collateral(config: &ProviderConfig) -> Result<Self> {
        Self::build(config, Some((COLLATERAL_TEMPERATURE, COLLATERAL_MAX_TOKENS)))
    }

    fn build(config: &ProviderConfig, sampling: Option<(f32, u32)>) -> Result<Self> {
        let provider = match config.kind {
            ProviderKind::Groq => {
                let mut groq = GroqProvider::from_env()?;
                if let Some(endpoint) = &config.endpoint {
                    groq = groq.with_base_url(endpoint.clone());
                }
                if let Some(model) = &config.model {
                    groq = groq.with_model(model.clone());
                }
                if let Some((temperature, max_tokens)) = sampling {
                    groq = groq
                        .with_temperature(temperature)
                        .with_max_tokens(max_tokens);
                }
                Provider::Groq(groq)
            }
            ProviderKind::Ollama => {
                let model = config
                    .model
                    .clone()
                    .unwrap_or_else(|| "llama3.1".to_string());
                let mut ollama = match &config.endpoint {
                    Some(endpoint) => OllamaProvider::new(endpoint.clone(), model)?,
                    None => OllamaProvider::default_endpoint(model)?,
                };
                if let Some((temperature, _)) = sampling {
                    ollama = ollama.with_temperature(temperature);
                }
                Provider::Ollama(ollama)
            }
            ProviderKind::Mock => Provider::Mock(MockProvider::default()),
        };
        Ok(provider)
    }
}

impl LlmProvider for Provider {
    type Error = LlmError;

    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = std::result::Result<String, LlmError>> + Send {
        async move {
            match self {
                Provider::Groq(p) => p.generate(prompt).await,
                Provider::Ollama(p) => p.generate(prompt).await,
                Provider::Mock(p) => p.generate(prompt).await,
            }
        }
    }

    fn generate_json(
        &self,
        prompt: &str,
    ) -> impl Future<Output = std::result::Result<String, LlmError>> + Send {
        async move {
            match self {
                Provider::Groq(p) => p.generate_json(prompt).await,
                Provider::Ollama(p) => p.generate_json(prompt).await,
                Provider::Mock(p) => p.generate_json(prompt).await,
            }
        }
    }

    fn supports_json_mode(&self) -> bool {
        match self {
            Provider::Groq(p) => p.supports_json_mode(),
            Provider::Ollama(p) => p.supports_json_mode(),
            Provider::Mock(p) => p.supports_json_mode(),
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Provider::Groq(p) => p.model_name(),
            Provider::Ollama(p) => p.model_name(),
            Provider::Mock(p) => p.model_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend() {
        let config = ProviderConfig {
            kind: ProviderKind::Mock,
            model: None,
            endpoint: None,
        };
        let provider = Provider::for_analysis(&config).unwrap();
        assert_eq!(provider.model_name(), "mock");
        assert_eq!(provider.generate_json("anything").await.unwrap(), "{}");
    }

    #[test]
    fn test_groq_retries_fit_default_call_timeout() {
        let groq = GroqProvider::new("gsk_test").unwrap();
        let budget = callscope_extractor::AnalyzerConfig::default().call_timeout();
        assert!(groq.retry_budget() < budget);
    }

    #[test]
    fn test_ollama_backend_uses_configured_model() {
        let config = ProviderConfig {
            kind: ProviderKind::Ollama,
            model: Some("qwen2.5".to_string()),
            endpoint: Some("http://127.0.0.1:11434".to_string()),
        };
        let provider = Provider::for_collateral(&config).unwrap();
        assert_eq!(provider.model_name(), "qwen2.5");
        assert!(provider.supports_json_mode());
    }
}
