//! Callscope LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `callscope-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `GroqProvider`: Groq (or any OpenAI-compatible) chat completions API
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use callscope_llm::MockProvider;
//! use callscope_domain::LlmProvider;
//!
//! # async fn example() {
//! let provider = MockProvider::new(r#"{"summary": "ok"}"#);
//! let result = provider.generate_json("test prompt").await.unwrap();
//! assert_eq!(result, r#"{"summary": "ok"}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod groq;
pub mod ollama;

use callscope_domain::LlmProvider;
use std::collections::{HashMap, VecDeque};
use std::future::{ready, Future};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use groq::GroqProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Provider could not be constructed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether a retry of the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::Communication(_))
    }
}

/// A prompt received by [`MockProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Full prompt text
    pub prompt: String,
    /// Whether JSON mode was requested
    pub json_mode: bool,
}

/// Mock LLM provider for deterministic testing
///
/// Responses are chosen in this order: a queued outcome (consumed once), a
/// response registered for the exact prompt, then the default response.
///
/// # Examples
///
/// ```
/// use callscope_llm::{LlmError, MockProvider};
/// use callscope_domain::LlmProvider;
///
/// # async fn example() {
/// let provider = MockProvider::new("fallback");
/// provider.push_response("first");
/// provider.push_error(LlmError::RateLimitExceeded("30 rpm".into()));
///
/// assert_eq!(provider.generate("a").await.unwrap(), "first");
/// assert!(provider.generate("b").await.is_err());
/// assert_eq!(provider.generate("c").await.unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    json_mode: bool,
    queued: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            json_mode: true,
            queued: Arc::new(Mutex::new(VecDeque::new())),
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that returns each response once, in order
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::default();
        for response in responses {
            provider.push_response(response);
        }
        provider
    }

    /// Report no JSON response mode, as a plain completion API would
    pub fn without_json_mode(mut self) -> Self {
        self.json_mode = false;
        self
    }

    /// Queue a response for the next call
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.queued).push_back(Ok(response.into()));
    }

    /// Queue a failure for the next call
    pub fn push_error(&self, error: LlmError) {
        lock(&self.queued).push_back(Err(error));
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), response.into());
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Reset the call log
    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
    }

    fn respond(&self, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
        lock(&self.calls).push(RecordedCall {
            prompt: prompt.to_string(),
            json_mode,
        });

        if let Some(outcome) = lock(&self.queued).pop_front() {
            return outcome;
        }

        if let Some(response) = lock(&self.responses).get(prompt) {
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send {
        ready(self.respond(prompt, false))
    }

    fn generate_json(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        ready(self.respond(prompt, self.json_mode))
    }

    fn supports_json_mode(&self) -> bool {
        self.json_mode
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
