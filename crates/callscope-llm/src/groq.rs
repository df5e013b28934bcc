//! Groq Provider Implementation
//!
//! Talks to Groq's OpenAI-compatible chat completions API. Any endpoint that
//! speaks the same protocol (OpenAI, a local gateway) works by overriding the
//! base URL.
//!
//! # Features
//!
//! - Single user-message chat completions
//! - JSON mode via `response_format: {"type": "json_object"}`
//! - Retry with exponential backoff on transport and 5xx errors
//! - Per-attempt timeout sized so all retries fit the analyzer's call budget
//! - Status-code classification (auth, rate limit, missing model)
//!
//! # Examples
//!
//! ```no_run
//! use callscope_llm::GroqProvider;
//! use callscope_domain::LlmProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = GroqProvider::from_env()?.with_temperature(0.3);
//! let text = provider.generate_json("Return {\"ok\": true}").await?;
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use callscope_domain::LlmProvider;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Groq API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default timeout for a single request attempt
///
/// Every attempt plus the backoff between them fits inside the analyzer's
/// default 120 s per-call budget, so a timed-out attempt can still be retried.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Groq chat completions provider
pub struct GroqProvider {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqProvider {
    /// Create a provider for the default Groq endpoint and model
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if the key is empty or the HTTP
    /// client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 4096,
            client,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider using the key in `GROQ_API_KEY`
    pub fn from_env() -> Result<Self, LlmError> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| LlmError::Configuration(format!("{} is not set", API_KEY_ENV)))?;
        Self::new(key)
    }

    /// Use a different OpenAI-compatible base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the timeout for each request attempt
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Longest time `complete` can spend: every attempt timing out plus the
    /// backoff sleeps between attempts
    pub fn retry_budget(&self) -> Duration {
        let backoff: u64 = (1..self.max_retries).map(|a| 2u64.pow(a - 1)).sum();
        self.timeout * self.max_retries + Duration::from_secs(backoff)
    }

    fn request_body<'a>(&'a self, prompt: &'a str, json_mode: bool) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }

    /// Run one chat completion and return the first choice's content
    ///
    /// # Errors
    ///
    /// - `Authentication` on 401/403
    /// - `RateLimitExceeded` on 429
    /// - `ModelNotAvailable` on 404
    /// - `Communication` on transport failures and other statuses, after retries
    /// - `InvalidResponse` when the body has no usable choice
    pub async fn complete(&self, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(prompt, json_mode);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .timeout(self.timeout)
                .json(&body)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
                        LlmError::InvalidResponse(format!("Failed to parse completion: {}", e))
                    })?;
                    return first_choice(parsed);
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let text = response.text().await.unwrap_or_default();
                    let error = classify_status(status, &text, &self.model);
                    if !error.is_transient() {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(attempt = attempts, ?delay, "Groq request failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn first_choice(response: ChatCompletionResponse) -> Result<String, LlmError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("No completion choices returned".to_string()))?;
    debug!(chars = content.len(), "Groq completion received");
    Ok(content)
}

/// Map a non-success HTTP status to an error
pub(crate) fn classify_status(status: u16, body: &str, model: &str) -> LlmError {
    let detail = format!("HTTP {}: {}", status, truncate(body, 200));
    match status {
        401 | 403 => LlmError::Authentication(detail),
        404 => LlmError::ModelNotAvailable(model.to_string()),
        429 => LlmError::RateLimitExceeded(detail),
        400..=499 => LlmError::Other(detail),
        _ => LlmError::Communication(detail),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

impl LlmProvider for GroqProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send {
        self.complete(prompt, false)
    }

    fn generate_json(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send {
        self.complete(prompt, true)
    }

    fn supports_json_mode(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
