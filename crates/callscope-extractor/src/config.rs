//! Configuration for the Analyzer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How merge deduplication keys are scoped across list fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupScope {
    /// One key set shared by every list field; an objection detail equal to
    /// an earlier key phrase is dropped
    #[default]
    Shared,
    /// A separate key set per list field
    PerField,
}

/// Configuration for the Analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum chunk size (characters)
    pub max_chunk_chars: usize,

    /// Pause between successive model calls (milliseconds)
    pub inter_chunk_delay_ms: u64,

    /// Maximum time for a single model call (seconds)
    pub call_timeout_secs: u64,

    /// Merge deduplication scope
    pub dedup_scope: DedupScope,

    /// Replaces the built-in product context block when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_context: Option<String>,
}

impl AnalyzerConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Get the inter-chunk delay as a Duration
    pub fn inter_chunk_delay(&self) -> Duration {
        Duration::from_millis(self.inter_chunk_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_chars == 0 {
            return Err("max_chunk_chars must be greater than 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self
            .product_context
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            return Err("product_context must not be blank when set".to_string());
        }
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    /// Sized for a ~6000 token input budget and a 30 requests/minute limit
    fn default() -> Self {
        Self {
            max_chunk_chars: 12_000,
            inter_chunk_delay_ms: 2_500,
            call_timeout_secs: 120,
            dedup_scope: DedupScope::Shared,
            product_context: None,
        }
    }
}

impl AnalyzerConfig {
    /// Free-tier preset: smaller chunks, longer pauses
    pub fn free_tier() -> Self {
        Self {
            max_chunk_chars: 8_000,
            inter_chunk_delay_ms: 4_000,
            call_timeout_secs: 180,
            ..Self::default()
        }
    }

    /// Unthrottled preset: for local models or paid tiers without rate limits
    pub fn unthrottled() -> Self {
        Self {
            max_chunk_chars: 24_000,
            inter_chunk_delay_ms: 0,
            call_timeout_secs: 300,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chunk_chars, 12_000);
        assert_eq!(config.inter_chunk_delay(), Duration::from_millis(2_500));
        assert_eq!(config.dedup_scope, DedupScope::Shared);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(AnalyzerConfig::free_tier().validate().is_ok());
        assert!(AnalyzerConfig::unthrottled().validate().is_ok());
        assert_eq!(AnalyzerConfig::unthrottled().inter_chunk_delay_ms, 0);
    }

    #[test]
    fn test_invalid_chunk_size() {
        let config = AnalyzerConfig {
            max_chunk_chars: 0,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_product_context_rejected() {
        let config = AnalyzerConfig {
            product_context: Some("  \n".to_string()),
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalyzerConfig {
            dedup_scope: DedupScope::PerField,
            product_context: Some("Acme sells anvils.".to_string()),
            ..AnalyzerConfig::free_tier()
        };
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("dedup_scope = \"per_field\""));

        let parsed = AnalyzerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = AnalyzerConfig::from_toml("inter_chunk_delay_ms = 0").unwrap();
        assert_eq!(parsed.inter_chunk_delay_ms, 0);
        assert_eq!(parsed.max_chunk_chars, 12_000);
    }
}
