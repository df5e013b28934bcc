//! Configuration for aggregation and collateral generation

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied when ranking insights across analyses
///
/// # Examples
///
/// ```
/// use callscope_insights::InsightsConfig;
///
/// let config = InsightsConfig::default();
/// assert_eq!(config.max_suggestions, 15);
///
/// let config = InsightsConfig::detailed();
/// assert_eq!(config.max_details, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// Distinct objection and opportunity details kept per category
    pub max_details: usize,

    /// Distinct suggested responses kept per objection category
    pub max_responses: usize,

    /// Distinct rationales kept per messaging theme
    pub max_rationales: usize,

    /// Marketing suggestions kept in the ranking
    pub max_suggestions: usize,

    /// Leading characters of a theme used to group it
    pub theme_key_chars: usize,

    /// Maximum time for one collateral generation call (seconds)
    pub collateral_timeout_secs: u64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            max_details: 5,
            max_responses: 3,
            max_rationales: 3,
            max_suggestions: 15,
            theme_key_chars: 50,
            collateral_timeout_secs: 120,
        }
    }
}

impl InsightsConfig {
    /// Detailed preset: longer lists for export and review
    pub fn detailed() -> Self {
        Self {
            max_details: 10,
            max_responses: 5,
            max_rationales: 5,
            max_suggestions: 30,
            ..Self::default()
        }
    }

    /// Get the collateral timeout as a Duration
    pub fn collateral_timeout(&self) -> Duration {
        Duration::from_secs(self.collateral_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.theme_key_chars == 0 {
            return Err("theme_key_chars must be greater than 0".to_string());
        }
        if self.max_suggestions == 0 {
            return Err("max_suggestions must be greater than 0".to_string());
        }
        if self.collateral_timeout_secs == 0 {
            return Err("collateral_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}
