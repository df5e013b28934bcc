//! The structured analysis record produced for a transcript
//!
//! One record is produced per transcript chunk and the merged record is the
//! one that gets persisted. Records are never mutated once built; merging
//! always creates a new value.
//!
//! Every field is optional-with-default at the parse boundary (see
//! [`crate::lenient`]), so a record can be built from any JSON object and
//! list fields are always present, possibly empty.

use crate::lenient;
use crate::vocabulary::{
    BuyingStage, ContentType, InterestLevel, Level, ObjectionCategory, OpportunityCategory,
    Sentiment,
};
use serde::{Deserialize, Serialize};

/// Structured intelligence extracted from a sales call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredAnalysis {
    /// Short narrative summary of the conversation
    #[serde(deserialize_with = "lenient::string")]
    pub summary: String,

    /// Who was on the other side of the call
    #[serde(deserialize_with = "lenient::or_default")]
    pub prospect: Prospect,

    /// Notable quotes and why they matter
    #[serde(deserialize_with = "lenient::seq")]
    pub key_phrases: Vec<KeyPhrase>,

    /// Objections raised by the prospect
    #[serde(deserialize_with = "lenient::seq")]
    pub objections: Vec<Objection>,

    /// Openings the sales team can act on
    #[serde(deserialize_with = "lenient::seq")]
    pub opportunities: Vec<Opportunity>,

    /// Product modules that came up
    #[serde(deserialize_with = "lenient::seq")]
    pub modules_discussed: Vec<ModuleMention>,

    /// Messaging angles suggested by the conversation
    #[serde(deserialize_with = "lenient::seq")]
    pub messaging_themes: Vec<MessagingTheme>,

    /// Marketing assets worth producing
    #[serde(deserialize_with = "lenient::seq")]
    pub marketing_suggestions: Vec<MarketingSuggestion>,

    /// Recommended follow-up actions
    #[serde(deserialize_with = "lenient::strings")]
    pub next_steps: Vec<String>,

    /// Where the deal stands, if the model could tell
    #[serde(deserialize_with = "lenient::option")]
    pub deal_signals: Option<DealSignals>,
}

impl StructuredAnalysis {
    /// Total number of items across all list fields
    pub fn item_count(&self) -> usize {
        self.key_phrases.len()
            + self.objections.len()
            + self.opportunities.len()
            + self.modules_discussed.len()
            + self.messaging_themes.len()
            + self.marketing_suggestions.len()
            + self.next_steps.len()
    }
}

/// The prospect on the call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prospect {
    /// Company or person name
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Role or title
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Size indicator
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,

    /// Segment within lending / fintech
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub industry_segment: Option<String>,
}

impl Prospect {
    /// Whether a non-empty name is known
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Shallow overlay: every field set on `other` replaces the field here.
    /// A field `other` left unset, or set to JSON `null`, keeps this value.
    pub fn overlay(&self, other: &Prospect) -> Prospect {
        Prospect {
            name: other.name.clone().or_else(|| self.name.clone()),
            role: other.role.clone().or_else(|| self.role.clone()),
            company_size: other
                .company_size
                .clone()
                .or_else(|| self.company_size.clone()),
            industry_segment: other
                .industry_segment
                .clone()
                .or_else(|| self.industry_segment.clone()),
        }
    }
}

/// A notable phrase from the transcript
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyPhrase {
    /// Exact or near-exact quote
    #[serde(deserialize_with = "lenient::string")]
    pub phrase: String,

    /// Why it matters
    #[serde(deserialize_with = "lenient::string")]
    pub context: String,

    /// Tone of the phrase
    #[serde(deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// An objection raised by the prospect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Objection {
    /// Category; unknown labels map to `Other`
    #[serde(deserialize_with = "lenient::or_default")]
    pub category: ObjectionCategory,

    /// The objection as stated
    #[serde(deserialize_with = "lenient::string")]
    pub detail: String,

    /// How much it threatens the deal
    #[serde(deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub severity: Option<Level>,

    /// How to counter it
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub suggested_response: Option<String>,

    /// Supporting quote
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

/// An opportunity spotted on the call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opportunity {
    /// Category; unknown labels map to `Other`
    #[serde(deserialize_with = "lenient::or_default")]
    pub category: OpportunityCategory,

    /// The opportunity
    #[serde(deserialize_with = "lenient::string")]
    pub detail: String,

    /// How promising it is
    #[serde(deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub strength: Option<Level>,

    /// Modules that address it
    #[serde(deserialize_with = "lenient::strings")]
    pub modules_relevant: Vec<String>,

    /// Supporting quote
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

/// A product module that came up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleMention {
    /// Module name
    #[serde(deserialize_with = "lenient::string")]
    pub module: String,

    /// Engagement with the module
    #[serde(deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub interest_level: Option<InterestLevel>,

    /// How it came up
    #[serde(deserialize_with = "lenient::string")]
    pub context: String,
}

/// A messaging angle derived from the call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingTheme {
    /// The theme
    #[serde(deserialize_with = "lenient::string")]
    pub theme: String,

    /// Why it resonates
    #[serde(deserialize_with = "lenient::string")]
    pub rationale: String,

    /// Emotion or need it addresses
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub target_emotion: Option<String>,

    /// Priority
    #[serde(deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Level>,
}

/// A marketing asset worth producing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketingSuggestion {
    /// Asset format
    #[serde(
        rename = "type",
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<ContentType>,

    /// Working title
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,

    /// What it covers and why
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,

    /// Objection or opportunity it answers
    #[serde(deserialize_with = "lenient::string")]
    pub addresses: String,

    /// Priority
    #[serde(deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Level>,

    /// Short content outline
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
}

/// Deal progress signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealSignals {
    /// Buying stage
    #[serde(deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub buying_stage: Option<BuyingStage>,

    /// How soon the prospect needs a solution
    #[serde(deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Level>,

    /// Model confidence that the deal closes, 0.0 to 1.0
    #[serde(deserialize_with = "lenient::score", skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,

    /// What stands in the way of closing
    #[serde(deserialize_with = "lenient::strings")]
    pub blockers: Vec<String>,
}
