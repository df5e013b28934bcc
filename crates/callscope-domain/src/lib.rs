//! Callscope Domain Layer
//!
//! Core model for sales-call analysis: the structured analysis record the
//! model produces for a transcript, the closed vocabularies inside it, the
//! persisted record types, and the trait seams to infrastructure.
//!
//! ## Key Concepts
//!
//! - **StructuredAnalysis**: summary, prospect, objections, opportunities,
//!   modules, messaging themes, marketing suggestions, next steps and deal
//!   signals for one transcript (or one chunk of it)
//! - **Lenient parsing**: every field defaults when the model output has the
//!   wrong shape, so list fields are always present
//! - **Vocabularies**: categories and levels parse case-insensitively and
//!   serialize to the labels the model is prompted with
//!
//! ## Architecture
//!
//! - Pure data and traits, no I/O
//! - `LlmProvider` and `AnalysisStore` are implemented in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod lenient;
pub mod record;
pub mod traits;
pub mod vocabulary;

// Re-exports for convenience
pub use analysis::{
    DealSignals, KeyPhrase, MarketingSuggestion, MessagingTheme, ModuleMention, Objection,
    Opportunity, Prospect, StructuredAnalysis,
};
pub use record::{AnalysisId, StoredAnalysis, TranscriptRecord, TranscriptStatus};
pub use traits::{AnalysisStore, LlmProvider};
pub use vocabulary::{
    BuyingStage, ContentType, InterestLevel, Level, ObjectionCategory, OpportunityCategory,
    Sentiment,
};
