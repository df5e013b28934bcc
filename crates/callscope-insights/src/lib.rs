//! Callscope Insights
//!
//! Cross-transcript rankings and marketing collateral drafting.
//!
//! # Overview
//!
//! Once transcripts have been analyzed, this crate answers two questions:
//! - **What keeps coming up?** [`Aggregator`] ranks objection and opportunity
//!   categories, product modules, messaging themes and content ideas across
//!   every stored analysis
//! - **What do we ship next?** [`CollateralWriter`] drafts the asset described
//!   by one marketing suggestion
//!
//! # Ranking rules
//!
//! | Group | Key | Score |
//! |-------|-----|-------|
//! | Objections | category | count × mean severity |
//! | Opportunities | category | count × mean strength |
//! | Modules | exact name | mention count |
//! | Themes | first 50 lowercased chars | frequency × mean priority |
//! | Suggestions | lowercased `type-title` | frequency × priority |
//!
//! Levels weigh high = 3, medium = 2 and anything else (including missing) = 1.
//! Ties keep first-seen order.
//!
//! # Usage
//!
//! ```no_run
//! use callscope_insights::{Aggregator, InsightsConfig};
//! use callscope_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("callscope.db")?;
//! let aggregator = Aggregator::new(InsightsConfig::default());
//!
//! let report = aggregator.aggregate_store(&store)?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [insights]
//! max_details = 5
//! max_responses = 3
//! max_rationales = 3
//! max_suggestions = 15
//! theme_key_chars = 50
//! collateral_timeout_secs = 120
//! ```

#![warn(missing_docs)]

mod aggregate;
mod collateral;
mod config;
mod error;
mod report;

pub use aggregate::Aggregator;
pub use collateral::CollateralWriter;
pub use config::InsightsConfig;
pub use error::InsightsError;
pub use report::{
    AggregateReport, ModuleInsight, ObjectionInsight, OpportunityInsight, PipelineOverview,
    RankedSuggestion, ThemeInsight,
};
