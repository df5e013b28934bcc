//! Callscope Extractor
//!
//! Turns a sales-call transcript into structured intelligence using an LLM.
//!
//! # Overview
//!
//! Transcripts often exceed the model's input budget, so the extractor splits
//! them into line-respecting chunks, analyzes each chunk with its own model
//! call and merges the per-chunk records into one.
//!
//! # Architecture
//!
//! ```text
//! Transcript → Chunker → Extractor (LLM, one call per chunk) → Merger → StructuredAnalysis
//! ```
//!
//! # Key Features
//!
//! - **Line-respecting chunking**: chunks never split a line
//! - **Tolerant parsing**: code fences and surrounding prose are stripped;
//!   malformed sub-fields fall back to defaults
//! - **Partial failure**: a chunk whose response cannot be parsed is skipped
//! - **Rate limiting**: sequential calls with a configurable pause between them
//! - **Deduplicating merge**: list items are concatenated in chunk order with
//!   case-insensitive deduplication
//!
//! # Example Usage
//!
//! ```no_run
//! use callscope_extractor::{Analyzer, AnalyzerConfig};
//! use callscope_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"summary": "Prospect wants faster underwriting."}"#);
//! let analyzer = Analyzer::new(llm, AnalyzerConfig::default())?;
//!
//! let analysis = analyzer.analyze("Rep: How do you underwrite today?\nProspect: By hand.").await?;
//!
//! println!("Summary: {}", analysis.summary);
//! println!("Objections: {}", analysis.objections.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod delay;
mod error;
mod extractor;
mod merge;
mod parser;
mod pipeline;
mod prompt;
mod types;


pub use chunking::{Chunk, TranscriptChunker};
pub use config::{AnalyzerConfig, DedupScope};
pub use delay::{Delay, NoDelay, TokioDelay};
pub use error::{AnalysisError, ExtractionError, RAW_EXCERPT_CHARS};
pub use extractor::Extractor;
pub use merge::Merger;
pub use parser::parse_llm_response;
pub use pipeline::Analyzer;
pub use prompt::{collateral_prompt, PromptBuilder, DEFAULT_PRODUCT_CONTEXT};
pub use types::{AnalysisMetadata, AnalysisOutcome, ChunkFailure};
