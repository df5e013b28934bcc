//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::ingest;
use crate::output::Formatter;
use crate::provider::Provider;
use callscope_domain::traits::AnalysisStore;
use callscope_domain::{LlmProvider, StoredAnalysis, TranscriptRecord, TranscriptStatus};
use callscope_extractor::{Analyzer, ChunkFailure, Delay};
use callscope_store::SqliteStore;
use tracing::{error, info};

/// A stored analysis plus the chunks that were skipped.
#[derive(Debug)]
pub struct Analyzed {
    /// The persisted analysis
    pub stored: StoredAnalysis,
    /// Chunks dropped from the merge
    pub failures: Vec<ChunkFailure>,
    /// Number of chunks processed
    pub chunks_total: usize,
}

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let text = match &args.file {
        Some(path) => ingest::read_file(path)?,
        None => ingest::read_stdin()?,
    };
    check_length(&text, config.settings.min_transcript_chars)?;

    let llm = Provider::for_analysis(&config.provider)?;
    let analyzer = Analyzer::new(llm, config.analyzer.clone())?;
    eprintln!(
        "{}",
        formatter.info(&format!(
            "Analyzing {} characters with {}...",
            text.chars().count(),
            analyzer.llm().model_name()
        ))
    );

    let title = args.title.unwrap_or_default();
    let analyzed = analyze_and_store(&analyzer, store, &text, &title, &args.source).await?;

    if !analyzed.failures.is_empty() {
        eprintln!(
            "{}",
            formatter.chunk_failures(&analyzed.failures, analyzed.chunks_total)
        );
    }
    println!("{}", formatter.format_analysis(&analyzed.stored)?);
    eprintln!(
        "{}",
        formatter.success(&format!("Saved analysis {}", analyzed.stored.id))
    );
    Ok(())
}

/// Reject transcripts shorter than the configured minimum.
pub fn check_length(text: &str, min_chars: usize) -> Result<()> {
    if text.trim().chars().count() < min_chars {
        return Err(CliError::InvalidInput(format!(
            "Transcript must be at least {} characters",
            min_chars
        )));
    }
    Ok(())
}

/// Record the transcript, run the pipeline and persist the result.
///
/// A failed run leaves the transcript marked `failed` with no analysis.
pub async fn analyze_and_store<L, D>(
    analyzer: &Analyzer<L, D>,
    store: &mut SqliteStore,
    text: &str,
    title: &str,
    source: &str,
) -> Result<Analyzed>
where
    L: LlmProvider,
    D: Delay,
{
    let record = TranscriptRecord::new(title, text, source);
    store.insert_transcript(&record)?;
    info!(id = %record.id, title = %record.title, "Transcript recorded");

    let outcome = match analyzer.analyze_detailed(text).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(id = %record.id, error = %err, "Analysis failed");
            store.set_status(record.id, TranscriptStatus::Failed)?;
            return Err(err.into());
        }
    };

    let stored = StoredAnalysis {
        id: record.id,
        title: record.title,
        source: record.source,
        created_at: record.created_at,
        analysis: outcome.analysis,
    };
    store.save_analysis(&stored)?;
    info!(
        id = %stored.id,
        processing_time_ms = outcome.metadata.processing_time_ms,
        "Analysis saved"
    );

    Ok(Analyzed {
        stored,
        failures: outcome.failures,
        chunks_total: outcome.metadata.chunks_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscope_extractor::{AnalysisError, AnalyzerConfig, NoDelay};
    use callscope_llm::MockProvider;
    use tempfile::TempDir;

    const TRANSCRIPT: &str = "Rep: How do you review bank statements today?\n\
                              Prospect: By hand, and it takes two days per file.";

    fn store(dir: &TempDir) -> SqliteStore {
        SqliteStore::new(dir.path().join("test.db")).unwrap()
    }

    #[test]
    fn test_check_length() {
        assert!(check_length("short", 50).is_err());
        assert!(check_length(&"x".repeat(50), 50).is_ok());
        assert!(check_length(&format!("  {}  ", "x".repeat(49)), 50).is_err());
    }

    #[tokio::test]
    async fn test_successful_run_is_persisted() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let llm = MockProvider::new(r#"{"summary": "Manual review is the bottleneck."}"#);
        let analyzer =
            Analyzer::with_delay(llm, AnalyzerConfig::default(), NoDelay).unwrap();

        let analyzed = analyze_and_store(&analyzer, &mut store, TRANSCRIPT, "", "manual")
            .await
            .unwrap();

        assert!(analyzed.stored.title.starts_with("Transcript "));
        assert!(analyzed.failures.is_empty());
        assert_eq!(analyzed.chunks_total, 1);

        let loaded = store.get_analysis(analyzed.stored.id).unwrap().unwrap();
        assert_eq!(loaded.analysis.summary, "Manual review is the bottleneck.");
        let record = store.get_transcript(analyzed.stored.id).unwrap().unwrap();
        assert_eq!(record.status, TranscriptStatus::Complete);
    }

    #[tokio::test]
    async fn test_failed_run_marks_transcript_failed() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let llm = MockProvider::new("I cannot help with that.");
        let analyzer =
            Analyzer::with_delay(llm, AnalyzerConfig::default(), NoDelay).unwrap();

        let err = analyze_and_store(&analyzer, &mut store, TRANSCRIPT, "Call", "manual")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Analysis(AnalysisError::AllChunksFailed { chunks: 1 })
        ));

        assert!(store.list_analyses().unwrap().is_empty());
        let records = store.list_transcripts().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, TranscriptStatus::Failed);
    }
}
