//! Collateral command implementation.

use crate::cli::CollateralArgs;
use crate::commands::fetch;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::provider::Provider;
use callscope_extractor::DEFAULT_PRODUCT_CONTEXT;
use callscope_insights::CollateralWriter;
use callscope_store::SqliteStore;

/// Execute the collateral command.
pub async fn execute_collateral(
    args: CollateralArgs,
    config: &Config,
    store: &SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let stored = fetch(store, &args.id)?;

    let context = config
        .analyzer
        .product_context
        .as_deref()
        .unwrap_or(DEFAULT_PRODUCT_CONTEXT);
    let llm = Provider::for_collateral(&config.provider)?;
    let writer = CollateralWriter::new(llm, context, config.insights.clone());

    let suggestion = CollateralWriter::<Provider>::suggestion_at(&stored, args.index)?;
    eprintln!(
        "{}",
        formatter.info(&format!("Drafting \"{}\"...", suggestion.title))
    );

    let content = writer.generate(suggestion, args.context.as_deref()).await?;
    println!("{}", content);
    Ok(())
}
