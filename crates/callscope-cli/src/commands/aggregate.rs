//! Aggregate command implementation.

use crate::error::Result;
use crate::output::Formatter;
use callscope_insights::{Aggregator, InsightsConfig};
use callscope_store::SqliteStore;

/// Execute the aggregate command.
pub fn execute_aggregate(
    config: &InsightsConfig,
    store: &SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let report = Aggregator::new(config.clone()).aggregate_store(store)?;
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}
