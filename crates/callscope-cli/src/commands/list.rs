//! List command implementation.

use crate::error::Result;
use crate::output::Formatter;
use callscope_domain::traits::AnalysisStore;
use callscope_store::SqliteStore;

/// Execute the list command.
pub fn execute_list(store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let analyses = store.list_analyses()?;
    println!("{}", formatter.format_list(&analyses)?);
    Ok(())
}
