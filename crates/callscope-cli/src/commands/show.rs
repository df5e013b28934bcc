//! Show command implementation.

use crate::cli::ShowArgs;
use crate::commands::fetch;
use crate::error::Result;
use crate::output::Formatter;
use callscope_store::SqliteStore;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let stored = fetch(store, &args.id)?;
    println!("{}", formatter.format_analysis(&stored)?);
    Ok(())
}
