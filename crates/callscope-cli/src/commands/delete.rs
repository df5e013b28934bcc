//! Delete command implementation.

use crate::cli::DeleteArgs;
use crate::commands::parse_id;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use callscope_domain::traits::AnalysisStore;
use callscope_store::SqliteStore;
use std::io::{self, Write};

/// Execute the delete command.
pub fn execute_delete(
    args: DeleteArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let id = parse_id(&args.id)?;

    // Confirm deletion unless --yes is specified
    if !args.yes {
        print!("Delete transcript {} and its analysis? [y/N] ", id);
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    if store.delete(id)? {
        println!("{}", formatter.success(&format!("Deleted {}", id)));
        Ok(())
    } else {
        Err(CliError::NotFound(args.id))
    }
}
