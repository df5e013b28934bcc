//! Command implementations.

pub mod aggregate;
pub mod analyze;
pub mod collateral;
pub mod config;
pub mod delete;
pub mod list;
pub mod show;

pub use self::aggregate::execute_aggregate;
pub use self::analyze::execute_analyze;
pub use self::collateral::execute_collateral;
pub use self::config::execute_config;
pub use self::delete::execute_delete;
pub use self::list::execute_list;
pub use self::show::execute_show;

use crate::error::{CliError, Result};
use callscope_domain::traits::AnalysisStore;
use callscope_domain::{AnalysisId, StoredAnalysis};
use callscope_store::SqliteStore;

/// Parse an ID argument.
pub(crate) fn parse_id(raw: &str) -> Result<AnalysisId> {
    AnalysisId::from_string(raw)
        .map_err(|e| CliError::InvalidInput(format!("Invalid ID '{}': {}", raw, e)))
}

/// Fetch an analysis or fail with `NotFound`.
pub(crate) fn fetch(store: &SqliteStore, raw_id: &str) -> Result<StoredAnalysis> {
    let id = parse_id(raw_id)?;
    store
        .get_analysis(id)?
        .ok_or_else(|| CliError::NotFound(raw_id.to_string()))
}
