use pulso_core::Dashboard;
use serde_json::json;

use crate::error::CliError;

use super::CommandResult;

pub fn run(dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    let suffix = &dashboard.config().regional_suffix;
    let symbols = dashboard.watchlist()?;

    let entries: Vec<_> = symbols
        .iter()
        .map(|symbol| json!({ "symbol": symbol.display(suffix), "qualified": symbol }))
        .collect();
    let lines = symbols
        .iter()
        .map(|symbol| format!("  {:<8} {}", symbol.display(suffix), symbol))
        .collect();

    Ok(CommandResult::new(json!({ "watchlist": entries }), lines))
}
