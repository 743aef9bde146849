use pulso_core::DashboardConfig;

use crate::error::CliError;

use super::CommandResult;

pub fn run(config: &DashboardConfig) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(config)?;
    let lines = serde_json::to_string_pretty(&data)?
        .lines()
        .map(str::to_owned)
        .collect();
    Ok(CommandResult::new(data, lines))
}
