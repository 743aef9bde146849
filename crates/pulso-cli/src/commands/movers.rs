use pulso_core::{Dashboard, MoverRow};
use tracing::debug;

use crate::cli::MoversArgs;
use crate::error::CliError;

use super::{CommandResult, Numbers};

pub async fn run(
    args: &MoversArgs,
    dashboard: &Dashboard,
    numbers: Numbers,
) -> Result<CommandResult, CliError> {
    let board = dashboard.movers().await?;
    debug!(limit = ?args.limit, rows = board.rows.len(), "ranked movers");

    let mut lines = Vec::new();
    lines.push(String::from("TOP GAINERS"));
    lines.extend(table(&board.gainers, numbers));
    lines.push(String::new());
    lines.push(String::from("TOP LOSERS"));
    lines.extend(table(&board.losers, numbers));

    let data = serde_json::to_value(&board)?;
    Ok(CommandResult::new(data, lines))
}

fn table(rows: &[MoverRow], numbers: Numbers) -> Vec<String> {
    if rows.is_empty() {
        return vec![String::from("  (none)")];
    }

    let mut lines = vec![format!("  {:<8} {:>14} {:>9}", "SYMBOL", "PRICE", "CHANGE")];
    lines.extend(rows.iter().map(|row| {
        format!(
            "  {:<8} {:>14} {:>9}",
            row.symbol,
            numbers.money(Some(row.price)),
            numbers.change(Some(row.percent_change))
        )
    }));
    lines
}
