use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

const DISCLAIMER: &str =
    "Data from Yahoo Finance, possibly delayed. For information only; not investment advice.";

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let document = json!({
                "data": result.data,
                "warnings": result.warnings,
            });
            let payload = if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => {
            for line in table_lines(result) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn table_lines(result: &CommandResult) -> Vec<String> {
    let mut lines = result.lines.clone();
    if !result.warnings.is_empty() {
        lines.push(String::new());
        lines.push(String::from("warnings:"));
        lines.extend(result.warnings.iter().map(|warning| format!("  - {warning}")));
    }
    lines.push(String::new());
    lines.push(DISCLAIMER.to_owned());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn table_appends_warnings_then_disclaimer() {
        let result = CommandResult::new(Value::Null, vec![String::from("TOP GAINERS")])
            .with_warnings(vec![String::from("headlines: down")]);

        let lines = table_lines(&result);
        assert_eq!(lines[0], "TOP GAINERS");
        assert!(lines.contains(&String::from("  - headlines: down")));
        assert_eq!(lines.last().map(String::as_str), Some(DISCLAIMER));
    }
}
