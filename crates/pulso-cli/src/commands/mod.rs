mod config;
mod inspect;
mod movers;
mod watchlist;

use std::sync::Arc;

use pulso_core::{
    format_value, Dashboard, DashboardConfig, DecimalStyle, HttpClient, OfflineHttpClient,
    ReqwestHttpClient, ValueKind,
};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    /// JSON payload.
    pub data: Value,
    /// Human-readable report lines for table output.
    pub lines: Vec<String>,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn new(data: Value, lines: Vec<String>) -> Self {
        Self {
            data,
            lines,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

/// Report number templates bound to one decimal style.
#[derive(Debug, Clone, Copy)]
pub struct Numbers {
    style: DecimalStyle,
}

impl Numbers {
    pub const fn new(style: DecimalStyle) -> Self {
        Self { style }
    }

    pub fn money(self, value: Option<f64>) -> String {
        format_value(value, "R$ {:,.2}", ValueKind::Plain, self.style)
    }

    pub fn percent(self, value: Option<f64>) -> String {
        format_value(value, "{:.2}%", ValueKind::Plain, self.style)
    }

    pub fn change(self, value: Option<f64>) -> String {
        format_value(value, "{:+.2}%", ValueKind::Plain, self.style)
    }

    pub fn multiple(self, value: Option<f64>) -> String {
        format_value(value, "{:.2}x", ValueKind::EarningsMultiple, self.style)
    }

    pub fn decimal(self, value: Option<f64>) -> String {
        format_value(value, "{:.2}", ValueKind::Plain, self.style)
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let mut settings = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(timeout_ms) = cli.timeout_ms {
        settings.provider.timeout_ms = timeout_ms;
    }
    if let Command::Movers(args) = &cli.command {
        if let Some(limit) = args.limit {
            settings.mover_list_size = limit;
        }
    }
    settings.validate()?;
    let numbers = Numbers::new(if cli.pt_br {
        DecimalStyle::Comma
    } else {
        DecimalStyle::Point
    });

    if let Command::Config = cli.command {
        return config::run(&settings);
    }

    let http_client: Arc<dyn HttpClient> = if cli.offline {
        Arc::new(OfflineHttpClient)
    } else {
        Arc::new(ReqwestHttpClient::new())
    };
    debug!(offline = cli.offline, "building dashboard");
    let dashboard = Dashboard::yahoo(http_client, settings);

    match &cli.command {
        Command::Movers(args) => movers::run(args, &dashboard, numbers).await,
        Command::Inspect(args) => inspect::run(args, &dashboard, numbers).await,
        Command::Watchlist => watchlist::run(&dashboard),
        Command::Config => config::run(dashboard.config()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn config_command_reports_file_overrides() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("pulso.json");
        std::fs::write(&path, r#"{"trend": {"window": 50}}"#).expect("write config");

        let cli = Cli::try_parse_from([
            "pulso",
            "config",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--timeout-ms",
            "2500",
        ])
        .expect("valid arguments");
        let result = run(&cli).await.expect("config renders");

        assert_eq!(result.data["trend"]["window"], 50);
        assert_eq!(result.data["provider"]["timeout_ms"], 2500);
        assert_eq!(result.data["momentum"]["period"], 14);
    }

    #[tokio::test]
    async fn offline_movers_split_gainers_and_losers() {
        let cli = Cli::try_parse_from(["pulso", "--offline", "movers", "--limit", "2"])
            .expect("valid arguments");
        let result = run(&cli).await.expect("offline fixtures");

        let gainers = result.data["gainers"].as_array().expect("gainers array");
        let losers = result.data["losers"].as_array().expect("losers array");
        assert!(gainers.len() <= 2 && losers.len() <= 2);
        assert!(gainers
            .iter()
            .all(|row| row["percent_change"].as_f64().unwrap_or_default() > 0.0));
        assert_eq!(result.lines[0], "TOP GAINERS");
    }

    #[tokio::test]
    async fn movers_limit_can_exceed_the_configured_list_size() {
        let cli = Cli::try_parse_from(["pulso", "--offline", "movers", "--limit", "15"])
            .expect("valid arguments");
        let result = run(&cli).await.expect("offline fixtures");

        let gainers = result.data["gainers"].as_array().expect("gainers array");
        let losers = result.data["losers"].as_array().expect("losers array");
        let rows = result.data["rows"].as_array().expect("rows array");
        assert!(gainers.len() + losers.len() > 5);
        assert_eq!(
            gainers.len() + losers.len(),
            rows.iter()
                .filter(|row| row["percent_change"].as_f64().unwrap_or_default() != 0.0)
                .count()
        );
    }

    #[tokio::test]
    async fn zero_movers_limit_is_a_usage_error() {
        let cli = Cli::try_parse_from(["pulso", "--offline", "movers", "--limit", "0"])
            .expect("valid arguments");
        let error = match run(&cli).await {
            Ok(_) => panic!("zero limit must fail"),
            Err(error) => error,
        };
        assert_eq!(error.exit_code(), 2);
    }

    #[tokio::test]
    async fn unknown_symbol_maps_to_exit_code_three() {
        let cli = Cli::try_parse_from(["pulso", "--offline", "inspect", "ZZZZ3"])
            .expect("valid arguments");
        let error = match run(&cli).await {
            Ok(_) => panic!("unknown fixture must fail"),
            Err(error) => error,
        };
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn numbers_follow_decimal_style() {
        let point = Numbers::new(DecimalStyle::Point);
        let comma = Numbers::new(DecimalStyle::Comma);

        assert_eq!(point.money(Some(1234.5)), "R$ 1,234.50");
        assert_eq!(comma.money(Some(1234.5)), "R$ 1.234,50");
        assert_eq!(comma.change(Some(2.5)), "+2,50%");
        assert_eq!(point.multiple(Some(-3.0)), "N/A");
        assert_eq!(point.percent(None), "N/A");
    }
}
