//! CLI argument definitions for pulso.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `movers` | Rank the watchlist's top gainers and losers |
//! | `inspect` | Dividends, fundamentals, signals and news for one symbol |
//! | `watchlist` | List the configured watchlist |
//! | `config` | Print the effective configuration |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--config` | none | JSON configuration file |
//! | `--offline` | `false` | Serve deterministic fixtures instead of Yahoo |
//! | `--timeout-ms` | config | Request timeout in ms |
//! | `--pt-br` | `false` | Brazilian decimal style (`1.234,56`) |
//!
//! # Examples
//!
//! ```bash
//! pulso movers
//! pulso inspect petr4 --pt-br
//! pulso inspect VALE3 --format json --pretty
//! RUST_LOG=pulso=debug pulso --offline movers
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Market pulse for B3 equities: movers, trend and momentum signals,
/// dividends and headline sentiment.
#[derive(Debug, Parser)]
#[command(
    name = "pulso",
    author,
    version,
    about = "Market pulse dashboard for B3 equities"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// JSON configuration file overriding the defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve deterministic offline fixtures instead of calling Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Render numbers in Brazilian style: `.` thousands, `,` decimals.
    #[arg(long = "pt-br", global = true, default_value_t = false)]
    pub pt_br: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank the watchlist by change over the last two sessions.
    ///
    ///   pulso movers
    ///   pulso movers --limit 3
    Movers(MoversArgs),

    /// Inspect one symbol: dividends, valuation, trend, momentum and news.
    ///
    ///   pulso inspect PETR4
    ///   pulso inspect vale3 --pt-br
    Inspect(InspectArgs),

    /// List the configured watchlist with qualified tickers.
    Watchlist,

    /// Print the effective configuration as JSON.
    Config,
}

#[derive(Debug, Args)]
pub struct MoversArgs {
    /// Gainers and losers to show; overrides the configured list size.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Ticker, with or without the regional suffix.
    pub symbol: String,
}
