//! # Pulso Core
//!
//! Indicator, sentiment and mover-ranking pipeline behind the `pulso` market
//! dashboard for B3-listed equities.
//!
//! ## Overview
//!
//! - **Domain types** for symbols, session dates, close series, corporate
//!   actions, fundamentals and headlines
//! - **Pure analytics**: mover ranking, long-window trend, momentum
//!   oscillator, dividend yield, keyword sentiment and value formatting
//! - **Provider traits** with a Yahoo Finance adapter and an offline fixture
//!   mode
//! - **TTL caching** at the provider boundary
//! - **Dashboard** orchestration with fail-soft defaults
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo Finance adapter |
//! | [`analytics`] | Pure pipeline components |
//! | [`cache`] | TTL memoization of provider responses |
//! | [`config`] | Dashboard configuration |
//! | [`dashboard`] | Provider orchestration and fail-soft defaults |
//! | [`data_source`] | Provider traits and request types |
//! | [`domain`] | Domain models |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`throttling`] | Outgoing request budget |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI            │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Dashboard      │────▶│ Analytics (pure) │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CachedSource    │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ YahooAdapter    │────▶│ HTTP Client      │
//! │                 │     │ (reqwest/offline)│
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pulso_core::{Dashboard, DashboardConfig, OfflineHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dashboard = Dashboard::yahoo(Arc::new(OfflineHttpClient), DashboardConfig::default());
//!     let board = dashboard.movers().await?;
//!     for row in &board.gainers {
//!         println!("{} {:+.2}%", row.symbol, row.percent_change);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod analytics;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod throttling;

// Adapter implementations
pub use adapters::{YahooAdapter, YahooSettings};

// Analytics
pub use analytics::{
    aggregate_dividends, format_value, momentum_signal, rank_movers, score_headlines, summarize,
    trend_signal, CloseBasket, DecimalStyle, DividendSummary, HeadlineTone, MomentumChart,
    MomentumClassification, MomentumParams, MomentumSignal, MoverBoard, MoverRow, NumberFormat,
    ScoredHeadline, SentimentClassification, SentimentLexicon, SentimentSummary,
    SentimentThresholds, TrendChart, TrendClassification, TrendParams, TrendSignal, ValueKind,
    NOT_APPLICABLE,
};

// Caching
pub use cache::{CacheStats, CacheStore, CacheTtls, CachedSource};

// Configuration
pub use config::DashboardConfig;

// Orchestration
pub use dashboard::{Dashboard, DashboardError, FailSoft, InstrumentReport};

// Data source traits and types
pub use data_source::{
    DailyClosesRequest, HeadlineRequest, HeadlineSource, Lookback, MarketDataSource, SourceError,
    SourceErrorKind, SourceFuture,
};

// Domain models
pub use domain::{
    CorporateAction, CorporateActionKind, FundamentalsSnapshot, HeadlineRecord, PricePoint,
    PriceSeries, SeriesPoint, Symbol, TradingDate, DEFAULT_REGIONAL_SUFFIX,
};

// Error types
pub use error::{ConfigError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, OfflineHttpClient,
    ReqwestHttpClient,
};

// Throttling
pub use throttling::RequestThrottle;
