use pulso_core::{
    Dashboard, HeadlineTone, InstrumentReport, MomentumClassification, MomentumParams,
    MomentumSignal, SentimentClassification, SentimentSummary, TrendClassification, TrendSignal,
};

use crate::cli::InspectArgs;
use crate::error::CliError;

use super::{CommandResult, Numbers};

pub async fn run(
    args: &InspectArgs,
    dashboard: &Dashboard,
    numbers: Numbers,
) -> Result<CommandResult, CliError> {
    let report = dashboard.inspect(&args.symbol).await?;
    let lines = report_lines(&report, dashboard.config().momentum, numbers);
    let warnings = report.warnings.clone();

    let data = serde_json::to_value(&report)?;
    Ok(CommandResult::new(data, lines).with_warnings(warnings))
}

fn report_lines(report: &InstrumentReport, momentum: MomentumParams, numbers: Numbers) -> Vec<String> {
    let fundamentals = &report.fundamentals;
    let dividends = report.dividends.value();
    let price = dividends.price.or(fundamentals.regular_market_price);

    let mut lines = vec![
        format!("{}  (as of {})", report.display_name, report.as_of),
        String::new(),
        row("Price", numbers.money(price)),
        row("Dividends (12m)", numbers.money(Some(dividends.total_paid))),
        row("Dividend yield", numbers.percent(Some(dividends.annual_yield))),
        row("P/E", numbers.multiple(fundamentals.earnings_multiple())),
        row("P/B", numbers.decimal(fundamentals.price_to_book)),
        row("Book value/share", numbers.money(fundamentals.book_value_per_share)),
        String::new(),
        row(
            &format!("Trend (SMA {})", report.trend.window),
            describe_trend(&report.trend, numbers),
        ),
        row(
            &format!("Momentum (RSI {})", report.momentum.period),
            describe_momentum(&report.momentum, momentum, numbers),
        ),
        row("News sentiment", describe_sentiment(&report.sentiment, numbers)),
    ];

    let headlines = report.headlines.value();
    if !headlines.is_empty() {
        lines.push(String::new());
        lines.push(String::from("HEADLINES"));
    }
    for item in headlines {
        let marker = match item.tone() {
            HeadlineTone::Positive => "+",
            HeadlineTone::Negative => "-",
            HeadlineTone::Neutral => "=",
        };
        let source = item
            .headline
            .source
            .as_deref()
            .map(|source| format!(" ({source})"))
            .unwrap_or_default();
        lines.push(format!(
            "  [{marker}{:>2}] {}{source}",
            item.score.abs(),
            item.headline.title
        ));
    }

    lines
}

fn row(label: &str, value: String) -> String {
    format!("{label:<20} {value}")
}

fn describe_trend(signal: &TrendSignal, numbers: Numbers) -> String {
    let Some(deviation) = signal.percent_deviation else {
        return format!("insufficient history for the {}-day average", signal.window);
    };
    let side = if deviation >= 0.0 { "above" } else { "below" };
    let label = match signal.classification {
        TrendClassification::Uptrend => "uptrend",
        TrendClassification::Downtrend => "downtrend",
        TrendClassification::Neutral => "neutral",
        TrendClassification::Insufficient => "insufficient",
    };
    format!(
        "{label}: price is {} {side} the {}-day average",
        numbers.percent(Some(deviation.abs())),
        signal.window
    )
}

fn describe_momentum(signal: &MomentumSignal, params: MomentumParams, numbers: Numbers) -> String {
    let value = numbers.decimal(signal.value);
    match signal.classification {
        MomentumClassification::Overbought => {
            format!("overbought: {value} above {}", numbers.decimal(Some(params.overbought)))
        }
        MomentumClassification::Oversold => {
            format!("oversold: {value} below {}", numbers.decimal(Some(params.oversold)))
        }
        MomentumClassification::Neutral => format!("neutral: {value}"),
        MomentumClassification::Insufficient => {
            format!("insufficient history for a {}-period oscillator", signal.period)
        }
    }
}

fn describe_sentiment(summary: &SentimentSummary, numbers: Numbers) -> String {
    if summary.headline_count == 0 {
        return String::from("neutral: no recent headlines");
    }
    let label = match summary.classification {
        SentimentClassification::Optimistic => "optimistic",
        SentimentClassification::Pessimistic => "pessimistic",
        SentimentClassification::Neutral => "neutral",
    };
    format!(
        "{label}: mean score {} over {} headlines",
        numbers.decimal(Some(summary.mean_score)),
        summary.headline_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pulso_core::{DashboardConfig, DecimalStyle, DividendSummary, FailSoft, OfflineHttpClient};

    fn numbers() -> Numbers {
        Numbers::new(DecimalStyle::Point)
    }

    async fn offline_report() -> (InstrumentReport, MomentumParams) {
        let dashboard = Dashboard::yahoo(Arc::new(OfflineHttpClient), DashboardConfig::default());
        let report = dashboard.inspect("PETR4").await.expect("known fixture");
        (report, dashboard.config().momentum)
    }

    #[tokio::test]
    async fn price_row_shows_the_price_behind_the_yield() {
        let (report, momentum) = offline_report().await;
        let yield_price = report.dividends.value().price;
        assert!(yield_price.is_some());

        let lines = report_lines(&report, momentum, numbers());
        assert_eq!(lines[2], row("Price", numbers().money(yield_price)));
    }

    #[tokio::test]
    async fn price_row_falls_back_to_the_snapshot_price() {
        let (mut report, momentum) = offline_report().await;
        report.fundamentals.regular_market_price = Some(12.34);
        report.dividends = FailSoft::Defaulted {
            value: DividendSummary::unavailable(),
            reason: String::from("rate limited"),
        };

        let lines = report_lines(&report, momentum, numbers());
        assert_eq!(lines[2], row("Price", String::from("R$ 12.34")));
    }

    #[test]
    fn trend_description_names_side_and_window() {
        let signal = TrendSignal {
            classification: TrendClassification::Downtrend,
            window: 252,
            latest_price: Some(30.0),
            latest_average: Some(31.0),
            percent_deviation: Some(-3.2258),
            average: Vec::new(),
        };
        assert_eq!(
            describe_trend(&signal, numbers()),
            "downtrend: price is 3.23% below the 252-day average"
        );
    }

    #[test]
    fn insufficient_trend_has_no_deviation() {
        let signal = TrendSignal {
            classification: TrendClassification::Insufficient,
            window: 252,
            latest_price: Some(30.0),
            latest_average: None,
            percent_deviation: None,
            average: Vec::new(),
        };
        assert_eq!(
            describe_trend(&signal, numbers()),
            "insufficient history for the 252-day average"
        );
    }

    #[test]
    fn momentum_description_mentions_threshold() {
        let signal = MomentumSignal {
            value: Some(74.5),
            classification: MomentumClassification::Overbought,
            period: 14,
            series: Vec::new(),
        };
        assert_eq!(
            describe_momentum(&signal, MomentumParams::default(), numbers()),
            "overbought: 74.50 above 70.00"
        );
    }

    #[test]
    fn empty_sentiment_is_neutral() {
        let summary = SentimentSummary {
            mean_score: 0.0,
            classification: SentimentClassification::Neutral,
            headline_count: 0,
        };
        assert_eq!(
            describe_sentiment(&summary, numbers()),
            "neutral: no recent headlines"
        );
    }
}
