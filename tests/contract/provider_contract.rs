use std::sync::Arc;

use pulso_core::{
    CacheTtls, CachedSource, CorporateActionKind, DailyClosesRequest, HeadlineRequest,
    HeadlineSource, Lookback, MarketDataSource, SourceErrorKind, Symbol, YahooAdapter,
};

struct ProviderCase {
    name: &'static str,
    market: Arc<dyn MarketDataSource>,
    news: Arc<dyn HeadlineSource>,
}

fn provider_cases() -> Vec<ProviderCase> {
    let cached = Arc::new(CachedSource::new(YahooAdapter::offline(), CacheTtls::default()));
    let uncached = Arc::new(YahooAdapter::offline());
    vec![
        ProviderCase {
            name: "yahoo-offline",
            market: uncached.clone(),
            news: uncached,
        },
        ProviderCase {
            name: "yahoo-offline-cached",
            market: cached.clone(),
            news: cached,
        },
    ]
}

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

#[tokio::test]
async fn daily_closes_are_strictly_increasing_and_omit_unknown_symbols() {
    for case in provider_cases() {
        let request = DailyClosesRequest::new(
            vec![symbol("PETR4.SA"), symbol("NOPE3.SA"), symbol("VALE3.SA")],
            Lookback::TwoYears,
        )
        .expect("valid request");

        let series = case
            .market
            .daily_closes(request)
            .await
            .unwrap_or_else(|error| panic!("provider '{}' closes failed: {error}", case.name));

        let symbols: Vec<&str> = series.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["PETR4.SA", "VALE3.SA"], "provider '{}'", case.name);
        for history in &series {
            assert!(
                history
                    .points()
                    .windows(2)
                    .all(|pair| pair[0].date < pair[1].date),
                "provider '{}': dates must increase",
                case.name
            );
            assert!(
                history.points().iter().all(|p| p.close.is_finite() && p.close > 0.0),
                "provider '{}': closes must be positive",
                case.name
            );
        }
    }
}

#[tokio::test]
async fn two_day_basket_has_two_sessions() {
    for case in provider_cases() {
        let request = DailyClosesRequest::new(vec![symbol("WEGE3.SA")], Lookback::TwoDays)
            .expect("valid request");
        let series = case.market.daily_closes(request).await.expect("basket");
        assert_eq!(series[0].len(), 2, "provider '{}'", case.name);
    }
}

#[tokio::test]
async fn corporate_actions_are_ordered_and_only_dividends_carry_cash() {
    for case in provider_cases() {
        let actions = case
            .market
            .corporate_actions(&symbol("ITUB4.SA"))
            .await
            .unwrap_or_else(|error| panic!("provider '{}' actions failed: {error}", case.name));

        assert!(
            actions.windows(2).all(|pair| pair[0].ex_date <= pair[1].ex_date),
            "provider '{}': actions sorted by ex-date",
            case.name
        );
        for action in &actions {
            if action.kind != CorporateActionKind::Dividend {
                assert_eq!(action.paid_amount(), None, "provider '{}'", case.name);
            }
        }
    }
}

#[tokio::test]
async fn fundamentals_of_listed_symbols_are_recognized() {
    for case in provider_cases() {
        let snapshot = case
            .market
            .fundamentals(&symbol("BBDC4.SA"))
            .await
            .unwrap_or_else(|error| panic!("provider '{}' fundamentals failed: {error}", case.name));

        assert!(snapshot.is_recognized(5), "provider '{}'", case.name);
        assert!(snapshot.long_name.is_some(), "provider '{}'", case.name);
        assert!(
            snapshot.earnings_multiple().is_some_and(|m| m > 0.0),
            "provider '{}': multiple",
            case.name
        );
    }
}

#[tokio::test]
async fn unknown_symbols_fail_with_not_found() {
    for case in provider_cases() {
        let error = case
            .market
            .fundamentals(&symbol("NOPE3.SA"))
            .await
            .expect_err("unknown symbol must fail");
        assert_eq!(error.kind(), SourceErrorKind::NotFound, "provider '{}'", case.name);
        assert_eq!(error.code(), "source.not_found");
    }
}

#[tokio::test]
async fn last_price_matches_latest_close() {
    for case in provider_cases() {
        let sym = symbol("SUZB3.SA");
        let request =
            DailyClosesRequest::new(vec![sym.clone()], Lookback::TwoDays).expect("valid request");
        let series = case.market.daily_closes(request).await.expect("basket");
        let price = case.market.last_price(&sym).await.expect("last price");

        assert_eq!(
            price,
            series[0].last().map(|point| point.close),
            "provider '{}'",
            case.name
        );
    }
}

#[tokio::test]
async fn headlines_respect_the_limit() {
    for case in provider_cases() {
        let request = HeadlineRequest::new("\"Fato Relevante\" GGBR4 OR notícias GGBR4 B3", 3)
            .expect("valid request");
        let headlines = case
            .news
            .headlines(request)
            .await
            .unwrap_or_else(|error| panic!("provider '{}' headlines failed: {error}", case.name));

        assert_eq!(headlines.len(), 3, "provider '{}'", case.name);
        assert!(headlines.iter().all(|h| !h.title.trim().is_empty()));
    }
}
