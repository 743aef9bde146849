use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, Weekday};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::data_source::{
    DailyClosesRequest, HeadlineRequest, HeadlineSource, Lookback, MarketDataSource, SourceError,
    SourceFuture,
};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, OfflineHttpClient};
use crate::throttling::RequestThrottle;
use crate::{
    CorporateAction, CorporateActionKind, FundamentalsSnapshot, HeadlineRecord, PricePoint,
    PriceSeries, Symbol, TradingDate,
};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const SUMMARY_MODULES: &str = "price,summaryDetail,defaultKeyStatistics";
const REFERER: &str = "https://finance.yahoo.com/";
const CRUMB_TTL: Duration = Duration::from_secs(60 * 60);

/// Transport settings of the Yahoo adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooSettings {
    pub requests_per_minute: u32,
    pub timeout_ms: u64,
    /// Longest the adapter waits for request budget before failing with
    /// `RateLimited`.
    pub max_throttle_wait_ms: u64,
}

impl Default for YahooSettings {
    fn default() -> Self {
        Self {
            requests_per_minute: 30,
            timeout_ms: 10_000,
            max_throttle_wait_ms: 2_000,
        }
    }
}

// ============================================================================
// Crumb handshake
// ============================================================================

#[derive(Debug, Clone)]
struct CachedCrumb {
    value: String,
    fetched_at: Instant,
}

/// Yahoo's quoteSummary endpoint wants a session cookie (kept by the
/// transport's cookie jar) plus a matching crumb query parameter.
#[derive(Debug, Default)]
pub struct YahooAuthManager {
    crumb: Mutex<Option<CachedCrumb>>,
}

impl YahooAuthManager {
    pub async fn crumb(&self, http_client: &Arc<dyn HttpClient>, timeout_ms: u64) -> Result<String, SourceError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            if crumb.fetched_at.elapsed() < CRUMB_TTL {
                return Ok(crumb.value.clone());
            }
        }

        let value = Self::fetch_crumb(http_client, timeout_ms).await?;
        *cached = Some(CachedCrumb {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }

    async fn fetch_crumb(http_client: &Arc<dyn HttpClient>, timeout_ms: u64) -> Result<String, SourceError> {
        let cookie_request = HttpRequest::get("https://fc.yahoo.com")
            .with_header("referer", REFERER)
            .with_timeout_ms(timeout_ms);
        http_client.execute(cookie_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to fetch Yahoo cookie: {}", e.message()))
        })?;

        for endpoint in [
            "https://query1.finance.yahoo.com/v1/test/getcrumb",
            "https://query2.finance.yahoo.com/v1/test/getcrumb",
        ] {
            let request = HttpRequest::get(endpoint)
                .with_header("referer", REFERER)
                .with_timeout_ms(timeout_ms);
            let Ok(response) = http_client.execute(request).await else {
                continue;
            };
            if response.status == 429 {
                return Err(SourceError::rate_limited("yahoo rate limited the crumb request"));
            }

            let body = response.body.trim();
            let looks_like_crumb = response.is_success()
                && !body.is_empty()
                && body.len() < 100
                && !body.contains(' ')
                && !body.contains('<');
            if looks_like_crumb {
                return Ok(body.to_owned());
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch Yahoo crumb from all endpoints",
        ))
    }
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo Finance adapter for quotes, corporate actions, fundamentals and news.
///
/// Built on a mock transport it serves deterministic fixtures instead, which
/// is what `--offline` and the test suite use.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    auth_manager: Arc<YahooAuthManager>,
    throttle: RequestThrottle,
    settings: YahooSettings,
    use_real_api: bool,
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, settings: YahooSettings) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            auth: env_auth().unwrap_or_default(),
            auth_manager: Arc::new(YahooAuthManager::default()),
            throttle: RequestThrottle::new(
                Duration::from_secs(60),
                settings.requests_per_minute,
                Duration::from_millis(settings.max_throttle_wait_ms),
            ),
            settings,
            use_real_api,
        }
    }

    /// Fixture-backed adapter that never touches the network.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineHttpClient), YahooSettings::default())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str, with_crumb: bool) -> Result<T, SourceError> {
        let body = self.fetch_body(url, with_crumb).await?;
        serde_json::from_str(&body)
            .map_err(|e| SourceError::internal(format!("failed to parse yahoo response: {e}")))
    }

    async fn fetch_body(&self, url: &str, with_crumb: bool) -> Result<String, SourceError> {
        let response = self.send(url, with_crumb).await?;

        let response = if with_crumb && (response.status == 401 || response.status == 429) {
            debug!(url, status = response.status, "refreshing yahoo crumb");
            self.auth_manager.invalidate().await;
            self.send(url, with_crumb).await?
        } else {
            response
        };

        match response.status {
            status if (200..300).contains(&status) => Ok(response.body),
            404 => Err(SourceError::not_found(format!("yahoo has no data for {url}"))),
            429 => Err(SourceError::rate_limited("yahoo returned status 429")),
            status => Err(SourceError::unavailable(format!(
                "yahoo returned status {status}"
            ))),
        }
    }

    async fn send(&self, url: &str, with_crumb: bool) -> Result<crate::http_client::HttpResponse, SourceError> {
        self.throttle.acquire().await.map_err(|wait| {
            SourceError::rate_limited(format!(
                "yahoo request budget exhausted; retry in {} ms",
                wait.as_millis()
            ))
        })?;

        let url = if with_crumb {
            let crumb = self
                .auth_manager
                .crumb(&self.http_client, self.settings.timeout_ms)
                .await?;
            format!("{url}&crumb={}", urlencoding::encode(&crumb))
        } else {
            url.to_owned()
        };

        debug!(url = %url, "yahoo request");
        let request = HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_auth(&self.auth)
            .with_timeout_ms(self.settings.timeout_ms);

        self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", error.message()))
            }
        })
    }

    async fn fetch_chart(&self, symbol: &Symbol, range: &str, events: bool) -> Result<ChartResult, SourceError> {
        let mut url = format!(
            "{CHART_URL}/{}?range={range}&interval=1d",
            urlencoding::encode(symbol.as_str())
        );
        if events {
            url.push_str("&events=div%2Csplit");
        }
        let envelope: ChartEnvelope = self.fetch_json(&url, false).await?;
        envelope.into_result(symbol)
    }
}

fn env_auth() -> Option<HttpAuth> {
    std::env::var("YAHOO_COOKIE")
        .ok()
        .filter(|cookie| !cookie.trim().is_empty())
        .map(HttpAuth::Cookie)
}

impl MarketDataSource for YahooAdapter {
    fn daily_closes<'a>(&'a self, req: DailyClosesRequest) -> SourceFuture<'a, Vec<PriceSeries>> {
        Box::pin(async move {
            if !self.use_real_api {
                return Ok(fake_daily_closes(&req));
            }

            let range = req.lookback.range_param();
            let mut series = Vec::with_capacity(req.symbols.len());
            let mut last_error = None;
            for symbol in &req.symbols {
                match self.fetch_chart(symbol, range, false).await {
                    Ok(result) => series.push(result.price_series(symbol.clone())),
                    Err(error) => {
                        warn!(symbol = %symbol, %error, "skipping symbol without history");
                        last_error = Some(error);
                    }
                }
            }

            match last_error {
                Some(error) if series.is_empty() => Err(error),
                _ => Ok(series),
            }
        })
    }

    fn corporate_actions<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Vec<CorporateAction>> {
        Box::pin(async move {
            if !self.use_real_api {
                return fake_corporate_actions(symbol);
            }
            let result = self.fetch_chart(symbol, "2y", true).await?;
            Ok(result.corporate_actions())
        })
    }

    fn fundamentals<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, FundamentalsSnapshot> {
        Box::pin(async move {
            if !self.use_real_api {
                return fake_fundamentals(symbol);
            }
            let url = format!(
                "{QUOTE_SUMMARY_URL}/{}?modules={SUMMARY_MODULES}",
                urlencoding::encode(symbol.as_str())
            );
            let body: Value = self.fetch_json(&url, true).await?;
            parse_quote_summary(&body, symbol)
        })
    }

    fn last_price<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Option<f64>> {
        Box::pin(async move {
            if !self.use_real_api {
                return fake_last_price(symbol);
            }
            let result = self.fetch_chart(symbol, "5d", false).await?;
            Ok(result.last_price())
        })
    }
}

impl HeadlineSource for YahooAdapter {
    fn headlines<'a>(&'a self, req: HeadlineRequest) -> SourceFuture<'a, Vec<HeadlineRecord>> {
        Box::pin(async move {
            if !self.use_real_api {
                return Ok(fake_headlines(&req));
            }
            let url = format!(
                "{SEARCH_URL}?q={}&quotesCount=0&newsCount={}&lang=pt-BR&region=BR",
                urlencoding::encode(&req.query),
                req.limit
            );
            let response: SearchResponse = self.fetch_json(&url, false).await?;
            Ok(response.into_headlines(req.limit))
        })
    }
}

// ============================================================================
// Yahoo Finance API response structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ApiError {
    fn into_source_error(self, symbol: &Symbol) -> SourceError {
        let description = self.description.unwrap_or_default();
        match self.code.as_deref() {
            Some("Not Found") => SourceError::not_found(format!("{symbol}: {description}")),
            _ => SourceError::unavailable(format!("yahoo API error for {symbol}: {description}")),
        }
    }
}

impl ChartEnvelope {
    fn into_result(self, symbol: &Symbol) -> Result<ChartResult, SourceError> {
        if let Some(error) = self.chart.error {
            return Err(error.into_source_error(symbol));
        }
        self.chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| SourceError::not_found(format!("no chart data for {symbol}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
    #[serde(default)]
    events: Option<ChartEvents>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
    #[serde(rename = "gmtoffset", default)]
    gmt_offset: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
    #[serde(default)]
    adjclose: Vec<ChartAdjClose>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ChartEvents {
    #[serde(default)]
    dividends: HashMap<String, DividendEvent>,
    #[serde(default)]
    splits: HashMap<String, SplitEvent>,
}

#[derive(Debug, Clone, Deserialize)]
struct DividendEvent {
    #[serde(default)]
    amount: Option<f64>,
    date: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct SplitEvent {
    date: i64,
}

impl ChartResult {
    /// Adjusted closes when Yahoo provides them, raw closes otherwise.
    fn closes(&self) -> &[Option<f64>] {
        match self.indicators.adjclose.first() {
            Some(adjusted) if !adjusted.adjclose.is_empty() => &adjusted.adjclose,
            _ => self
                .indicators
                .quote
                .first()
                .map(|quote| quote.close.as_slice())
                .unwrap_or_default(),
        }
    }

    fn price_series(&self, symbol: Symbol) -> PriceSeries {
        let points = self
            .timestamp
            .iter()
            .zip(self.closes())
            .filter_map(|(ts, close)| {
                let date = TradingDate::from_unix_timestamp(*ts, self.meta.gmt_offset).ok()?;
                Some(PricePoint::new(date, (*close)?))
            })
            .collect();
        PriceSeries::new(symbol, points)
    }

    fn last_price(&self) -> Option<f64> {
        self.meta
            .regular_market_price
            .filter(|price| price.is_finite())
            .or_else(|| self.closes().iter().rev().find_map(|close| *close))
    }

    fn corporate_actions(&self) -> Vec<CorporateAction> {
        let Some(events) = &self.events else {
            return Vec::new();
        };
        let offset = self.meta.gmt_offset;

        let dividends = events.dividends.values().filter_map(|event| {
            let ex_date = TradingDate::from_unix_timestamp(event.date, offset).ok()?;
            Some(CorporateAction {
                ex_date,
                kind: CorporateActionKind::Dividend,
                cash_amount: event.amount,
            })
        });
        let splits = events.splits.values().filter_map(|event| {
            TradingDate::from_unix_timestamp(event.date, offset)
                .ok()
                .map(CorporateAction::split)
        });

        let mut actions: Vec<CorporateAction> = dividends.chain(splits).collect();
        actions.sort_by_key(|action| action.ex_date);
        actions
    }
}

fn raw_number(module: Option<&Value>, key: &str) -> Option<f64> {
    let field = module?.get(key)?;
    let value = match field {
        Value::Object(map) => map.get("raw")?.as_f64()?,
        other => other.as_f64()?,
    };
    value.is_finite().then_some(value)
}

fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

fn parse_quote_summary(body: &Value, symbol: &Symbol) -> Result<FundamentalsSnapshot, SourceError> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| SourceError::internal("quoteSummary envelope missing"))?;

    if let Some(error) = summary.get("error").filter(|error| !error.is_null()) {
        let error: ApiError = serde_json::from_value(error.clone())
            .map_err(|e| SourceError::internal(format!("malformed yahoo error: {e}")))?;
        return Err(error.into_source_error(symbol));
    }

    let result = summary
        .pointer("/result/0")
        .ok_or_else(|| SourceError::not_found(format!("no quote summary for {symbol}")))?;

    let price = result.get("price");
    let detail = result.get("summaryDetail");
    let statistics = result.get("defaultKeyStatistics");

    let field_count = [price, detail, statistics]
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flat_map(|module| module.iter())
        .filter(|(key, value)| key.as_str() != "maxAge" && is_populated(value))
        .count();

    Ok(FundamentalsSnapshot {
        long_name: price
            .and_then(|module| module.get("longName"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        regular_market_price: raw_number(price, "regularMarketPrice"),
        forward_multiple: raw_number(detail, "forwardPE")
            .or_else(|| raw_number(statistics, "forwardPE")),
        trailing_multiple: raw_number(detail, "trailingPE"),
        price_to_book: raw_number(statistics, "priceToBook"),
        book_value_per_share: raw_number(statistics, "bookValue"),
        field_count,
    })
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchNews {
    title: String,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(rename = "providerPublishTime", default)]
    provider_publish_time: Option<i64>,
}

impl SearchResponse {
    fn into_headlines(self, limit: usize) -> Vec<HeadlineRecord> {
        let mut news = self.news;
        news.sort_by(|a, b| b.provider_publish_time.cmp(&a.provider_publish_time));
        news.into_iter()
            .filter(|item| !item.title.trim().is_empty())
            .take(limit)
            .map(|item| HeadlineRecord {
                published: item
                    .provider_publish_time
                    .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
                    .and_then(|ts| ts.format(&Rfc3339).ok()),
                title: item.title,
                source: item.publisher,
                url: item.link.unwrap_or_default(),
            })
            .collect()
    }
}

// ============================================================================
// Offline fixtures
// ============================================================================

const FIXTURE_CATALOG: &[(&str, &str)] = &[
    ("PETR4.SA", "Petróleo Brasileiro S.A. - Petrobras"),
    ("VALE3.SA", "Vale S.A."),
    ("ITUB4.SA", "Itaú Unibanco Holding S.A."),
    ("BBDC4.SA", "Banco Bradesco S.A."),
    ("BBAS3.SA", "Banco do Brasil S.A."),
    ("MGLU3.SA", "Magazine Luiza S.A."),
    ("VIIA3.SA", "Via S.A."),
    ("HAPV3.SA", "Hapvida Participações e Investimentos S.A."),
    ("WEGE3.SA", "WEG S.A."),
    ("RENT3.SA", "Localiza Rent a Car S.A."),
    ("PRIO3.SA", "PRIO S.A."),
    ("SUZB3.SA", "Suzano S.A."),
    ("GGBR4.SA", "Gerdau S.A."),
    ("CSNA3.SA", "Companhia Siderúrgica Nacional"),
    ("ELET3.SA", "Centrais Elétricas Brasileiras S.A. - Eletrobrás"),
];

const FIXTURE_HEADLINES: &[&str] = &[
    "{T} anuncia lucro recorde no trimestre",
    "Conselho da {T} aprova pagamento de juros sobre capital próprio",
    "Ações da {T} recuam após alerta sobre dívida",
    "{T} fecha acordo de parceria para expansão",
    "Analistas veem risco de queda para {T}",
    "{T} divulga fato relevante sobre assembleia",
    "Receita da {T} supera estimativas",
    "{T} sofre multa e enfrenta investigação",
    "{T} mantém guidance para o ano",
];

fn fixture_name(symbol: &Symbol) -> Option<&'static str> {
    FIXTURE_CATALOG
        .iter()
        .find(|(ticker, _)| *ticker == symbol.as_str())
        .map(|(_, name)| *name)
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}

fn trailing_sessions(end: TradingDate, count: usize) -> Vec<TradingDate> {
    let mut sessions = Vec::with_capacity(count);
    let mut date = end;
    while sessions.len() < count {
        let weekday = date.into_inner().weekday();
        if weekday != Weekday::Saturday && weekday != Weekday::Sunday {
            sessions.push(date);
        }
        date = date.previous_day();
    }
    sessions.reverse();
    sessions
}

fn fixture_sessions(lookback: Lookback) -> usize {
    match lookback {
        Lookback::TwoDays => 2,
        Lookback::TwoYears => 504,
    }
}

/// Deterministic close path: a per-symbol base level with a slow cycle and a
/// mild drift. Every lookback shares the same most recent closes.
fn fixture_series(symbol: &Symbol, sessions: usize) -> Option<PriceSeries> {
    fixture_name(symbol)?;
    let seed = symbol_seed(symbol);
    let base = 8.0 + (seed % 600) as f64 / 10.0;
    let phase = (seed % 17) as f64;
    let drift = ((seed % 9) as f64 - 4.0) / 10_000.0;

    let dates = trailing_sessions(TradingDate::today(), sessions);
    let points = dates
        .iter()
        .enumerate()
        .map(|(index, date)| {
            let age = (sessions - index) as f64;
            let cycle = 0.12 * ((phase - age) / 23.0).sin() + 0.03 * ((phase - age) / 3.0).cos();
            let close = base * (1.0 + cycle - drift * age);
            PricePoint::new(*date, (close * 100.0).round() / 100.0)
        })
        .collect();

    Some(PriceSeries::new(symbol.clone(), points))
}

fn fake_daily_closes(req: &DailyClosesRequest) -> Vec<PriceSeries> {
    let sessions = fixture_sessions(req.lookback);
    req.symbols
        .iter()
        .filter_map(|symbol| fixture_series(symbol, sessions))
        .collect()
}

fn fake_last_price(symbol: &Symbol) -> Result<Option<f64>, SourceError> {
    let series = fixture_series(symbol, 1)
        .ok_or_else(|| SourceError::not_found(format!("no fixture for {symbol}")))?;
    Ok(series.last().map(|point| point.close))
}

fn fake_corporate_actions(symbol: &Symbol) -> Result<Vec<CorporateAction>, SourceError> {
    let price = fake_last_price(symbol)?.unwrap_or_default();
    let seed = symbol_seed(symbol);
    if seed % 5 == 0 {
        return Ok(Vec::new());
    }

    let today = TradingDate::today();
    let quarterly = price * (0.004 + (seed % 11) as f64 / 1_000.0);
    let mut actions: Vec<CorporateAction> = [500_u32, 300, 210, 120, 30]
        .into_iter()
        .map(|days| {
            CorporateAction::dividend(today.days_before(days), (quarterly * 100.0).round() / 100.0)
        })
        .collect();
    if seed % 3 == 0 {
        actions.push(CorporateAction::split(today.days_before(400)));
    }
    actions.sort_by_key(|action| action.ex_date);
    Ok(actions)
}

fn fake_fundamentals(symbol: &Symbol) -> Result<FundamentalsSnapshot, SourceError> {
    let name = fixture_name(symbol)
        .ok_or_else(|| SourceError::not_found(format!("no fixture for {symbol}")))?;
    let price = fake_last_price(symbol)?;
    let seed = symbol_seed(symbol);

    let forward = 4.0 + (seed % 120) as f64 / 10.0;
    let price_to_book = 0.8 + (seed % 30) as f64 / 10.0;
    Ok(FundamentalsSnapshot {
        long_name: Some(name.to_owned()),
        regular_market_price: price,
        forward_multiple: (seed % 6 != 0).then_some(forward),
        trailing_multiple: Some(forward + 1.5),
        price_to_book: Some(price_to_book),
        book_value_per_share: price.map(|price| price / price_to_book),
        field_count: 42,
    })
}

fn fake_headlines(req: &HeadlineRequest) -> Vec<HeadlineRecord> {
    let query = req.query.to_uppercase();
    let Some((ticker, _)) = FIXTURE_CATALOG
        .iter()
        .find(|(ticker, _)| query.contains(ticker.trim_end_matches(".SA")))
    else {
        return Vec::new();
    };
    let display = ticker.trim_end_matches(".SA");
    let seed = ticker.bytes().map(u64::from).sum::<u64>() as usize;

    (0..FIXTURE_HEADLINES.len())
        .map(|index| FIXTURE_HEADLINES[(seed + index) % FIXTURE_HEADLINES.len()])
        .take(req.limit)
        .enumerate()
        .map(|(index, template)| HeadlineRecord {
            title: template.replace("{T}", display),
            source: Some(String::from("Pulso Fixtures")),
            published: None,
            url: format!("https://fixtures.invalid/{display}/{index}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex as StdMutex;

    /// Serves canned bodies by URL substring and records every request.
    struct CannedHttpClient {
        routes: Vec<(&'static str, HttpResponse)>,
        requests: StdMutex<Vec<HttpRequest>>,
    }

    impl CannedHttpClient {
        fn new(routes: Vec<(&'static str, HttpResponse)>) -> Self {
            Self {
                routes,
                requests: StdMutex::new(Vec::new()),
            }
        }

        fn recorded_urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .iter()
                .map(|request| request.url.clone())
                .collect()
        }
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let response = self
                .routes
                .iter()
                .find(|(pattern, _)| request.url.contains(pattern))
                .map(|(_, response)| response.clone())
                .ok_or_else(|| HttpError::new(format!("no route for {}", request.url)));
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            Box::pin(async move { response })
        }
    }

    const CHART_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"regularMarketPrice": 38.9, "gmtoffset": -10800},
                "timestamp": [1717419600, 1717506000, 1717592400],
                "indicators": {
                    "quote": [{"close": [37.5, null, 38.9]}],
                    "adjclose": [{"adjclose": [37.0, null, 38.9]}]
                },
                "events": {
                    "dividends": {
                        "1717419600": {"amount": 0.45, "date": 1717419600},
                        "1701694800": {"amount": 1.2, "date": 1701694800}
                    },
                    "splits": {
                        "1709643600": {"date": 1709643600, "numerator": 2, "denominator": 1}
                    }
                }
            }],
            "error": null
        }
    }"#;

    const SUMMARY_BODY: &str = r#"{
        "quoteSummary": {
            "result": [{
                "price": {
                    "maxAge": 1,
                    "longName": "Petróleo Brasileiro S.A. - Petrobras",
                    "regularMarketPrice": {"raw": 38.9, "fmt": "38.90"},
                    "currency": "BRL",
                    "exchangeName": "São Paulo"
                },
                "summaryDetail": {
                    "forwardPE": {},
                    "trailingPE": {"raw": 5.1, "fmt": "5.10"},
                    "dividendYield": {"raw": 0.12}
                },
                "defaultKeyStatistics": {
                    "priceToBook": {"raw": 1.3},
                    "bookValue": {"raw": 29.9}
                }
            }],
            "error": null
        }
    }"#;

    fn adapter_with(routes: Vec<(&'static str, HttpResponse)>) -> (YahooAdapter, Arc<CannedHttpClient>) {
        let client = Arc::new(CannedHttpClient::new(routes));
        let adapter = YahooAdapter::new(client.clone(), YahooSettings::default());
        (adapter, client)
    }

    fn petr4() -> Symbol {
        Symbol::parse("PETR4.SA").expect("valid")
    }

    #[tokio::test]
    async fn chart_closes_use_adjusted_values_and_skip_gaps() {
        let (adapter, client) = adapter_with(vec![("/v8/finance/chart", HttpResponse::ok_json(CHART_BODY))]);
        let request =
            DailyClosesRequest::new(vec![petr4()], Lookback::TwoYears).expect("valid request");

        let series = adapter.daily_closes(request).await.expect("history");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].closes(), vec![37.0, 38.9]);
        assert_eq!(series[0].points()[0].date.format_iso(), "2024-06-03");
        assert!(client.recorded_urls()[0].contains("range=2y"));
    }

    #[tokio::test]
    async fn chart_events_become_corporate_actions() {
        let (adapter, _) = adapter_with(vec![("/v8/finance/chart", HttpResponse::ok_json(CHART_BODY))]);

        let actions = adapter.corporate_actions(&petr4()).await.expect("actions");
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].paid_amount(), Some(1.2));
        assert_eq!(actions[1].kind, CorporateActionKind::Split);
        assert_eq!(actions[2].paid_amount(), Some(0.45));
    }

    #[tokio::test]
    async fn last_price_comes_from_chart_meta() {
        let (adapter, _) = adapter_with(vec![("/v8/finance/chart", HttpResponse::ok_json(CHART_BODY))]);
        assert_eq!(adapter.last_price(&petr4()).await, Ok(Some(38.9)));
    }

    #[tokio::test]
    async fn chart_not_found_maps_to_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let (adapter, _) = adapter_with(vec![("/v8/finance/chart", HttpResponse::ok_json(body))]);

        let error = adapter.last_price(&petr4()).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NotFound);
    }

    #[tokio::test]
    async fn quote_summary_is_fetched_with_crumb() {
        let (adapter, client) = adapter_with(vec![
            ("fc.yahoo.com", HttpResponse { status: 404, body: String::new() }),
            ("getcrumb", HttpResponse::ok_json("abc/123")),
            ("quoteSummary", HttpResponse::ok_json(SUMMARY_BODY)),
        ]);

        let snapshot = adapter.fundamentals(&petr4()).await.expect("fundamentals");
        assert_eq!(snapshot.regular_market_price, Some(38.9));
        assert_eq!(snapshot.forward_multiple, None);
        assert_eq!(snapshot.earnings_multiple(), Some(5.1));
        assert_eq!(snapshot.price_to_book, Some(1.3));
        assert_eq!(snapshot.book_value_per_share, Some(29.9));
        assert_eq!(snapshot.field_count, 8);
        assert!(snapshot.is_recognized(5));

        let urls = client.recorded_urls();
        let summary_url = urls
            .iter()
            .find(|url| url.contains("quoteSummary"))
            .expect("summary request");
        assert!(summary_url.ends_with("&crumb=abc%2F123"));
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable() {
        let (adapter, _) = adapter_with(Vec::new());
        let error = adapter.last_price(&petr4()).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn search_news_become_headlines_most_recent_first() {
        let body = r#"{"news": [
            {"title": "Petrobras aprova dividendos", "publisher": "Valor", "link": "https://n/1", "providerPublishTime": 1717419600},
            {"title": "Petrobras em queda", "publisher": "Exame", "link": "https://n/2", "providerPublishTime": 1717506000},
            {"title": "  ", "link": "https://n/3", "providerPublishTime": 1717000000}
        ]}"#;
        let (adapter, client) = adapter_with(vec![("/v1/finance/search", HttpResponse::ok_json(body))]);
        let request = HeadlineRequest::new("\"Fato Relevante\" PETR4", 7).expect("valid");

        let headlines = adapter.headlines(request).await.expect("headlines");
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Petrobras em queda");
        assert_eq!(headlines[0].published.as_deref(), Some("2024-06-04T13:00:00Z"));
        assert!(client.recorded_urls()[0].contains("newsCount=7"));
    }

    #[tokio::test]
    async fn offline_mode_serves_catalog_fixtures() {
        let adapter = YahooAdapter::offline();

        let request = DailyClosesRequest::new(
            vec![petr4(), Symbol::parse("ZZZZ3.SA").expect("valid")],
            Lookback::TwoDays,
        )
        .expect("valid request");
        let series = adapter.daily_closes(request).await.expect("fixtures");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].len(), 2);

        let snapshot = adapter.fundamentals(&petr4()).await.expect("fixture");
        assert!(snapshot.is_recognized(5));

        let unknown = adapter
            .fundamentals(&Symbol::parse("ZZZZ3.SA").expect("valid"))
            .await
            .expect_err("unknown fixture");
        assert_eq!(unknown.kind(), SourceErrorKind::NotFound);
    }

    #[tokio::test]
    async fn offline_histories_agree_on_latest_close() {
        let adapter = YahooAdapter::offline();
        let short = adapter
            .daily_closes(DailyClosesRequest::new(vec![petr4()], Lookback::TwoDays).expect("valid"))
            .await
            .expect("short");
        let long = adapter
            .daily_closes(DailyClosesRequest::new(vec![petr4()], Lookback::TwoYears).expect("valid"))
            .await
            .expect("long");

        assert_eq!(long[0].len(), 504);
        assert_eq!(short[0].last(), long[0].last());
        assert_eq!(adapter.last_price(&petr4()).await, Ok(long[0].last().map(|p| p.close)));
    }

    #[tokio::test]
    async fn offline_headlines_follow_query_ticker() {
        let adapter = YahooAdapter::offline();
        let request = HeadlineRequest::new("notícias VALE3 B3", 7).expect("valid");

        let headlines = adapter.headlines(request).await.expect("fixture");
        assert_eq!(headlines.len(), 7);
        assert!(headlines.iter().all(|item| item.title.contains("VALE3")));
    }

    #[test]
    fn trailing_sessions_skip_weekends() {
        // 2024-06-10 is a Monday.
        let monday = TradingDate::from_ymd(2024, 6, 10).expect("valid");
        let sessions = trailing_sessions(monday, 3);
        let iso: Vec<String> = sessions.iter().map(|d| d.format_iso()).collect();
        assert_eq!(iso, vec!["2024-06-06", "2024-06-07", "2024-06-10"]);
    }
}
