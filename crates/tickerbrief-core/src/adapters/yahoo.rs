//! Yahoo Finance adapter.
//!
//! Daily bars come from the `v8/finance/chart` endpoint; the analyst
//! fundamentals snapshot comes from `v10/finance/quoteSummary` with the
//! `financialData` module, which requires Yahoo's cookie/crumb handshake:
//!
//! 1. a session cookie from `fc.yahoo.com`
//! 2. a crumb token from `v1/test/getcrumb`
//!
//! The crumb is cached with a TTL and refreshed once when the upstream
//! answers 401/429.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::data_source::{DataSource, FundamentalsRequest, HistoryRequest, SourceError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::{Fundamentals, PriceBar, PriceSeries, Symbol, TradeDate};

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_BASE: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const COOKIE_ENDPOINT: &str = "https://fc.yahoo.com";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const REFERER: &str = "https://finance.yahoo.com/";
const REQUEST_TIMEOUT_MS: u64 = 10_000;
const CRUMB_TTL: Duration = Duration::from_secs(3_600);

#[derive(Default)]
struct CrumbState {
    crumb: Option<String>,
    fetched_at: Option<Instant>,
}

/// Cached crumb token for authenticated quoteSummary calls.
struct CrumbManager {
    state: Mutex<CrumbState>,
    ttl: Duration,
}

impl CrumbManager {
    fn new(ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CrumbState::default()),
            ttl,
        }
    }

    fn cached(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        let fresh = state
            .fetched_at
            .is_some_and(|fetched_at| fetched_at.elapsed() < self.ttl);
        if fresh { state.crumb.clone() } else { None }
    }

    fn invalidate(&self) {
        let mut state = self.state.lock().unwrap();
        state.crumb = None;
        state.fetched_at = None;
    }

    async fn get(&self, http: &Arc<dyn HttpClient>) -> Result<String, SourceError> {
        if let Some(crumb) = self.cached() {
            return Ok(crumb);
        }

        // Seed the cookie jar first; the crumb endpoints reject cookieless
        // sessions.
        let cookie_request = HttpRequest::get(COOKIE_ENDPOINT)
            .with_header("referer", REFERER)
            .with_timeout_ms(REQUEST_TIMEOUT_MS);
        http.execute(cookie_request).await.map_err(|error| {
            SourceError::unavailable(format!("failed to fetch yahoo cookie: {}", error.message()))
        })?;

        for endpoint in CRUMB_ENDPOINTS {
            let crumb_request = HttpRequest::get(endpoint)
                .with_header("referer", REFERER)
                .with_timeout_ms(REQUEST_TIMEOUT_MS);

            let response = match http.execute(crumb_request).await {
                Ok(response) if response.is_success() && !response.body.is_empty() => response,
                _ => continue,
            };

            let body = response.body.trim();
            if body.contains("<html") || body.contains("<!DOCTYPE") {
                continue;
            }
            if body.to_lowercase().contains("too many requests") {
                return Err(SourceError::rate_limited(
                    "yahoo rate limited while fetching crumb",
                ));
            }
            if !body.is_empty() && body.len() < 100 && !body.contains(' ') {
                let mut state = self.state.lock().unwrap();
                state.crumb = Some(body.to_owned());
                state.fetched_at = Some(Instant::now());
                return Ok(body.to_owned());
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch yahoo crumb from all endpoints",
        ))
    }
}

/// Yahoo Finance data source.
pub struct YahooDataSource {
    http: Arc<dyn HttpClient>,
    crumb: CrumbManager,
}

impl YahooDataSource {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            crumb: CrumbManager::new(CRUMB_TTL),
        }
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let request = HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_timeout_ms(REQUEST_TIMEOUT_MS);

        self.http.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
        })
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        let url = format!(
            "{CHART_BASE}/{}?range={}&interval=1d",
            urlencoding::encode(req.symbol.as_str()),
            range_for(req.limit),
        );

        let response = self.get(&url).await?;
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo chart returned status {}",
                response.status
            )));
        }

        parse_chart(&response.body, &req.symbol, req.limit)
    }

    async fn fetch_fundamentals(
        &self,
        req: &FundamentalsRequest,
    ) -> Result<Fundamentals, SourceError> {
        let crumb = self.crumb.get(&self.http).await?;
        let mut response = self.get(&summary_url(&req.symbol, &crumb)).await?;

        // A stale crumb answers 401/429; refresh the session once and retry.
        if response.status == 401 || response.status == 429 {
            self.crumb.invalidate();
            let crumb = self.crumb.get(&self.http).await?;
            response = self.get(&summary_url(&req.symbol, &crumb)).await?;
        }

        if !response.is_success() {
            let message = format!("yahoo quoteSummary returned status {}", response.status);
            return Err(if response.status == 429 {
                SourceError::rate_limited(message)
            } else {
                SourceError::unavailable(message)
            });
        }

        parse_fundamentals(&response.body)
    }
}

impl DataSource for YahooDataSource {
    fn id(&self) -> &'static str {
        "yahoo"
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_history(&req).await })
    }

    fn fundamentals<'a>(
        &'a self,
        req: FundamentalsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Fundamentals, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_fundamentals(&req).await })
    }
}

/// Chart range wide enough to cover `limit` trading days plus weekend and
/// holiday gaps.
fn range_for(limit: usize) -> &'static str {
    match limit {
        0..=45 => "3mo",
        46..=100 => "6mo",
        101..=230 => "1y",
        _ => "5y",
    }
}

fn summary_url(symbol: &Symbol, crumb: &str) -> String {
    format!(
        "{QUOTE_SUMMARY_BASE}/{}?modules=financialData&crumb={}",
        urlencoding::encode(symbol.as_str()),
        urlencoding::encode(crumb),
    )
}

fn parse_chart(body: &str, symbol: &Symbol, limit: usize) -> Result<PriceSeries, SourceError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|error| SourceError::internal(format!("failed to parse yahoo chart: {error}")))?;

    if let Some(error) = response.chart.error {
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {}",
            error.describe()
        )));
    }

    let result = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::internal("no chart data in response"))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::internal("no quote data in chart response"))?;

    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
    for (index, &timestamp) in timestamps.iter().enumerate() {
        // Yahoo emits null OHLC slots for halted days; skip them.
        let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(index),
            quote.high.get(index),
            quote.low.get(index),
            quote.close.get(index),
        ) else {
            continue;
        };

        let Ok(date) = TradeDate::from_unix_timestamp(timestamp) else {
            continue;
        };
        // The live session shows up as a second bar on the latest day.
        if bars.last().is_some_and(|prev| prev.date >= date) {
            continue;
        }

        let volume = quote
            .volume
            .get(index)
            .copied()
            .flatten()
            .and_then(|value| u64::try_from(value).ok());

        if let Ok(bar) = PriceBar::new(date, *open, *high, *low, *close, volume) {
            bars.push(bar);
        }
    }

    if bars.is_empty() {
        return Err(SourceError::unavailable(format!(
            "no historical data returned for {symbol}"
        )));
    }

    if bars.len() > limit {
        bars.drain(..bars.len() - limit);
    }

    PriceSeries::new(symbol.clone(), bars)
        .map_err(|error| SourceError::internal(error.to_string()))
}

fn parse_fundamentals(body: &str) -> Result<Fundamentals, SourceError> {
    let response: QuoteSummaryResponse = serde_json::from_str(body).map_err(|error| {
        SourceError::internal(format!("failed to parse yahoo fundamentals: {error}"))
    })?;

    if let Some(error) = response.quote_summary.error {
        return Err(SourceError::unavailable(format!(
            "yahoo quoteSummary API error: {}",
            error.describe()
        )));
    }

    let Some(financial) = response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|result| result.financial_data)
    else {
        return Ok(Fundamentals::default());
    };

    let recommendation = financial
        .recommendation_key
        .map(|key| key.trim().replace('_', " "))
        .filter(|key| !key.is_empty());

    Fundamentals::new(
        recommendation,
        financial.target_mean_price.and_then(|v| v.to_option()),
        financial.target_median_price.and_then(|v| v.to_option()),
        financial.target_high_price.and_then(|v| v.to_option()),
    )
    .map_err(|error| SourceError::internal(error.to_string()))
}

// Yahoo Finance wire structures.

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryData,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialData>,
}

#[derive(Debug, Deserialize)]
struct FinancialData {
    #[serde(rename = "recommendationKey", default)]
    recommendation_key: Option<String>,
    #[serde(rename = "targetMeanPrice", default)]
    target_mean_price: Option<RawValue>,
    #[serde(rename = "targetMedianPrice", default)]
    target_median_price: Option<RawValue>,
    #[serde(rename = "targetHighPrice", default)]
    target_high_price: Option<RawValue>,
}

/// Yahoo wraps numeric values in `{raw, fmt}` objects.
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl RawValue {
    fn to_option(&self) -> Option<f64> {
        self.raw.filter(|value| value.is_finite() && *value > 0.0)
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ApiError {
    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(code), None) => code.clone(),
            (None, Some(description)) => description.clone(),
            (None, None) => String::from("unknown error"),
        }
    }
}
