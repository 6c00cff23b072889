//! The report run: fetch, summarize, render, deliver.
//!
//! Per-ticker failures (fetch or structural) are logged and skipped so one
//! bad symbol never sinks the run; only a fully empty result set is
//! terminal.

use std::sync::Arc;

use thiserror::Error;

use tickerbrief_core::{
    report, summarize, AppConfig, DataSource, Fundamentals, FundamentalsRequest, HistoryRequest,
    HttpClient, MetricsError, MetricsRecord, ReqwestHttpClient, SourceError, Symbol,
    TelegramNotifier, YahooDataSource,
};

use crate::cli::Cli;
use crate::error::CliError;

/// Why a single ticker dropped out of the report.
#[derive(Debug, Error)]
enum TickerError {
    #[error(transparent)]
    Fetch(#[from] SourceError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let targets_specified = cli.console || cli.telegram;
    let to_console = cli.console || !targets_specified;
    let to_telegram = cli.telegram || !targets_specified;

    let AppConfig {
        tickers,
        days,
        telegram,
    } = AppConfig::load(cli.config.as_deref())?;

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let source = YahooDataSource::new(Arc::clone(&http));
    let notifier = to_telegram.then(|| TelegramNotifier::new(Arc::clone(&http), telegram));

    let mut records = Vec::with_capacity(tickers.len());
    for ticker in &tickers {
        match process_ticker(&source, ticker, days).await {
            Ok(record) => records.push(record),
            Err(error) => {
                tracing::warn!(%ticker, %error, "failed to process ticker");
            }
        }
    }

    if records.is_empty() {
        return Err(CliError::EmptyReport);
    }

    if to_console {
        println!("{}", report::format_table(&records));
    }

    if let Some(notifier) = notifier {
        for message in report::notification_messages(&records) {
            if let Err(error) = notifier.send(&message).await {
                tracing::warn!(%error, "failed to deliver telegram message");
            }
        }
    }

    Ok(())
}

/// Fetch one ticker's inputs and derive its metrics record.
///
/// History is fetched with one extra bar beyond the analysis window so the
/// 30-day momentum baseline is available at the default configuration.
/// Fundamentals are best-effort and degrade to empty on failure.
async fn process_ticker(
    source: &dyn DataSource,
    ticker: &Symbol,
    days: usize,
) -> Result<MetricsRecord, TickerError> {
    tracing::info!(%ticker, source = source.id(), "fetching data");

    let history_request = HistoryRequest::new(ticker.clone(), days + 1)?;
    let history = source.daily_history(history_request).await?;

    let fundamentals = match source
        .fundamentals(FundamentalsRequest::new(ticker.clone()))
        .await
    {
        Ok(fundamentals) => fundamentals,
        Err(error) => {
            tracing::warn!(%ticker, %error, "failed to fetch fundamentals");
            Fundamentals::default()
        }
    };

    Ok(summarize(ticker, &history, &fundamentals)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use tickerbrief_core::{PriceBar, PriceSeries, TradeDate};

    /// Deterministic in-memory source: history succeeds for everything
    /// except the `FAIL` symbol, fundamentals always error.
    struct StubSource;

    fn stub_series(symbol: &Symbol, bars: usize) -> PriceSeries {
        let bars = (0..bars)
            .map(|index| {
                let date = TradeDate::from(
                    time::Date::from_ordinal_date(2024, index as u16 + 1)
                        .expect("valid ordinal day"),
                );
                let close = 100.0 + index as f64;
                PriceBar::new(date, close, close + 1.0, close - 1.0, close, Some(1_000))
                    .expect("valid stub bar")
            })
            .collect();
        PriceSeries::new(symbol.clone(), bars).expect("valid stub series")
    }

    impl DataSource for StubSource {
        fn id(&self) -> &'static str {
            "stub"
        }

        fn daily_history<'a>(
            &'a self,
            req: HistoryRequest,
        ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
            Box::pin(async move {
                if req.symbol.as_str() == "FAIL" {
                    return Err(SourceError::unavailable("stub outage"));
                }
                Ok(stub_series(&req.symbol, req.limit))
            })
        }

        fn fundamentals<'a>(
            &'a self,
            _req: FundamentalsRequest,
        ) -> Pin<Box<dyn Future<Output = Result<Fundamentals, SourceError>> + Send + 'a>> {
            Box::pin(async move { Err(SourceError::unavailable("fundamentals outage")) })
        }
    }

    #[tokio::test]
    async fn process_ticker_produces_a_full_record() {
        let ticker = Symbol::parse("AAPL").expect("valid symbol");
        let record = process_ticker(&StubSource, &ticker, 30)
            .await
            .expect("record should be produced");

        // 31 bars: latest close 130, 30 days back 100.
        assert_eq!(record.price, Some(130.0));
        assert!(record.change_30d_pct.is_some());
        assert!(record.rsi14.is_some());
    }

    #[tokio::test]
    async fn fundamentals_outage_degrades_instead_of_failing() {
        let ticker = Symbol::parse("MSFT").expect("valid symbol");
        let record = process_ticker(&StubSource, &ticker, 30)
            .await
            .expect("record should be produced");

        assert_eq!(record.rating, None);
        assert_eq!(record.target, None);
    }

    #[tokio::test]
    async fn history_outage_fails_the_ticker() {
        let ticker = Symbol::parse("FAIL").expect("valid symbol");
        let error = process_ticker(&StubSource, &ticker, 30)
            .await
            .expect_err("outage must fail the ticker");
        assert!(matches!(error, TickerError::Fetch(_)));
    }
}
