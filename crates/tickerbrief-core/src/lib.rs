//! # Tickerbrief Core
//!
//! Domain types, the metrics engine, and the I/O collaborators behind the
//! daily ticker report.
//!
//! ## Overview
//!
//! The heart of this crate is [`summarize`]: a pure function from a
//! ticker's daily price history plus a sparse analyst-fundamentals
//! snapshot to a fixed-shape [`MetricsRecord`]. Data gaps degrade to
//! absent fields with a logged data-quality note; the engine's only hard
//! failure is a history with no usable close prices.
//!
//! Everything around the engine is deliberately thin: a provider adapter
//! fetches the inputs, a renderer turns records into a console table and
//! notification text, and a Telegram sink delivers the text best-effort.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo Finance) |
//! | [`config`] | YAML + environment configuration |
//! | [`data_source`] | Data source contract and request types |
//! | [`domain`] | Domain models (PriceBar, Fundamentals, MetricsRecord) |
//! | [`error`] | Validation and engine error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`metrics`] | The metrics engine (RSI, percent change, summarize) |
//! | [`notify`] | Telegram notification sink |
//! | [`report`] | Console table and notification rendering |
//!
//! ## Concurrency
//!
//! [`summarize`] is synchronous, stateless, and side-effect-free apart
//! from diagnostic logging; it is safe to call from multiple tasks. The
//! async surface lives entirely in the collaborators.

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod metrics;
pub mod notify;
pub mod report;

// Re-export commonly used types at the crate root.

pub use adapters::YahooDataSource;
pub use config::{AppConfig, ConfigError, TelegramConfig};
pub use data_source::{
    DataSource, FundamentalsRequest, HistoryRequest, SourceError, SourceErrorKind,
};
pub use domain::{Fundamentals, MetricsRecord, PriceBar, PriceSeries, Symbol, TradeDate};
pub use error::{MetricsError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use metrics::{percent_change, rsi, summarize, RSI_PERIOD};
pub use notify::{NotifyError, TelegramNotifier};
