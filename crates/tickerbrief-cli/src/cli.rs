//! CLI argument definitions for tickerbrief.
//!
//! # Output targets
//!
//! | Flag | Effect |
//! |------|--------|
//! | `--console` | Print the report table to stdout |
//! | `--telegram` | Send per-ticker messages via Telegram |
//!
//! With no target flag, the report goes to both targets (Telegram still
//! skips silently when no credentials are configured).
//!
//! # Examples
//!
//! ```bash
//! # Print the table and send Telegram messages
//! tickerbrief
//!
//! # Console only
//! tickerbrief --console
//!
//! # Explicit configuration file
//! tickerbrief --config ./watchlist.yml --telegram
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Daily ticker metrics report.
///
/// Fetches recent daily price history for the configured tickers, derives
/// momentum and analyst metrics per ticker, and renders the result as a
/// console table and as per-ticker chat notifications.
#[derive(Debug, Parser)]
#[command(name = "tickerbrief", author, version, about = "Daily ticker metrics report")]
pub struct Cli {
    /// Print the generated report to the console.
    #[arg(long, default_value_t = false)]
    pub console: bool,

    /// Send the generated report via Telegram.
    #[arg(long, default_value_t = false)]
    pub telegram: bool,

    /// Path to the YAML configuration file.
    ///
    /// Defaults to `config.yml`, or the `TICKERBRIEF_CONFIG` environment
    /// variable when set.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
