//! Metric derivation over a bounded window of daily closes.
//!
//! [`summarize`] is a pure function from (ticker, price history, analyst
//! fundamentals) to a [`MetricsRecord`]. Missing history or fundamentals
//! degrade individual fields to absent; the only hard failure is a close
//! sequence with nothing usable in it.

use crate::{Fundamentals, MetricsError, MetricsRecord, PriceSeries, Symbol};

/// Lookback period for the Relative Strength Index.
pub const RSI_PERIOD: usize = 14;

/// Momentum windows, in trading days, measured against the latest close.
const CHANGE_WINDOWS: [usize; 2] = [10, 30];

/// Relative Strength Index over the trailing `period` differences.
///
/// Returns `None` when fewer than `period + 1` closes are supplied, or when
/// the result is not finite. A window with no losses saturates at 100.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if closes.len() < period + 1 {
        tracing::warn!(
            needed = period + 1,
            have = closes.len(),
            "not enough data to compute RSI"
        );
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let recent = &deltas[deltas.len() - period..];

    let avg_gain = recent.iter().map(|delta| delta.max(0.0)).sum::<f64>() / period as f64;
    let avg_loss = recent.iter().map(|delta| (-delta).max(0.0)).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    let value = 100.0 - 100.0 / (1.0 + rs);
    value.is_finite().then_some(value)
}

/// Percent change from `previous` to `current`.
///
/// An absent or zero baseline yields `None`: zero-previous is routine for
/// newly listed or sparse-data instruments and must not abort a run.
pub fn percent_change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let current = current?;
    let previous = previous.filter(|value| *value != 0.0)?;
    let change = (current - previous) / previous * 100.0;
    change.is_finite().then_some(change)
}

/// Compute the full per-ticker metrics record.
///
/// Fails only when the close sequence is empty after dropping non-finite
/// values; every other gap resolves to an absent field with a warn-level
/// data-quality note.
pub fn summarize(
    ticker: &Symbol,
    series: &PriceSeries,
    fundamentals: &Fundamentals,
) -> Result<MetricsRecord, MetricsError> {
    let closes: Vec<f64> = series.closes().filter(|close| close.is_finite()).collect();
    let latest = *closes
        .last()
        .ok_or_else(|| MetricsError::NoUsableCloses {
            ticker: ticker.clone(),
        })?;

    let rsi14 = rsi(&closes, RSI_PERIOD);

    let mut changes = [None; 2];
    for (slot, window) in changes.iter_mut().zip(CHANGE_WINDOWS) {
        let baseline = closes
            .len()
            .checked_sub(window + 1)
            .map(|index| closes[index]);
        if baseline.is_none() {
            tracing::warn!(%ticker, window, "not enough data to compute windowed change");
        }
        *slot = percent_change(Some(latest), baseline);
    }
    let [change_10d_pct, change_30d_pct] = changes;

    let min_30d = closes.iter().copied().reduce(f64::min);
    let max_30d = closes.iter().copied().reduce(f64::max);

    let rating = fundamentals
        .recommendation
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(title_case);
    if rating.is_none() {
        tracing::warn!(%ticker, "analyst recommendation not available");
    }

    let target = [
        fundamentals.target_mean_price,
        fundamentals.target_median_price,
        fundamentals.target_high_price,
    ]
    .into_iter()
    .flatten()
    .next();
    if target.is_none() {
        tracing::warn!(%ticker, "target price not available");
    }

    // Argument order answers "how far is the target from the current price".
    let target_change_pct = percent_change(target, Some(latest));

    Ok(MetricsRecord {
        ticker: ticker.clone(),
        price: Some(latest),
        rsi14,
        change_10d_pct,
        change_30d_pct,
        min_30d,
        max_30d,
        rating,
        target,
        target_change_pct,
    })
}

/// First letter of each whitespace-separated word uppercased, rest lowered.
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
