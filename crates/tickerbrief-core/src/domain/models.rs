use serde::{Deserialize, Serialize};

use crate::{Symbol, TradeDate, ValidationError};

/// One trading day of OHLCV data. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: TradeDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PriceBar {
    pub fn new(
        date: TradeDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_positive("open", open)?;
        validate_positive("high", high)?;
        validate_positive("low", low)?;
        validate_positive("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Daily price history for one symbol, strictly ascending by date.
///
/// May be empty; the metrics engine treats an empty close sequence as its
/// one structural failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: Symbol,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol, bars: Vec<PriceBar>) -> Result<Self, ValidationError> {
        for (index, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(ValidationError::OutOfOrderBar { index: index + 1 });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in date order.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }
}

/// Sparse analyst fundamentals for one symbol.
///
/// Every field is best-effort provider metadata and may be absent; the
/// all-absent value is valid and is the `Default`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub recommendation: Option<String>,
    pub target_mean_price: Option<f64>,
    pub target_median_price: Option<f64>,
    pub target_high_price: Option<f64>,
}

impl Fundamentals {
    pub fn new(
        recommendation: Option<String>,
        target_mean_price: Option<f64>,
        target_median_price: Option<f64>,
        target_high_price: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_optional_positive("target_mean_price", target_mean_price)?;
        validate_optional_positive("target_median_price", target_median_price)?;
        validate_optional_positive("target_high_price", target_high_price)?;

        Ok(Self {
            recommendation,
            target_mean_price,
            target_median_price,
            target_high_price,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.recommendation.is_none()
            && self.target_mean_price.is_none()
            && self.target_median_price.is_none()
            && self.target_high_price.is_none()
    }
}

/// Derived per-ticker metrics, one record per run.
///
/// Serialized field names (including the delta/percent glyphs) are the
/// rendering contract; absent means the input lacked enough data, never
/// that something went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    #[serde(rename = "Ticker")]
    pub ticker: Symbol,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "RSI14")]
    pub rsi14: Option<f64>,
    #[serde(rename = "Δ10d%")]
    pub change_10d_pct: Option<f64>,
    #[serde(rename = "Δ30d%")]
    pub change_30d_pct: Option<f64>,
    #[serde(rename = "Min30d")]
    pub min_30d: Option<f64>,
    #[serde(rename = "Max30d")]
    pub max_30d: Option<f64>,
    #[serde(rename = "Rating")]
    pub rating: Option<String>,
    #[serde(rename = "Target")]
    pub target: Option<f64>,
    #[serde(rename = "Target Δ%")]
    pub target_change_pct: Option<f64>,
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}

fn validate_optional_positive(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        validate_positive(field, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u16) -> TradeDate {
        TradeDate::from(time::Date::from_ordinal_date(2024, day).expect("valid ordinal day"))
    }

    #[test]
    fn rejects_bar_with_high_below_low() {
        let err = PriceBar::new(date(1), 10.0, 9.0, 11.0, 10.0, Some(100)).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarRange));
    }

    #[test]
    fn rejects_bar_with_close_outside_range() {
        let err = PriceBar::new(date(1), 10.0, 11.0, 9.0, 12.5, Some(100)).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }

    #[test]
    fn rejects_non_positive_close() {
        let err = PriceBar::new(date(1), 10.0, 11.0, 9.0, 0.0, None).expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::NonPositiveValue { field: "close" }
        ));
    }

    #[test]
    fn accepts_zero_volume() {
        let bar = PriceBar::new(date(1), 10.0, 11.0, 9.0, 10.5, Some(0)).expect("must build");
        assert_eq!(bar.volume, Some(0));
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let symbol = Symbol::parse("AAPL").expect("valid symbol");
        let bar = PriceBar::new(date(5), 10.0, 11.0, 9.0, 10.5, None).expect("valid bar");
        let err =
            PriceSeries::new(symbol, vec![bar.clone(), bar]).expect_err("duplicate must fail");
        assert!(matches!(err, ValidationError::OutOfOrderBar { index: 1 }));
    }

    #[test]
    fn series_rejects_descending_dates() {
        let symbol = Symbol::parse("AAPL").expect("valid symbol");
        let newer = PriceBar::new(date(6), 10.0, 11.0, 9.0, 10.5, None).expect("valid bar");
        let older = PriceBar::new(date(5), 10.0, 11.0, 9.0, 10.5, None).expect("valid bar");
        let err = PriceSeries::new(symbol, vec![newer, older]).expect_err("must fail");
        assert!(matches!(err, ValidationError::OutOfOrderBar { index: 1 }));
    }

    #[test]
    fn empty_series_is_constructible() {
        let symbol = Symbol::parse("AAPL").expect("valid symbol");
        let series = PriceSeries::new(symbol, Vec::new()).expect("empty series is valid");
        assert!(series.is_empty());
    }

    #[test]
    fn fundamentals_rejects_non_positive_target() {
        let err = Fundamentals::new(None, Some(0.0), None, None).expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::NonPositiveValue {
                field: "target_mean_price"
            }
        ));
    }

    #[test]
    fn metrics_record_serializes_with_display_names() {
        let record = MetricsRecord {
            ticker: Symbol::parse("AAPL").expect("valid symbol"),
            price: Some(100.0),
            rsi14: None,
            change_10d_pct: Some(1.5),
            change_30d_pct: None,
            min_30d: Some(95.0),
            max_30d: Some(105.0),
            rating: Some(String::from("Buy")),
            target: None,
            target_change_pct: None,
        };

        let json = serde_json::to_value(&record).expect("must serialize");
        assert_eq!(json["Ticker"], "AAPL");
        assert_eq!(json["Δ10d%"], 1.5);
        assert!(json["Target Δ%"].is_null());
    }
}
