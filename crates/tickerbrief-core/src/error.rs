use thiserror::Error;

use crate::Symbol;

/// Validation and contract errors exposed by `tickerbrief-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("trade date must be a calendar date in YYYY-MM-DD form: '{value}'")]
    InvalidTradeDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("price series bars must be strictly ascending by date (violation at index {index})")]
    OutOfOrderBar { index: usize },
}

/// The engine's only hard failure: nothing usable to compute from.
///
/// Every other data gap degrades to an absent field on the record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("no usable close prices for {ticker}")]
    NoUsableCloses { ticker: Symbol },
}
