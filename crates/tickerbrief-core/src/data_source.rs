//! Data source contract and request types.
//!
//! A [`DataSource`] supplies the two inputs the metrics engine consumes:
//! a trailing window of daily bars and a best-effort fundamentals
//! snapshot. Implementations must be `Send + Sync`; the async methods
//! return boxed futures so the trait stays object-safe.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{Fundamentals, PriceSeries, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured source error with a stable code and retry hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request for a trailing window of daily bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    /// Number of trailing bars to return; callers that need the 30-day
    /// momentum baseline supply at least 31.
    pub limit: usize,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, limit: usize) -> Result<Self, SourceError> {
        if limit == 0 {
            return Err(SourceError::invalid_request(
                "history request limit must be greater than zero",
            ));
        }
        Ok(Self { symbol, limit })
    }
}

/// Request for a fundamentals snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundamentalsRequest {
    pub symbol: Symbol,
}

impl FundamentalsRequest {
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol }
    }
}

/// Market data contract consumed by the orchestrator.
pub trait DataSource: Send + Sync {
    /// Stable provider identifier, used in diagnostics.
    fn id(&self) -> &'static str;

    /// Fetch a trailing window of daily OHLCV bars, date-ascending.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider is unavailable, rate
    /// limited, or returns no usable bars for the symbol.
    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;

    /// Fetch the analyst fundamentals snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport or provider failures. Callers
    /// treat this endpoint as best-effort and degrade to an empty
    /// [`Fundamentals`] rather than failing the ticker.
    fn fundamentals<'a>(
        &'a self,
        req: FundamentalsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Fundamentals, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_request_rejects_zero_limit() {
        let symbol = Symbol::parse("AAPL").expect("valid symbol");
        let err = HistoryRequest::new(symbol, 0).expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
        assert!(!err.retryable());
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::unavailable("x").code(), "source.unavailable");
        assert_eq!(SourceError::rate_limited("x").code(), "source.rate_limited");
        assert_eq!(SourceError::internal("x").code(), "source.internal");
    }
}
