//! Data provider trait and structured error types.
//!
//! The QuoteProvider trait abstracts over market-data sources so the
//! pipeline can be exercised against a mock in tests. Providers own the
//! network specifics (retries, rate limiting); the store and pipeline
//! never see HTTP.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily OHLCV bar from a data provider, before any transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: f64,
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider returned no history for {symbol}")]
    EmptyHistory { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single instrument.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    /// Instrument display name from provider metadata, when available.
    pub long_name: Option<String>,
    pub bars: Vec<RawBar>,
}

/// Trait for market-data providers.
///
/// Implementations handle the specifics of one source. There is no cache
/// layer here: persistence is the store's concern.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the full available daily history for a symbol.
    fn fetch_history(&self, symbol: &str) -> Result<FetchResult, DataError>;
}
