//! Data acquisition and persistence: the provider trait, the Yahoo Finance
//! client, the per-instrument CSV store, and watchlist input parsing.

pub mod provider;
pub mod store;
pub mod watchlist;
pub mod yahoo;

pub use provider::{DataError, FetchResult, QuoteProvider, RawBar};
pub use store::{CsvStore, StoreError};
pub use watchlist::{read_watchlist, WatchEntry, WatchlistError};
pub use yahoo::YahooProvider;
