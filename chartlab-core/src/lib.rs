//! ChartLab Core — domain types, data acquisition, normalization, charting.
//!
//! This crate contains everything below the orchestration layer:
//! - Domain types (ISIN identifiers, price series, deterministic colors)
//! - Data providers (Yahoo Finance) behind the `QuoteProvider` trait
//! - CSV persistence (one flat file per instrument)
//! - Watchlist input parsing (plain text or CSV)
//! - Batch-wide normalization (min-max, z-score)
//! - Chart request composition and SVG rendering

pub mod chart;
pub mod data;
pub mod domain;
pub mod normalize;
