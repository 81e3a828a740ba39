//! Chart request composition.
//!
//! A `ChartRequest` is the single value handed to a renderer: one or more
//! series, each paired with its label and its deterministically assigned
//! color, in upstream insertion order. Insertion order decides legend and
//! z-order in the rendered image, so it must be reproducible. Composition
//! performs no transform of its own.

use crate::domain::{Color, ColorError, Isin, PricePoint};
use serde::{Deserialize, Serialize};

/// What kind of chart the request describes; renderers pick layout from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Single,
    Comparison,
}

/// One series in a chart: label, color, and its own date-indexed points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub color: Color,
    pub points: Vec<PricePoint>,
}

/// A complete chart request, constructed once and consumed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub title: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
}

impl ChartRequest {
    /// Content hash of the request. Identical inputs in identical order
    /// produce identical fingerprints across runs and processes.
    pub fn fingerprint(&self) -> String {
        // Plain structs of strings, dates, and floats; serialization
        // cannot fail here.
        let bytes = serde_json::to_vec(self).expect("chart request serializes");
        blake3::hash(&bytes).to_hex().to_string()
    }
}

/// Compose the request for one instrument's own chart.
pub fn single_series_request(
    isin: &Isin,
    title: &str,
    points: &[PricePoint],
) -> Result<ChartRequest, ColorError> {
    let color = Color::for_identifier(isin.as_str())?;
    Ok(ChartRequest {
        kind: ChartKind::Single,
        title: format!("{isin} - {title}"),
        y_label: "Close Price".into(),
        series: vec![ChartSeries {
            label: isin.to_string(),
            color,
            points: points.to_vec(),
        }],
    })
}

/// Compose the multi-series comparison request. The output series order
/// follows the input order exactly.
pub fn compose_comparison(
    title: &str,
    y_label: &str,
    items: &[(&Isin, &[PricePoint])],
) -> Result<ChartRequest, ColorError> {
    let mut series = Vec::with_capacity(items.len());
    for (isin, points) in items {
        let color = Color::for_identifier(isin.as_str())?;
        series.push(ChartSeries {
            label: isin.to_string(),
            color,
            points: points.to_vec(),
        });
    }
    Ok(ChartRequest {
        kind: ChartKind::Comparison,
        title: title.into(),
        y_label: y_label.into(),
        series,
    })
}
