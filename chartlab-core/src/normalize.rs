//! Batch-wide series normalization.
//!
//! Statistics are computed over the union of every close value across the
//! whole batch, then each series is rescaled against those shared numbers.
//! Two phases, with a barrier between them: collect the complete batch,
//! summarize, then transform each series. A single series with an unusually
//! wide range therefore compresses the others toward the edges of the
//! normalized range; that relative scaling is the intended behavior.
//!
//! Dates are preserved per series. There is no resampling and no
//! cross-series alignment here; only the value column changes.

use crate::domain::{Isin, PricePoint, TimeSeries};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two supported transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizeMethod {
    /// `v -> (v - min) / (max - min)`, batch-wide extrema.
    MinMax,
    /// `v -> (v - mean) / std`, batch-wide mean and population std.
    ZScore,
}

impl NormalizeMethod {
    pub fn label(&self) -> &'static str {
        match self {
            NormalizeMethod::MinMax => "min-max",
            NormalizeMethod::ZScore => "z-score",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("degenerate {method} range: all {count} values equal {value}")]
    DegenerateRange {
        method: &'static str,
        count: usize,
        value: f64,
    },
}

/// Batch-wide summary statistics over every value of every series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation (divide by N).
    pub std: f64,
    pub count: usize,
}

impl BatchStats {
    /// Summarize the complete batch. Returns `None` when there are no
    /// values at all (empty batch, or only empty series).
    pub fn compute(batch: &[TimeSeries]) -> Option<BatchStats> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for series in batch {
            for v in series.values() {
                count += 1;
                sum += v;
                min = min.min(v);
                max = max.max(v);
            }
        }
        if count == 0 {
            return None;
        }

        let mean = sum / count as f64;
        let mut var_sum = 0.0;
        for series in batch {
            for v in series.values() {
                let d = v - mean;
                var_sum += d * d;
            }
        }
        let std = (var_sum / count as f64).sqrt();

        Some(BatchStats {
            min,
            max,
            mean,
            std,
            count,
        })
    }
}

/// A rescaled series. Keeps the source identifier for labeling; the dates
/// are the source series' own dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    pub isin: Isin,
    pub method: NormalizeMethod,
    pub points: Vec<PricePoint>,
}

/// Rescale every series in the batch against the batch-wide statistics.
///
/// Pure: identical batch contents produce identical output. An empty batch
/// yields an empty result. A zero-width range or zero variance is the
/// degenerate case and surfaces as an explicit error, never a NaN.
pub fn normalize_batch(
    batch: &[TimeSeries],
    method: NormalizeMethod,
) -> Result<Vec<NormalizedSeries>, NormalizeError> {
    let Some(stats) = BatchStats::compute(batch) else {
        // No values anywhere: one empty output per input series.
        return Ok(batch
            .iter()
            .map(|s| NormalizedSeries {
                isin: s.isin().clone(),
                method,
                points: Vec::new(),
            })
            .collect());
    };

    let (offset, denom) = match method {
        NormalizeMethod::MinMax => (stats.min, stats.max - stats.min),
        NormalizeMethod::ZScore => (stats.mean, stats.std),
    };
    if denom == 0.0 {
        return Err(NormalizeError::DegenerateRange {
            method: method.label(),
            count: stats.count,
            value: stats.min,
        });
    }

    Ok(batch
        .iter()
        .map(|series| NormalizedSeries {
            isin: series.isin().clone(),
            method,
            points: series
                .points()
                .iter()
                .map(|p| PricePoint {
                    date: p.date,
                    value: (p.value - offset) / denom,
                })
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(code: &str, values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                value,
            })
            .collect();
        TimeSeries::new(Isin::parse(code).unwrap(), points).unwrap()
    }

    #[test]
    fn min_max_worked_example() {
        // Batch of [1,2,3] and [10,20,30]: min 1, max 30, range 29.
        let batch = [
            series("US0378331005", &[1.0, 2.0, 3.0]),
            series("US5949181045", &[10.0, 20.0, 30.0]),
        ];
        let out = normalize_batch(&batch, NormalizeMethod::MinMax).unwrap();

        let first: Vec<f64> = out[0].points.iter().map(|p| p.value).collect();
        let second: Vec<f64> = out[1].points.iter().map(|p| p.value).collect();

        assert_eq!(first[0], 0.0);
        assert!((first[1] - 1.0 / 29.0).abs() < 1e-12);
        assert!((first[2] - 2.0 / 29.0).abs() < 1e-12);
        assert!((second[0] - 9.0 / 29.0).abs() < 1e-12);
        assert!((second[1] - 19.0 / 29.0).abs() < 1e-12);
        assert_eq!(second[2], 1.0);
    }

    #[test]
    fn min_max_output_is_in_unit_interval() {
        let batch = [
            series("US0378331005", &[5.0, 8.0, 2.5]),
            series("GB0002634946", &[100.0, 42.0]),
        ];
        let out = normalize_batch(&batch, NormalizeMethod::MinMax).unwrap();
        for ns in &out {
            for p in &ns.points {
                assert!((0.0..=1.0).contains(&p.value));
            }
        }
    }

    #[test]
    fn z_score_has_zero_mean_unit_std() {
        let batch = [
            series("US0378331005", &[1.0, 2.0, 3.0]),
            series("US5949181045", &[10.0, 20.0, 30.0]),
        ];
        let out = normalize_batch(&batch, NormalizeMethod::ZScore).unwrap();

        let values: Vec<f64> = out
            .iter()
            .flat_map(|ns| ns.points.iter().map(|p| p.value))
            .collect();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt();

        assert!(mean.abs() < 1e-12);
        assert!((std - 1.0).abs() < 1e-12);
    }

    #[test]
    fn dates_are_preserved_per_series() {
        let batch = [
            series("US0378331005", &[1.0, 2.0]),
            series("US5949181045", &[3.0]),
        ];
        let out = normalize_batch(&batch, NormalizeMethod::MinMax).unwrap();
        assert_eq!(out[0].points.len(), 2);
        assert_eq!(out[1].points.len(), 1);
        assert_eq!(out[0].points[0].date, batch[0].points()[0].date);
        assert_eq!(out[1].points[0].date, batch[1].points()[0].date);
        assert_eq!(out[1].isin, *batch[1].isin());
    }

    #[test]
    fn degenerate_range_is_an_error_for_both_methods() {
        let batch = [series("US0378331005", &[7.0, 7.0, 7.0])];
        for method in [NormalizeMethod::MinMax, NormalizeMethod::ZScore] {
            let err = normalize_batch(&batch, method).unwrap_err();
            assert!(matches!(err, NormalizeError::DegenerateRange { .. }));
        }
    }

    #[test]
    fn empty_batch_yields_empty_result() {
        let out = normalize_batch(&[], NormalizeMethod::MinMax).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn pure_given_identical_input() {
        let batch = [
            series("US0378331005", &[1.5, 9.25, 4.0]),
            series("US5949181045", &[3.0, 2.0]),
        ];
        let a = normalize_batch(&batch, NormalizeMethod::ZScore).unwrap();
        let b = normalize_batch(&batch, NormalizeMethod::ZScore).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn batch_stats_over_union() {
        let batch = [
            series("US0378331005", &[1.0, 2.0, 3.0]),
            series("US5949181045", &[10.0, 20.0, 30.0]),
        ];
        let stats = BatchStats::compute(&batch).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.count, 6);
        assert!((stats.mean - 11.0).abs() < 1e-12);
    }
}
