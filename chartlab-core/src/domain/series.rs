//! Close-price time series.
//!
//! A `TimeSeries` is immutable once constructed: transforms produce new
//! values, never mutate in place. Dates are unique within a series and
//! sorted ascending; different series are free to have different lengths,
//! start dates, and trading calendars.

use super::isin::Isin;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One observation: a trading date and its close price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error("duplicate date {date} in series for {isin}")]
    DuplicateDate { isin: Isin, date: NaiveDate },
}

/// An ordered close-price series for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    isin: Isin,
    points: Vec<PricePoint>,
}

impl TimeSeries {
    /// Build a series from possibly-unordered points. Sorts ascending by
    /// date and rejects duplicate dates.
    pub fn new(isin: Isin, mut points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        points.sort_by_key(|p| p.date);
        for w in points.windows(2) {
            if w[0].date == w[1].date {
                return Err(SeriesError::DuplicateDate {
                    isin,
                    date: w[0].date,
                });
            }
        }
        Ok(Self { isin, points })
    }

    pub fn isin(&self) -> &Isin {
        &self.isin
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterator over the close values, in date order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isin() -> Isin {
        Isin::parse("US0378331005").unwrap()
    }

    fn point(date: &str, value: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            value,
        }
    }

    #[test]
    fn sorts_points_by_date() {
        let ts = TimeSeries::new(
            isin(),
            vec![
                point("2024-01-03", 3.0),
                point("2024-01-02", 2.0),
                point("2024-01-04", 4.0),
            ],
        )
        .unwrap();

        let dates: Vec<String> = ts.points().iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let result = TimeSeries::new(
            isin(),
            vec![point("2024-01-02", 2.0), point("2024-01-02", 3.0)],
        );
        assert!(matches!(result, Err(SeriesError::DuplicateDate { .. })));
    }

    #[test]
    fn empty_series_is_allowed() {
        let ts = TimeSeries::new(isin(), vec![]).unwrap();
        assert!(ts.is_empty());
        assert_eq!(ts.len(), 0);
    }
}
