//! CSV persistence: one flat file per instrument.
//!
//! Layout: `{root}/{ISIN}.csv` with header
//! `date,open,high,low,close,adj_close,volume` and dates as `%Y-%m-%d`.
//! `store` overwrites any prior file for the same identifier; `load`
//! rebuilds the close-price series. A parse failure is fatal for that
//! identifier only, never for the batch.

use super::provider::RawBar;
use crate::domain::{Isin, PricePoint, TimeSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no stored series for {isin} at {}", path.display())]
    Missing { isin: Isin, path: PathBuf },

    #[error("cannot write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// The columns the loader actually consumes; the rest of the row is
/// ignored by header-based deserialization.
#[derive(Debug, Deserialize)]
struct Row {
    date: String,
    close: f64,
}

/// The per-instrument CSV store.
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic path for an instrument's file: `{root}/{ISIN}.csv`.
    pub fn path_for(&self, isin: &Isin) -> PathBuf {
        self.root.join(format!("{isin}.csv"))
    }

    /// Persist the full OHLCV history, overwriting any prior file.
    pub fn store(&self, isin: &Isin, bars: &[RawBar]) -> Result<PathBuf, StoreError> {
        let path = self.path_for(isin);
        let write_err = |e: String| StoreError::Write {
            path: path.clone(),
            message: e,
        };

        let mut wtr = csv::Writer::from_path(&path).map_err(|e| write_err(e.to_string()))?;
        wtr.write_record(["date", "open", "high", "low", "close", "adj_close", "volume"])
            .map_err(|e| write_err(e.to_string()))?;

        for bar in bars {
            wtr.write_record([
                bar.date.format("%Y-%m-%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.adj_close.to_string(),
                bar.volume.to_string(),
            ])
            .map_err(|e| write_err(e.to_string()))?;
        }
        wtr.flush().map_err(|e| write_err(e.to_string()))?;

        debug!(isin = %isin, path = %path.display(), rows = bars.len(), "series stored");
        Ok(path)
    }

    /// Load the stored file back into a close-price series.
    ///
    /// Rows whose close is not a finite number are dropped: they carry no
    /// plottable value and would poison the batch statistics.
    pub fn load(&self, isin: &Isin) -> Result<TimeSeries, StoreError> {
        let path = self.path_for(isin);
        if !path.exists() {
            return Err(StoreError::Missing {
                isin: isin.clone(),
                path,
            });
        }
        let parse_err = |message: String| StoreError::Parse {
            path: path.clone(),
            message,
        };

        let mut rdr = csv::Reader::from_path(&path).map_err(|e| parse_err(e.to_string()))?;
        let mut points = Vec::new();

        for result in rdr.deserialize::<Row>() {
            let row = result.map_err(|e| parse_err(e.to_string()))?;
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                .map_err(|e| parse_err(format!("date '{}': {e}", row.date)))?;
            if row.close.is_finite() {
                points.push(PricePoint {
                    date,
                    value: row.close,
                });
            }
        }

        TimeSeries::new(isin.clone(), points).map_err(|e| parse_err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isin() -> Isin {
        Isin::parse("US0378331005").unwrap()
    }

    fn bar(date: &str, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000,
            adj_close: close,
        }
    }

    #[test]
    fn store_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());

        let path = store
            .store(&isin(), &[bar("2024-01-02", 101.0), bar("2024-01-03", 102.0)])
            .unwrap();
        assert!(path.ends_with("US0378331005.csv"));

        let ts = store.load(&isin()).unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.points()[0].date.to_string(), "2024-01-02");
        assert_eq!(ts.points()[1].value, 102.0);
    }

    #[test]
    fn store_overwrites_prior_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());

        store.store(&isin(), &[bar("2024-01-02", 101.0)]).unwrap();
        store.store(&isin(), &[bar("2024-02-05", 150.0)]).unwrap();

        let ts = store.load(&isin()).unwrap();
        assert_eq!(ts.len(), 1);
        assert_eq!(ts.points()[0].value, 150.0);
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        assert!(matches!(
            store.load(&isin()),
            Err(StoreError::Missing { .. })
        ));
    }

    #[test]
    fn load_rejects_unparsable_date() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        let path = store.path_for(&isin());
        std::fs::write(
            &path,
            "date,open,high,low,close,adj_close,volume\nnot-a-date,1,2,0,1.5,1.5,10\n",
        )
        .unwrap();

        assert!(matches!(store.load(&isin()), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn load_drops_non_finite_closes() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        store
            .store(
                &isin(),
                &[bar("2024-01-02", 101.0), bar("2024-01-03", f64::NAN)],
            )
            .unwrap();

        let ts = store.load(&isin()).unwrap();
        assert_eq!(ts.len(), 1);
        assert_eq!(ts.points()[0].value, 101.0);
    }

    #[test]
    fn store_to_unwritable_root_errors() {
        let store = CsvStore::new("/nonexistent-root/for-sure");
        assert!(matches!(
            store.store(&isin(), &[bar("2024-01-02", 1.0)]),
            Err(StoreError::Write { .. })
        ));
    }
}
