//! The batch pipeline.
//!
//! Each identifier runs validate -> fetch -> store -> load -> chart as an
//! isolated unit of work: every stage returns an explicit `Result`, and an
//! error is recorded in that item's report without touching the rest of
//! the batch. After the loop, the comparison stage runs exactly once over
//! the successful subset, including when that subset is empty.

use crate::progress::BatchProgress;
use chartlab_core::chart::{
    compose_comparison, single_series_request, ChartRenderer, ChartRequest, RenderError,
};
use chartlab_core::data::{CsvStore, DataError, QuoteProvider, StoreError, WatchEntry};
use chartlab_core::domain::{ColorError, Isin, IsinError, PricePoint, TimeSeries};
use chartlab_core::normalize::{normalize_batch, NormalizeError, NormalizeMethod};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, warn};

const COMPARISON_TITLE: &str = "Close Price Comparison Over Time (Max)";

/// Everything that can take a single identifier out of the batch.
/// Mirrors the pipeline stages; none of these aborts the run.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("validation: {0}")]
    Validation(#[from] IsinError),

    #[error("fetch: {0}")]
    Fetch(#[from] DataError),

    #[error("storage: {0}")]
    Storage(#[from] StoreError),

    #[error("render: {0}")]
    Render(#[from] RenderError),

    #[error("color: {0}")]
    Color(#[from] ColorError),
}

/// Outcome of one identifier's unit of work.
#[derive(Debug)]
pub struct ItemReport {
    pub code: String,
    pub outcome: Result<(), ItemError>,
}

/// Summary of a full batch run.
#[derive(Debug)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub reports: Vec<ItemReport>,
    /// Fingerprint of the raw comparison request, for reproducibility
    /// checks. `None` only if composition itself failed.
    pub comparison_fingerprint: Option<String>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Run the whole batch: the per-identifier loop, then the comparison stage.
pub fn run_batch(
    provider: &dyn QuoteProvider,
    store: &CsvStore,
    renderer: &dyn ChartRenderer,
    img_dir: &Path,
    entries: &[WatchEntry],
    progress: &dyn BatchProgress,
) -> BatchSummary {
    let total = entries.len();
    let mut succeeded = 0;
    let mut failed = 0;
    let mut reports = Vec::with_capacity(total);
    // Successful series in insertion order; this order flows through to
    // legend and z-order in the comparison charts.
    let mut batch: Vec<TimeSeries> = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        progress.on_start(&entry.code, i, total);

        match process_entry(provider, store, renderer, img_dir, entry) {
            Ok(series) => {
                progress.on_complete(&entry.code, i, total, &Ok(()));
                batch.push(series);
                succeeded += 1;
                reports.push(ItemReport {
                    code: entry.code.clone(),
                    outcome: Ok(()),
                });
            }
            Err(e) => {
                warn!(code = %entry.code, error = %e, "skipping identifier");
                let outcome = Err(e);
                progress.on_complete(&entry.code, i, total, &outcome);
                failed += 1;
                reports.push(ItemReport {
                    code: entry.code.clone(),
                    outcome,
                });
            }
        }
    }

    progress.on_batch_complete(succeeded, failed, total);

    let comparison_fingerprint = render_comparisons(renderer, img_dir, &batch);

    BatchSummary {
        total,
        succeeded,
        failed,
        reports,
        comparison_fingerprint,
    }
}

/// One identifier's unit of work. Any error here is that item's alone.
fn process_entry(
    provider: &dyn QuoteProvider,
    store: &CsvStore,
    renderer: &dyn ChartRenderer,
    img_dir: &Path,
    entry: &WatchEntry,
) -> Result<TimeSeries, ItemError> {
    let isin = Isin::parse(&entry.code)?;
    let fetched = provider.fetch_history(isin.as_str())?;
    store.store(&isin, &fetched.bars)?;
    let series = store.load(&isin)?;

    let title = entry
        .title
        .clone()
        .or(fetched.long_name)
        .unwrap_or_else(|| isin.to_string());
    let request = single_series_request(&isin, &title, series.points())?;
    let path = img_dir.join(format!("{isin}.svg"));
    renderer.render(&request, &path)?;
    debug!(isin = %isin, path = %path.display(), "single-series chart written");

    Ok(series)
}

/// The comparison stage: raw close prices, then the min-max and z-score
/// variants. A failure of one chart never blocks the others; a degenerate
/// normalization range skips only the affected normalized chart.
fn render_comparisons(
    renderer: &dyn ChartRenderer,
    img_dir: &Path,
    batch: &[TimeSeries],
) -> Option<String> {
    let items: Vec<(&Isin, &[PricePoint])> =
        batch.iter().map(|s| (s.isin(), s.points())).collect();

    let raw = match compose_comparison(COMPARISON_TITLE, "Close Price", &items) {
        Ok(request) => request,
        Err(e) => {
            // Unreachable for validated ISINs, but never worth a panic.
            error!(error = %e, "cannot compose comparison chart");
            return None;
        }
    };
    let fingerprint = raw.fingerprint();
    render_logged(renderer, &raw, img_dir, "ALL.svg");

    for method in [NormalizeMethod::MinMax, NormalizeMethod::ZScore] {
        match normalize_batch(batch, method) {
            Ok(normalized) => {
                let items: Vec<(&Isin, &[PricePoint])> = normalized
                    .iter()
                    .map(|n| (&n.isin, n.points.as_slice()))
                    .collect();
                let title = format!("{COMPARISON_TITLE} [{}]", method.label());
                let y_label = format!("Close Price ({})", method.label());
                match compose_comparison(&title, &y_label, &items) {
                    Ok(request) => {
                        let file = match method {
                            NormalizeMethod::MinMax => "ALL.minmax.svg",
                            NormalizeMethod::ZScore => "ALL.zscore.svg",
                        };
                        render_logged(renderer, &request, img_dir, file);
                    }
                    Err(e) => error!(error = %e, "cannot compose normalized comparison"),
                }
            }
            Err(e @ NormalizeError::DegenerateRange { .. }) => {
                warn!(error = %e, method = method.label(), "skipping normalized comparison");
            }
        }
    }

    Some(fingerprint)
}

fn render_logged(renderer: &dyn ChartRenderer, request: &ChartRequest, img_dir: &Path, file: &str) {
    let path = img_dir.join(file);
    match renderer.render(request, &path) {
        Ok(()) => debug!(path = %path.display(), series = request.series.len(), "comparison chart written"),
        Err(e) => error!(path = %path.display(), error = %e, "comparison render failed"),
    }
}
