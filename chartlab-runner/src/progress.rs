//! Per-item progress callbacks, decoupled from any particular UI.

use crate::pipeline::ItemError;

/// Progress callback for a batch run.
pub trait BatchProgress: Send {
    /// Called when an identifier's unit of work starts.
    fn on_start(&self, code: &str, index: usize, total: usize);

    /// Called when an identifier's unit of work completes.
    fn on_complete(&self, code: &str, index: usize, total: usize, result: &Result<(), ItemError>);

    /// Called once when the whole batch is done (before the comparison stage).
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl BatchProgress for StdoutProgress {
    fn on_start(&self, code: &str, index: usize, total: usize) {
        println!("[{}/{}] Processing {code}...", index + 1, total);
    }

    fn on_complete(
        &self,
        code: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), ItemError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {code}"),
            Err(e) => println!("  FAIL: {code}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nBatch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}
