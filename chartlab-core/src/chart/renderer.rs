//! The renderer boundary.
//!
//! Rendering is a collaborator behind a trait so the pipeline can be tested
//! without touching the filesystem image output, and so the image backend
//! can be swapped without touching orchestration.

use super::compose::ChartRequest;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot write chart {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("render failed: {0}")]
    Other(String),
}

/// Renders a composed chart request to a file.
///
/// Implementations own all layout decisions. An empty request (zero series)
/// must still produce a valid image.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, request: &ChartRequest, path: &Path) -> Result<(), RenderError>;
}
