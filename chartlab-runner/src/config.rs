//! Run configuration and output directory layout.
//!
//! Configuration is explicit values threaded into the pipeline; no
//! module-level state. A setup failure here is the only fatal condition
//! of a run; everything later is isolated per identifier.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Explicit run configuration, built from CLI arguments.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
}

impl RunConfig {
    pub fn csv_dir(&self) -> PathBuf {
        self.output_dir.join("csv")
    }

    pub fn img_dir(&self) -> PathBuf {
        self.output_dir.join("img")
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("input file {} does not exist or is not readable", path.display())]
    InputUnreadable { path: PathBuf },

    #[error("cannot create output directory {}: {message}", path.display())]
    OutputUnwritable { path: PathBuf, message: String },
}

/// Validated output layout. Construction creates the directories.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub csv_dir: PathBuf,
    pub img_dir: PathBuf,
}

/// Check the input file and create the output tree.
pub fn prepare_layout(config: &RunConfig) -> Result<OutputLayout, SetupError> {
    if !config.input_file.is_file() {
        return Err(SetupError::InputUnreadable {
            path: config.input_file.clone(),
        });
    }

    let layout = OutputLayout {
        csv_dir: config.csv_dir(),
        img_dir: config.img_dir(),
    };
    for dir in [&layout.csv_dir, &layout.img_dir] {
        fs::create_dir_all(dir).map_err(|e| SetupError::OutputUnwritable {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        debug!(dir = %dir.display(), "output directory ready");
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_csv_and_img_directories() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("list.txt");
        std::fs::write(&input, "US0378331005\n").unwrap();

        let config = RunConfig {
            input_file: input,
            output_dir: dir.path().join("out"),
        };
        let layout = prepare_layout(&config).unwrap();

        assert!(layout.csv_dir.is_dir());
        assert!(layout.img_dir.is_dir());
        assert!(layout.csv_dir.ends_with("csv"));
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            input_file: dir.path().join("absent.txt"),
            output_dir: dir.path().join("out"),
        };
        assert!(matches!(
            prepare_layout(&config),
            Err(SetupError::InputUnreadable { .. })
        ));
    }

    #[test]
    fn unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("list.txt");
        std::fs::write(&input, "US0378331005\n").unwrap();

        let config = RunConfig {
            input_file: input,
            output_dir: PathBuf::from("/proc/not-writable"),
        };
        assert!(matches!(
            prepare_layout(&config),
            Err(SetupError::OutputUnwritable { .. })
        ));
    }
}
