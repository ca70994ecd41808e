use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("plot error: {0}")]
    Plot(String),
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{what}: expected {expected} values, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("cannot allocate a {rows}x{cols} sensitivity matrix")]
    Allocation { rows: usize, cols: usize },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ForwardError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ForwardError::Plot(err.to_string())
    }
}

impl ForwardError {
    pub(crate) fn check_len(
        what: &'static str,
        expected: usize,
        actual: usize,
    ) -> Result<(), ForwardError> {
        if expected != actual {
            return Err(ForwardError::LengthMismatch {
                what,
                expected,
                actual,
            });
        }
        Ok(())
    }
}
