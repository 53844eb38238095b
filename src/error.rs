use crate::homography::HomographyError;
use crate::polyfit::FitError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the lane detector facade and its configuration layer.
#[derive(Debug, Error)]
pub enum LaneError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("curve has {actual} coefficients, lane expects {expected}")]
    CurveLength { expected: usize, actual: usize },
    #[error("fit failed: {0}")]
    Fit(#[from] FitError),
    #[error(transparent)]
    Homography(#[from] HomographyError),
}
