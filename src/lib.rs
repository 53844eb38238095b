#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod detector;
pub mod error;
pub mod image;
pub mod lane;
pub mod types;

// Building blocks, usable on their own.
pub mod homography;
pub mod perspective;
pub mod polyfit;
pub mod preprocess;
pub mod render;
pub mod scanner;
pub mod warp;

// --- High-level re-exports -------------------------------------------------

pub use crate::detector::LaneDetector;
pub use crate::error::LaneError;
pub use crate::lane::Lane;
pub use crate::perspective::WarpDirection;
pub use crate::scanner::{BoundaryScanner, ScanParams};
pub use crate::types::{DetectionReport, Sample, ScanResult};

// Curve helpers that are generally useful.
pub use crate::polyfit::{eval_polynomial, fit_polynomial};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_detector::prelude::*;
///
/// # fn main() -> Result<(), LaneError> {
/// let (w, h) = (200usize, 400usize);
/// let binary = vec![0u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &binary };
///
/// let det = LaneDetector::new(ScanParams::new(40, 5, 1, 20, 80).map_err(LaneError::InvalidConfig)?);
/// let mut lane = Lane::new(3)?;
/// let report = det.get_lanes(&img, &mut lane)?;
/// println!("left={:?} right={:?} latency_ms={:.3}", lane.left(), lane.right(), report.latency_ms);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{GrayImageU8, ImageU8, RgbImageU8};
    pub use crate::{Lane, LaneDetector, LaneError, ScanParams, WarpDirection};
}
