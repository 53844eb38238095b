use crate::lane::Lane;
use serde::Serialize;

/// One boundary observation: the column found (or carried forward) on a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub row: usize,
    pub col: i64,
}

/// Samples emitted for a single scanned row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScanRow {
    pub left: Sample,
    pub right: Sample,
    pub left_hit: bool,
    pub right_hit: bool,
}

/// Per-side sample sequences, ordered bottom row first.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScanResult {
    pub left: Vec<Sample>,
    pub right: Vec<Sample>,
    pub left_hits: usize,
    pub right_hits: usize,
}

impl ScanResult {
    /// `(rows, cols)` of one side as f64 pairs for the fitter.
    pub fn fit_inputs(samples: &[Sample]) -> (Vec<f64>, Vec<f64>) {
        samples
            .iter()
            .map(|s| (s.row as f64, s.col as f64))
            .unzip()
    }
}

impl FromIterator<ScanRow> for ScanResult {
    fn from_iter<T: IntoIterator<Item = ScanRow>>(iter: T) -> Self {
        let mut out = ScanResult::default();
        for row in iter {
            out.left.push(row.left);
            out.right.push(row.right);
            out.left_hits += usize::from(row.left_hit);
            out.right_hits += usize::from(row.right_hit);
        }
        out
    }
}

/// Outcome of one `LaneDetector::get_lanes` call.
#[derive(Clone, Debug, Serialize)]
pub struct DetectionReport {
    pub width: usize,
    pub height: usize,
    pub scan: ScanResult,
    pub lane: Lane,
    pub latency_ms: f64,
}
