use crate::error::LaneError;
use serde::Serialize;

/// Left and right lane boundary curves sharing a fixed coefficient count.
///
/// Curves map a row coordinate to a column coordinate in the birdseye image
/// (ascending powers). Both are replaced together on every update.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Lane {
    n: usize,
    left: Vec<f64>,
    right: Vec<f64>,
}

impl Lane {
    /// A lane with `n` coefficients per curve, both initialised to zero.
    pub fn new(n: usize) -> Result<Self, LaneError> {
        if n == 0 {
            return Err(LaneError::InvalidConfig(
                "lane.coefficients must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            n,
            left: vec![0.0; n],
            right: vec![0.0; n],
        })
    }

    /// Number of coefficients per curve (polynomial order + 1).
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn left(&self) -> &[f64] {
        &self.left
    }

    pub fn right(&self) -> &[f64] {
        &self.right
    }

    pub fn curves(&self) -> [&[f64]; 2] {
        [&self.left, &self.right]
    }

    /// Replaces both curves. Leaves the lane untouched on a length mismatch.
    pub fn update(&mut self, left: Vec<f64>, right: Vec<f64>) -> Result<(), LaneError> {
        for curve in [&left, &right] {
            if curve.len() != self.n {
                return Err(LaneError::CurveLength {
                    expected: self.n,
                    actual: curve.len(),
                });
            }
        }
        self.left = left;
        self.right = right;
        Ok(())
    }
}
