//! Camera ↔ birdseye perspective matrices derived from fractional anchors.
//!
//! The camera-space trapezoid covering the road ahead is mapped onto an
//! upright rectangle in the birdseye view, so parallel lane lines on the
//! ground stay parallel after warping. Anchors are fractions of the image
//! size; the matrix is a pure function of `(width, height, direction)` and
//! is cheap enough to recompute per call.

use crate::homography::{perspective_transform, HomographyError};
use nalgebra::Matrix3;
use serde::Deserialize;

/// Which way a perspective matrix maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarpDirection {
    /// Camera frame → birdseye image.
    ToBirdseye,
    /// Birdseye image → camera frame (the "undo" matrix).
    ToCamera,
}

impl WarpDirection {
    pub fn from_undo(undo: bool) -> Self {
        if undo {
            Self::ToCamera
        } else {
            Self::ToBirdseye
        }
    }
}

/// Corner anchors as `[x, y]` fractions of the image width/height.
///
/// Corners run top-left, top-right, bottom-right, bottom-left.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerspectiveAnchors {
    /// Camera-space trapezoid.
    pub src: [[f64; 2]; 4],
    /// Birdseye-space rectangle.
    pub dst: [[f64; 2]; 4],
}

impl Default for PerspectiveAnchors {
    fn default() -> Self {
        Self {
            src: [[0.44, 0.20], [0.56, 0.20], [1.00, 0.85], [0.00, 0.85]],
            dst: [[0.20, 0.00], [0.80, 0.00], [0.80, 1.00], [0.20, 1.00]],
        }
    }
}

impl PerspectiveAnchors {
    /// Source and destination corners in pixels for a `width × height` image.
    pub fn corners(&self, width: usize, height: usize) -> ([[f64; 2]; 4], [[f64; 2]; 4]) {
        let scale = |q: &[[f64; 2]; 4]| q.map(|p| [p[0] * width as f64, p[1] * height as f64]);
        (scale(&self.src), scale(&self.dst))
    }

    pub fn transform_matrix(
        &self,
        width: usize,
        height: usize,
        direction: WarpDirection,
    ) -> Result<Matrix3<f64>, HomographyError> {
        let (src, dst) = self.corners(width, height);
        match direction {
            WarpDirection::ToBirdseye => perspective_transform(&src, &dst),
            WarpDirection::ToCamera => perspective_transform(&dst, &src),
        }
    }
}

/// Perspective matrix for the default anchors.
pub fn transform_matrix(
    width: usize,
    height: usize,
    direction: WarpDirection,
) -> Result<Matrix3<f64>, HomographyError> {
    PerspectiveAnchors::default().transform_matrix(width, height, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homography::{apply_homography_points, project};

    #[test]
    fn forward_then_inverse_is_identity_on_anchors() {
        let (w, h) = (640, 480);
        let fwd = transform_matrix(w, h, WarpDirection::ToBirdseye).unwrap();
        let inv = transform_matrix(w, h, WarpDirection::from_undo(true)).unwrap();
        let (src, dst) = PerspectiveAnchors::default().corners(w, h);

        let birdseye = apply_homography_points(&fwd, &src).unwrap();
        for (b, d) in birdseye.iter().zip(dst.iter()) {
            assert!((b[0] - d[0]).abs() < 1e-6 && (b[1] - d[1]).abs() < 1e-6);
        }
        let back = apply_homography_points(&inv, &birdseye).unwrap();
        for (p, s) in back.iter().zip(src.iter()) {
            assert!((p[0] - s[0]).abs() < 1e-6 && (p[1] - s[1]).abs() < 1e-6);
        }
        let composed = inv * fwd;
        let scale = composed[(2, 2)];
        assert!(((composed / scale) - Matrix3::identity()).norm() < 1e-9);
    }

    #[test]
    fn birdseye_keeps_road_centre_vertical() {
        let (w, h) = (200, 400);
        let fwd = transform_matrix(w, h, WarpDirection::ToBirdseye).unwrap();
        let top = project(&fwd, 100.0, 0.20 * h as f64).unwrap();
        let bottom = project(&fwd, 100.0, 0.85 * h as f64).unwrap();
        assert!((top[0] - 100.0).abs() < 1e-9);
        assert!((bottom[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sized_image_is_degenerate() {
        assert!(transform_matrix(0, 480, WarpDirection::ToBirdseye).is_err());
    }
}
