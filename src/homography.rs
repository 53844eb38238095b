//! Planar homographies: the exact four-point solve and point mapping helpers.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use thiserror::Error;

const EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HomographyError {
    #[error("degenerate point correspondences (collinear or repeated corners)")]
    Degenerate,
    #[error("homography is not invertible")]
    Singular,
}

/// Solves the homography mapping four `src` corners onto four `dst` corners.
///
/// The matrix is normalised so that `H[(2, 2)] = 1`, which turns the problem
/// into an 8×8 linear system in the remaining entries:
///
/// ```text
/// u = (h0 x + h1 y + h2) / (h6 x + h7 y + 1)
/// v = (h3 x + h4 y + h5) / (h6 x + h7 y + 1)
/// ```
pub fn perspective_transform(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
) -> Result<Matrix3<f64>, HomographyError> {
    if has_collinear_triplet(src) || has_collinear_triplet(dst) {
        return Err(HomographyError::Degenerate);
    }

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
        let (x, y) = (s[0], s[1]);
        let (u, v) = (d[0], d[1]);

        a[(i, 0)] = x;
        a[(i, 1)] = y;
        a[(i, 2)] = 1.0;
        a[(i, 6)] = -x * u;
        a[(i, 7)] = -y * u;
        b[i] = u;

        a[(i + 4, 3)] = x;
        a[(i + 4, 4)] = y;
        a[(i + 4, 5)] = 1.0;
        a[(i + 4, 6)] = -x * v;
        a[(i + 4, 7)] = -y * v;
        b[i + 4] = v;
    }

    let h = a.lu().solve(&b).ok_or(HomographyError::Degenerate)?;
    if h.iter().any(|v| !v.is_finite()) {
        return Err(HomographyError::Degenerate);
    }
    Ok(Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0))
}

fn has_collinear_triplet(pts: &[[f64; 2]; 4]) -> bool {
    let scale = pts
        .iter()
        .flat_map(|p| p.iter())
        .fold(1.0f64, |acc, v| acc.max(v.abs()));
    let tol = EPS * scale * scale;
    const TRIPLETS: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    TRIPLETS.iter().any(|&[i, j, k]| {
        let (p, q, r) = (pts[i], pts[j], pts[k]);
        let cross = (q[0] - p[0]) * (r[1] - p[1]) - (q[1] - p[1]) * (r[0] - p[0]);
        cross.abs() <= tol
    })
}

/// Maps a single point, returning `None` for points sent to infinity.
#[inline]
pub fn project(h: &Matrix3<f64>, x: f64, y: f64) -> Option<[f64; 2]> {
    let v = h * Vector3::new(x, y, 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some([v[0] / w, v[1] / w])
}

pub fn apply_homography_points(h: &Matrix3<f64>, pts: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
    pts.iter().map(|p| project(h, p[0], p[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    fn close(a: [f64; 2], b: [f64; 2], tol: f64) -> bool {
        (a[0] - b[0]).abs() < tol && (a[1] - b[1]).abs() < tol
    }

    #[test]
    fn scaling_square_gives_diagonal_matrix() {
        let dst = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
        let h = perspective_transform(&UNIT, &dst).unwrap();
        assert!((h[(0, 0)] - 2.0).abs() < 1e-9);
        assert!((h[(1, 1)] - 2.0).abs() < 1e-9);
        assert!(h[(2, 0)].abs() < 1e-12 && h[(2, 1)].abs() < 1e-12);
    }

    #[test]
    fn trapezoid_corners_map_exactly() {
        let src = [[44.0, 20.0], [56.0, 20.0], [100.0, 85.0], [0.0, 85.0]];
        let dst = [[20.0, 0.0], [80.0, 0.0], [80.0, 100.0], [20.0, 100.0]];
        let h = perspective_transform(&src, &dst).unwrap();
        let mapped = apply_homography_points(&h, &src).unwrap();
        for (m, d) in mapped.iter().zip(dst.iter()) {
            assert!(close(*m, *d, 1e-9), "{m:?} vs {d:?}");
        }
    }

    #[test]
    fn collinear_corners_are_rejected() {
        let src = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [0.0, 1.0]];
        assert_eq!(
            perspective_transform(&src, &UNIT),
            Err(HomographyError::Degenerate)
        );
        let repeated = [[0.0, 0.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert!(perspective_transform(&UNIT, &repeated).is_err());
    }

    #[test]
    fn points_at_infinity_are_reported() {
        let h = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0);
        assert!(project(&h, 0.0, 3.0).is_none());
        assert!(apply_homography_points(&h, &[[1.0, 1.0], [0.0, 1.0]]).is_none());
    }
}
