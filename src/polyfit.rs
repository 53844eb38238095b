//! Least-squares polynomial fitting and evaluation for lane curves.
//!
//! A curve is a coefficient vector `[c0, c1, .., c(N-1)]` in ascending powers,
//! mapping the row coordinate to a column coordinate.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Singular values below `RANK_TOL * s_max` count as zero.
const RANK_TOL: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("a polynomial needs at least one coefficient")]
    NoCoefficients,
    #[error("sample length mismatch: {xs} inputs, {ys} outputs, {weights} weights")]
    LengthMismatch {
        xs: usize,
        ys: usize,
        weights: usize,
    },
    #[error("underdetermined fit: {samples} samples for {coefficients} coefficients")]
    Underdetermined { samples: usize, coefficients: usize },
    #[error("rank-deficient design matrix: rank {rank} for {coefficients} coefficients")]
    RankDeficient { rank: usize, coefficients: usize },
    #[error("non-finite sample or weight")]
    NonFinite,
}

/// Ordinary least-squares fit of `ys ≈ Σ c_k xs^k` with `n` coefficients.
pub fn fit_polynomial(xs: &[f64], ys: &[f64], n: usize) -> Result<Vec<f64>, FitError> {
    fit_impl(xs, ys, None, n)
}

/// Weighted least squares; each residual is scaled by `sqrt(w_i)`.
///
/// Samples with zero weight drop out of the fit and do not count towards the
/// number of usable samples.
pub fn fit_polynomial_weighted(
    xs: &[f64],
    ys: &[f64],
    weights: &[f64],
    n: usize,
) -> Result<Vec<f64>, FitError> {
    fit_impl(xs, ys, Some(weights), n)
}

fn fit_impl(
    xs: &[f64],
    ys: &[f64],
    weights: Option<&[f64]>,
    n: usize,
) -> Result<Vec<f64>, FitError> {
    if n == 0 {
        return Err(FitError::NoCoefficients);
    }
    let m = xs.len();
    let wlen = weights.map_or(m, <[f64]>::len);
    if ys.len() != m || wlen != m {
        return Err(FitError::LengthMismatch {
            xs: m,
            ys: ys.len(),
            weights: wlen,
        });
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }
    if let Some(w) = weights {
        if w.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(FitError::NonFinite);
        }
    }

    let sqrt_w: Vec<f64> = match weights {
        Some(w) => w.iter().map(|v| v.sqrt()).collect(),
        None => vec![1.0; m],
    };
    let usable = sqrt_w.iter().filter(|&&w| w > 0.0).count();
    if usable < n {
        return Err(FitError::Underdetermined {
            samples: usable,
            coefficients: n,
        });
    }

    // Solve in t = (x - centre) / half_range so the Vandermonde columns stay
    // within [-1, 1] for pixel-sized row ranges.
    let (lo, hi) = xs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let centre = 0.5 * (lo + hi);
    let half_range = match 0.5 * (hi - lo) {
        s if s > 0.0 => s,
        _ => 1.0,
    };

    // Weighted Vandermonde system A d = b in the scaled coordinate.
    let a = DMatrix::from_fn(m, n, |r, c| {
        sqrt_w[r] * ((xs[r] - centre) / half_range).powi(c as i32)
    });
    let b = DVector::from_iterator(m, ys.iter().zip(&sqrt_w).map(|(y, w)| y * w));

    let svd = a.svd(true, true);
    let s_max = svd.singular_values.max();
    let eps = (RANK_TOL * s_max).max(f64::MIN_POSITIVE);
    let rank = svd.rank(eps);
    if rank < n {
        return Err(FitError::RankDeficient {
            rank,
            coefficients: n,
        });
    }
    let scaled = svd
        .solve(&b, eps)
        .map_err(|_| FitError::RankDeficient {
            rank,
            coefficients: n,
        })?;
    let coeffs = expand_shifted(scaled.as_slice(), centre, half_range);
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(FitError::NonFinite);
    }
    Ok(coeffs)
}

/// Rewrites `Σ d_k ((x - centre) / scale)^k` as ascending powers of `x`.
fn expand_shifted(d: &[f64], centre: f64, scale: f64) -> Vec<f64> {
    let n = d.len();
    let mut out = vec![0.0; n];
    // `binom` holds row k of Pascal's triangle.
    let mut binom = vec![0.0; n];
    for (k, &dk) in d.iter().enumerate() {
        for j in (1..=k).rev() {
            binom[j] += binom[j - 1];
        }
        binom[0] = 1.0;
        let dk = dk / scale.powi(k as i32);
        for (j, out_j) in out.iter_mut().enumerate().take(k + 1) {
            *out_j += dk * binom[j] * (-centre).powi((k - j) as i32);
        }
    }
    out
}

/// Evaluates `Σ c_k x^k` without rounding.
pub fn eval_polynomial_f64(coeffs: &[f64], x: f64) -> f64 {
    // Horner, highest power first.
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluates the curve at `x` and truncates toward zero to a pixel coordinate.
///
/// Truncation (not rounding) is observable in rendered marker positions.
pub fn eval_polynomial(coeffs: &[f64], x: f64) -> i32 {
    eval_polynomial_f64(coeffs, x) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_recovered() {
        let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 3.0).collect();
        let c = fit_polynomial(&xs, &ys, 2).unwrap();
        assert!((c[0] - 3.0).abs() < 1e-9, "c0={}", c[0]);
        assert!((c[1] - 2.0).abs() < 1e-9, "c1={}", c[1]);
    }

    #[test]
    fn quadratic_on_pixel_rows_reproduces_samples() {
        let xs: Vec<f64> = (0..400).step_by(5).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 40.0 + 0.1 * x + 2e-4 * x * x).collect();
        let c = fit_polynomial(&xs, &ys, 3).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            assert!((eval_polynomial_f64(&c, *x) - y).abs() < 1e-6);
        }
    }

    #[test]
    fn higher_degree_than_data_fits_zero_excess_terms() {
        let xs: Vec<f64> = (0..20).map(|i| i as f64 * 10.0).collect();
        let ys = vec![40.0; xs.len()];
        let c = fit_polynomial(&xs, &ys, 3).unwrap();
        assert!((c[0] - 40.0).abs() < 1e-6);
        assert!(c[1].abs() < 1e-6 && c[2].abs() < 1e-8);
    }

    #[test]
    fn too_few_samples_is_underdetermined() {
        let err = fit_polynomial(&[1.0, 2.0], &[3.0, 4.0], 3).unwrap_err();
        assert_eq!(
            err,
            FitError::Underdetermined {
                samples: 2,
                coefficients: 3
            }
        );
    }

    #[test]
    fn repeated_inputs_are_rank_deficient() {
        let xs = [5.0; 6];
        let ys = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let err = fit_polynomial(&xs, &ys, 2).unwrap_err();
        assert!(matches!(err, FitError::RankDeficient { rank: 1, coefficients: 2 }));
    }

    #[test]
    fn zero_coefficients_and_mismatched_lengths_are_rejected() {
        assert_eq!(fit_polynomial(&[1.0], &[1.0], 0), Err(FitError::NoCoefficients));
        assert!(matches!(
            fit_polynomial(&[1.0, 2.0], &[1.0], 1),
            Err(FitError::LengthMismatch { .. })
        ));
        assert_eq!(
            fit_polynomial(&[1.0, f64::NAN], &[1.0, 2.0], 1),
            Err(FitError::NonFinite)
        );
    }

    #[test]
    fn zero_weights_exclude_outliers() {
        let xs: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let mut ys: Vec<f64> = xs.iter().map(|x| 1.0 + 0.5 * x).collect();
        ys[3] = 100.0;
        let mut w = vec![1.0; xs.len()];
        w[3] = 0.0;
        let c = fit_polynomial_weighted(&xs, &ys, &w, 2).unwrap();
        assert!((c[0] - 1.0).abs() < 1e-9 && (c[1] - 0.5).abs() < 1e-9);

        let all_zero = vec![0.0; xs.len()];
        assert!(matches!(
            fit_polynomial_weighted(&xs, &ys, &all_zero, 1),
            Err(FitError::Underdetermined { samples: 0, .. })
        ));
    }

    #[test]
    fn shifted_expansion_matches_direct_evaluation() {
        let d = [1.0, -2.0, 0.5, 3.0];
        let c = expand_shifted(&d, 4.0, 2.0);
        for x in [-3.0, 0.0, 1.5, 4.0, 7.0] {
            let t: f64 = (x - 4.0) / 2.0;
            let direct = d[0] + d[1] * t + d[2] * t * t + d[3] * t * t * t;
            assert!((eval_polynomial_f64(&c, x) - direct).abs() < 1e-9);
        }
    }

    #[test]
    fn high_order_fits_on_tall_frames_are_well_posed() {
        let truth = |x: f64| 100.0 + 0.05 * x + 1e-4 * x * x;
        for height in [400usize, 720, 1080] {
            let xs: Vec<f64> = (0..height).rev().step_by(5).map(|i| i as f64).collect();
            let ys: Vec<f64> = xs.iter().map(|&x| truth(x)).collect();
            for n in [4usize, 5, 6] {
                let c = fit_polynomial(&xs, &ys, n)
                    .unwrap_or_else(|e| panic!("h={height} n={n}: {e}"));
                assert_eq!(c.len(), n);
                let worst = xs
                    .iter()
                    .map(|&x| (eval_polynomial_f64(&c, x) - truth(x)).abs())
                    .fold(0.0, f64::max);
                assert!(worst < 1e-4, "h={height} n={n} residual {worst}");
            }
        }
    }

    #[test]
    fn evaluation_truncates_toward_zero() {
        assert_eq!(eval_polynomial(&[39.9], 0.0), 39);
        assert_eq!(eval_polynomial(&[-2.7], 0.0), -2);
        assert_eq!(eval_polynomial(&[1.0, 0.5, 0.25], 2.0), 3);
        assert_eq!(eval_polynomial(&[], 5.0), 0);
    }
}
