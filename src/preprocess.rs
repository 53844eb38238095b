//! Thresholder turning a camera frame into a binary lane-evidence image.
//!
//! Steps:
//! 1. Convert RGB to grayscale (BT.601 luma weights).
//! 2. Separable Gaussian blur with replicated borders.
//! 3. Binary threshold: `v > cutoff → 255`, else `0`.

use crate::image::u8::ON;
use crate::image::{GrayImageU8, ImageF32, ImageView, ImageViewMut, RgbImageU8};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThresholdParams {
    /// Gray level a blurred pixel must exceed to count as lane evidence.
    pub cutoff: u8,
    /// Gaussian kernel length (odd).
    pub blur_size: usize,
    pub blur_sigma: f32,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            cutoff: 185,
            blur_size: 7,
            blur_sigma: 1.5,
        }
    }
}

impl ThresholdParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.blur_size == 0 || self.blur_size % 2 == 0 {
            return Err(format!(
                "thresholder.blur_size must be odd and >= 1, got {}",
                self.blur_size
            ));
        }
        if !(self.blur_sigma.is_finite() && self.blur_sigma > 0.0) {
            return Err(format!(
                "thresholder.blur_sigma must be > 0, got {}",
                self.blur_sigma
            ));
        }
        Ok(())
    }
}

/// Normalised Gaussian taps of length `size` (odd).
pub fn gaussian_taps(size: usize, sigma: f32) -> Vec<f32> {
    let half = (size / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - half;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = raw.iter().sum();
    raw.into_iter().map(|v| v / sum).collect()
}

pub fn to_gray(frame: &RgbImageU8) -> ImageF32 {
    let mut out = ImageF32::new(frame.width(), frame.height());
    for y in 0..frame.height() {
        let src = frame.row(y);
        for (dst, px) in out.row_mut(y).iter_mut().zip(src) {
            *dst = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
        }
    }
    out
}

/// Separable convolution with `taps` along x then y; borders replicate.
pub fn blur_separable(inp: &ImageF32, taps: &[f32]) -> ImageF32 {
    let (w, h) = (inp.w, inp.h);
    let half = (taps.len() / 2) as isize;
    let clamp = |v: isize, n: usize| v.clamp(0, n as isize - 1) as usize;

    let mut tmp = ImageF32::new(w, h);
    for y in 0..h {
        let src = inp.row(y);
        for (x, dst) in tmp.row_mut(y).iter_mut().enumerate() {
            *dst = taps
                .iter()
                .enumerate()
                .map(|(k, t)| t * src[clamp(x as isize + k as isize - half, w)])
                .sum();
        }
    }
    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v = taps
                .iter()
                .enumerate()
                .map(|(k, t)| t * tmp.get(x, clamp(y as isize + k as isize - half, h)))
                .sum();
            out.set(x, y, v);
        }
    }
    out
}

/// Full thresholding pass: gray, blur, binarize.
pub fn threshold(frame: &RgbImageU8, params: &ThresholdParams) -> GrayImageU8 {
    let gray = to_gray(frame);
    let blurred = if frame.width() == 0 || frame.height() == 0 {
        gray
    } else {
        blur_separable(&gray, &gaussian_taps(params.blur_size, params.blur_sigma))
    };
    let cutoff = params.cutoff as f32;
    let mut out = GrayImageU8::new(frame.width(), frame.height());
    for y in 0..blurred.h {
        let src = blurred.row(y);
        for (dst, &v) in out.row_mut(y).iter_mut().zip(src) {
            *dst = if v > cutoff { ON } else { 0 };
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taps_are_normalised_and_symmetric() {
        let taps = gaussian_taps(7, 1.5);
        assert_eq!(taps.len(), 7);
        assert!((taps.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((taps[0] - taps[6]).abs() < 1e-7);
        assert!(taps[3] > taps[2]);
    }

    #[test]
    fn bright_stripe_survives_and_dark_background_drops() {
        let (w, h) = (40, 20);
        let mut frame = RgbImageU8::new(w, h);
        for y in 0..h {
            for x in 18..23 {
                frame.set(x, y, [255, 255, 255]);
            }
        }
        let bin = threshold(&frame, &ThresholdParams::default());
        assert_eq!(bin.get(20, 10), ON);
        assert_eq!(bin.get(5, 10), 0);
        assert_eq!(bin.get(35, 0), 0);
    }

    #[test]
    fn dim_frame_is_all_off() {
        let frame = RgbImageU8::filled(10, 10, [180, 180, 180]);
        let bin = threshold(&frame, &ThresholdParams::default());
        assert!(bin.as_slice().unwrap().iter().all(|&v| v == 0));
    }

    #[test]
    fn even_blur_size_rejected() {
        let p = ThresholdParams {
            blur_size: 6,
            ..Default::default()
        };
        assert!(p.validate().is_err());
        assert!(ThresholdParams::default().validate().is_ok());
    }
}
