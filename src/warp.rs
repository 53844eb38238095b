//! Whole-image perspective warp with nearest-neighbour sampling.
//!
//! `m` maps source coordinates to destination coordinates; every destination
//! pixel is filled by pulling the source pixel under `m⁻¹`. Destination pixels
//! whose pre-image falls outside the source keep their current value, so a
//! pre-filled canvas acts as the background. Nearest sampling keeps marker
//! values bit-exact.

use crate::homography::{project, HomographyError};
use crate::image::{ImageView, ImageViewMut};
use nalgebra::Matrix3;

pub fn warp_perspective<S, D>(
    src: &S,
    m: &Matrix3<f64>,
    dst: &mut D,
) -> Result<(), HomographyError>
where
    S: ImageView,
    D: ImageViewMut<Pixel = S::Pixel>,
{
    let inv = m.try_inverse().ok_or(HomographyError::Singular)?;
    let (sw, sh) = (src.width() as f64, src.height() as f64);
    for y in 0..dst.height() {
        let row = dst.row_mut(y);
        for (x, px) in row.iter_mut().enumerate() {
            let Some([sx, sy]) = project(&inv, x as f64, y as f64) else {
                continue;
            };
            let (sx, sy) = (sx.round(), sy.round());
            if sx < 0.0 || sy < 0.0 || sx >= sw || sy >= sh {
                continue;
            }
            *px = src.row(sy as usize)[sx as usize];
        }
    }
    Ok(())
}
