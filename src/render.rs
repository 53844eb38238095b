//! Projects fitted lane curves back onto the camera frame.
//!
//! Curves are drawn as straight strokes in birdseye space on a blank canvas,
//! the canvas is warped into camera space in one pass, and canvas pixels
//! carrying the marker value are copied onto the frame at a coarse stride.

use crate::homography::HomographyError;
use crate::image::{ImageView, ImageViewMut, RgbImageU8};
use crate::lane::Lane;
use crate::polyfit::eval_polynomial;
use crate::warp::warp_perspective;
use nalgebra::Matrix3;
use serde::Deserialize;

/// Largest accepted marker or overlay radius, in pixels.
pub const MAX_RADIUS: i64 = 64;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Radius of the disc stamped per row in birdseye space.
    pub marker_radius: i64,
    /// Marker intensity written into `channel`.
    pub sentinel: u8,
    /// Colour channel (0 = R, 1 = G, 2 = B) carrying the sentinel.
    pub channel: usize,
    /// Row/column stride of the copy pass.
    pub sample_stride: usize,
    /// Radius of the dot drawn on the frame for each matching pixel.
    pub overlay_radius: i64,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            marker_radius: 3,
            sentinel: 150,
            channel: 2,
            sample_stride: 2,
            overlay_radius: 1,
        }
    }
}

impl RenderParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.channel > 2 {
            return Err(format!("render.channel must be 0..=2, got {}", self.channel));
        }
        if self.sample_stride == 0 {
            return Err("render.sample_stride must be >= 1".to_string());
        }
        for (name, radius) in [
            ("marker_radius", self.marker_radius),
            ("overlay_radius", self.overlay_radius),
        ] {
            if !(0..=MAX_RADIUS).contains(&radius) {
                return Err(format!(
                    "render.{name} must be 0..={MAX_RADIUS}, got {radius}"
                ));
            }
        }
        if self.sentinel == 0 {
            return Err("render.sentinel must differ from the blank background".to_string());
        }
        Ok(())
    }

    /// Pure marker colour: sentinel in `channel`, zero elsewhere.
    pub fn marker_color(&self) -> [u8; 3] {
        let mut c = [0u8; 3];
        c[self.channel] = self.sentinel;
        c
    }
}

/// Fills a disc of `radius` centred at `(cx, cy)`, clipped to the image.
pub fn stamp_disc<I>(img: &mut I, cx: i64, cy: i64, radius: i64, value: I::Pixel)
where
    I: ImageViewMut,
{
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                img.put_checked(cx + dx, cy + dy, value);
            }
        }
    }
}

/// Draws every curve of `lane` into a blank birdseye canvas the size of `like`.
pub fn draw_curves(like: &RgbImageU8, lane: &Lane, params: &RenderParams) -> RgbImageU8 {
    let mut canvas = like.blank_like();
    let color = params.marker_color();
    for curve in lane.curves() {
        for row in 0..canvas.height() {
            let col = eval_polynomial(curve, row as f64);
            stamp_disc(
                &mut canvas,
                i64::from(col),
                row as i64,
                params.marker_radius,
                color,
            );
        }
    }
    canvas
}

/// Overlays both lane curves onto `frame` using the birdseye→camera matrix.
pub fn draw_lane(
    frame: &mut RgbImageU8,
    lane: &Lane,
    inverse: &Matrix3<f64>,
    params: &RenderParams,
) -> Result<(), HomographyError> {
    let canvas = draw_curves(frame, lane, params);
    let mut warped = frame.blank_like();
    warp_perspective(&canvas, inverse, &mut warped)?;

    let color = params.marker_color();
    let step = params.sample_stride.max(1);
    for y in (0..warped.height()).step_by(step) {
        for x in (0..warped.width()).step_by(step) {
            if warped.get(x, y)[params.channel] == params.sentinel {
                stamp_disc(frame, x as i64, y as i64, params.overlay_radius, color);
            }
        }
    }
    Ok(())
}
