use lane_detector::image::u8::ON;
use lane_detector::image::{GrayImageU8, RgbImageU8};

/// Binary birdseye image with full-height vertical lines at `columns`.
pub fn vertical_lines_u8(width: usize, height: usize, columns: &[usize]) -> GrayImageU8 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = GrayImageU8::new(width, height);
    for y in 0..height {
        for &x in columns {
            assert!(x < width, "line column outside image");
            img.set(x, y, ON);
        }
    }
    img
}

/// Binary image with one curved line per closure, `col = f(row)`.
#[allow(dead_code)]
pub fn curves_u8(width: usize, height: usize, curves: &[&dyn Fn(f64) -> f64]) -> GrayImageU8 {
    let mut img = GrayImageU8::new(width, height);
    for y in 0..height {
        for f in curves {
            let x = f(y as f64).round();
            if x >= 0.0 && (x as usize) < width {
                img.set(x as usize, y, ON);
            }
        }
    }
    img
}

/// Dark gray road frame with white lane paint along `columns`.
#[allow(dead_code)]
pub fn painted_frame(width: usize, height: usize, columns: &[usize], half_width: usize) -> RgbImageU8 {
    let mut frame = RgbImageU8::filled(width, height, [60, 60, 60]);
    for y in 0..height {
        for &c in columns {
            for x in c.saturating_sub(half_width)..=(c + half_width).min(width - 1) {
                frame.set(x, y, [255, 255, 255]);
            }
        }
    }
    frame
}
