//! Row-by-row lane boundary search over a binary birdseye image.
//!
//! The scan walks rows from the bottom of the image to the top at a fixed
//! stride. Each side keeps a running seed column; on every row it
//! searches outward from the seed in `col_step` increments up to `threshold`
//! pixels and moves the seed to the first "on" pixel it meets. Rows without
//! evidence emit the carried-forward seed, so every scanned row yields exactly
//! one sample per side.
//!
//! Search order is biased towards the lane interior: the left side checks
//! `seed + j` before `seed - j`, the right side `seed - j` before `seed + j`.
//! Columns outside `[0, width)` count as "off".

use crate::image::u8::ON;
use crate::image::ImageView;
use crate::types::{Sample, ScanResult, ScanRow};
use serde::Serialize;

/// Validated scan parameters.
///
/// Build through [`ScanParams::new`] (or the config layer) so the step sizes
/// are guaranteed to make progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScanParams {
    /// Maximum lateral search distance from the seed, in pixels.
    pub threshold: usize,
    /// Row sampling stride.
    pub row_step: usize,
    /// Lateral search stride.
    pub col_step: usize,
    /// Left seed as a percentage of image width.
    pub left_start: u32,
    /// Right seed as a percentage of image width.
    pub right_start: u32,
}

impl ScanParams {
    pub fn new(
        threshold: i64,
        row_step: i64,
        col_step: i64,
        left_start: i64,
        right_start: i64,
    ) -> Result<Self, String> {
        let positive = |name: &str, v: i64| {
            usize::try_from(v)
                .ok()
                .filter(|&v| v > 0)
                .ok_or_else(|| format!("detector.{name} must be > 0, got {v}"))
        };
        let threshold = positive("threshold", threshold)?;
        let row_step = positive("row_step", row_step)?;
        let col_step = positive("col_step", col_step)?;
        if !(0..=100).contains(&left_start) || !(0..=100).contains(&right_start) {
            return Err(format!(
                "detector.start values must lie in 0..=100, got left={left_start} right={right_start}"
            ));
        }
        if left_start >= right_start {
            return Err(format!(
                "detector.start.left ({left_start}) must be less than detector.start.right ({right_start})"
            ));
        }
        Ok(Self {
            threshold,
            row_step,
            col_step,
            left_start: left_start as u32,
            right_start: right_start as u32,
        })
    }

    /// Initial `(left, right)` seed columns for an image of `width` pixels.
    pub fn seeds(&self, width: usize) -> (i64, i64) {
        let w = width as i64;
        (
            w * i64::from(self.left_start) / 100,
            w * i64::from(self.right_start) / 100,
        )
    }

    /// Number of rows visited for an image of `height` rows.
    pub fn row_count(&self, height: usize) -> usize {
        height.div_ceil(self.row_step)
    }
}

#[derive(Clone, Debug)]
pub struct BoundaryScanner {
    params: ScanParams,
}

impl BoundaryScanner {
    pub fn new(params: ScanParams) -> Self {
        Self { params }
    }

    /// Lazily scans a `width × height` grid whose pixels are tested by `is_on(col, row)`.
    ///
    /// `is_on` is only called with in-range coordinates.
    pub fn rows<F>(&self, width: usize, height: usize, is_on: F) -> BoundaryScan<F>
    where
        F: FnMut(usize, usize) -> bool,
    {
        let (left_seed, right_seed) = self.params.seeds(width);
        BoundaryScan {
            params: self.params,
            width,
            next_row: height.checked_sub(1),
            left_seed,
            right_seed,
            is_on,
        }
    }

    /// Scans a binary image, treating pixels equal to 255 as lane evidence.
    pub fn scan<I>(&self, img: &I) -> ScanResult
    where
        I: ImageView<Pixel = u8>,
    {
        self.rows(img.width(), img.height(), |x, y| img.row(y)[x] == ON)
            .collect()
    }
}

/// Iterator yielding one [`ScanRow`] per scanned row, bottom to top.
pub struct BoundaryScan<F> {
    params: ScanParams,
    width: usize,
    next_row: Option<usize>,
    left_seed: i64,
    right_seed: i64,
    is_on: F,
}

impl<F> BoundaryScan<F>
where
    F: FnMut(usize, usize) -> bool,
{
    /// Current `(left, right)` seed columns.
    pub fn seeds(&self) -> (i64, i64) {
        (self.left_seed, self.right_seed)
    }

    fn is_hit(&mut self, col: i64, row: usize) -> bool {
        col >= 0 && (col as usize) < self.width && (self.is_on)(col as usize, row)
    }

    /// Searches around `seed`, checking `seed + toward * j` first.
    fn search(&mut self, row: usize, seed: i64, toward: i64) -> Option<i64> {
        let ScanParams {
            threshold,
            col_step,
            ..
        } = self.params;
        for j in (0..=threshold).step_by(col_step) {
            let j = j as i64;
            let first = seed + toward * j;
            if self.is_hit(first, row) {
                return Some(first);
            }
            let second = seed - toward * j;
            if self.is_hit(second, row) {
                return Some(second);
            }
        }
        None
    }
}

impl<F> Iterator for BoundaryScan<F>
where
    F: FnMut(usize, usize) -> bool,
{
    type Item = ScanRow;

    fn next(&mut self) -> Option<ScanRow> {
        let row = self.next_row?;
        self.next_row = row.checked_sub(self.params.row_step);

        let left_hit = self.search(row, self.left_seed, 1);
        if let Some(col) = left_hit {
            self.left_seed = col;
        }
        let right_hit = self.search(row, self.right_seed, -1);
        if let Some(col) = right_hit {
            self.right_seed = col;
        }

        Some(ScanRow {
            left: Sample {
                row,
                col: self.left_seed,
            },
            right: Sample {
                row,
                col: self.right_seed,
            },
            left_hit: left_hit.is_some(),
            right_hit: right_hit.is_some(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self
            .next_row
            .map_or(0, |r| r / self.params.row_step + 1);
        (n, Some(n))
    }
}

impl<F> ExactSizeIterator for BoundaryScan<F> where F: FnMut(usize, usize) -> bool {}
