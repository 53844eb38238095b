//! Lane detector orchestrating scan → fit → update, plus render helpers.
//!
//! Overview
//! - [`LaneDetector::get_lanes`] scans a binary birdseye image row by row,
//!   fits one polynomial per side and replaces both curves of the [`Lane`].
//! - [`LaneDetector::draw_lane`] projects the current curves back onto a
//!   camera frame through the birdseye→camera matrix.
//! - [`LaneDetector::transform_matrix`] derives the camera↔birdseye matrices
//!   from the configured anchors.
//! - [`LaneDetector::threshold`] is the optional preprocessing step producing
//!   the binary input.
//!
//! A detector holds only validated, read-only parameters. All per-frame scan
//! state lives inside a single `get_lanes` call, and the `Lane` is passed in
//! by the caller, so one detector can serve any number of lanes.

use crate::config::{self, LaneConfig};
use crate::error::LaneError;
use crate::image::{GrayImageU8, ImageView, RgbImageU8};
use crate::lane::Lane;
use crate::perspective::{PerspectiveAnchors, WarpDirection};
use crate::polyfit::{fit_polynomial, FitError};
use crate::preprocess::{self, ThresholdParams};
use crate::render::{self, RenderParams};
use crate::scanner::{BoundaryScanner, ScanParams};
use crate::types::{DetectionReport, Sample, ScanResult};
use crate::warp::warp_perspective;
use log::{debug, warn};
use nalgebra::Matrix3;
use std::path::Path;
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct LaneDetector {
    scanner: BoundaryScanner,
    anchors: PerspectiveAnchors,
    thresholder: ThresholdParams,
    render: RenderParams,
}

impl LaneDetector {
    /// Detector with the given scan parameters and default anchors,
    /// thresholder and render settings.
    pub fn new(params: ScanParams) -> Self {
        Self {
            scanner: BoundaryScanner::new(params),
            anchors: PerspectiveAnchors::default(),
            thresholder: ThresholdParams::default(),
            render: RenderParams::default(),
        }
    }

    pub fn from_config(cfg: &LaneConfig) -> Result<Self, LaneError> {
        let params = cfg.validate()?;
        Ok(Self {
            scanner: BoundaryScanner::new(params),
            anchors: cfg.perspective.clone(),
            thresholder: cfg.thresholder.clone(),
            render: cfg.render.clone(),
        })
    }

    /// Reads, parses and validates a JSON config. Any failure is fatal.
    pub fn from_config_file(path: &Path) -> Result<Self, LaneError> {
        Self::from_config(&config::load_config(path)?)
    }

    pub fn with_anchors(mut self, anchors: PerspectiveAnchors) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn scan<I>(&self, img: &I) -> ScanResult
    where
        I: ImageView<Pixel = u8>,
    {
        self.scanner.scan(img)
    }

    /// Scans `img`, fits both boundaries with `lane.n()` coefficients and
    /// replaces the lane's curves.
    ///
    /// On a fit failure the lane keeps its previous curves and the error is
    /// returned; reusing or discarding them is up to the caller.
    pub fn get_lanes<I>(&self, img: &I, lane: &mut Lane) -> Result<DetectionReport, LaneError>
    where
        I: ImageView<Pixel = u8>,
    {
        let t0 = Instant::now();
        let scan = self.scanner.scan(img);
        debug!(
            "LaneDetector::get_lanes {}x{} rows={} hits left={} right={}",
            img.width(),
            img.height(),
            scan.left.len(),
            scan.left_hits,
            scan.right_hits
        );

        let (left, right) = fit_sides(&scan.left, &scan.right, lane.n());
        let (left, right) = match (left, right) {
            (Ok(l), Ok(r)) => (l, r),
            (Err(e), _) | (_, Err(e)) => {
                warn!("LaneDetector::get_lanes fit failed -> keeping previous lane: {e}");
                return Err(e.into());
            }
        };
        lane.update(left, right)?;

        let latency_ms = t0.elapsed().as_secs_f64() * 1000.0;
        debug!("LaneDetector::get_lanes latency_ms={latency_ms:.3}");
        Ok(DetectionReport {
            width: img.width(),
            height: img.height(),
            scan,
            lane: lane.clone(),
            latency_ms,
        })
    }

    /// Draws both lane curves onto `frame`; `inverse` maps birdseye → camera.
    pub fn draw_lane(
        &self,
        frame: &mut RgbImageU8,
        lane: &Lane,
        inverse: &Matrix3<f64>,
    ) -> Result<(), LaneError> {
        render::draw_lane(frame, lane, inverse, &self.render)?;
        Ok(())
    }

    /// Camera→birdseye (`ToBirdseye`) or birdseye→camera (`ToCamera`) matrix
    /// for a `width × height` frame.
    pub fn transform_matrix(
        &self,
        width: usize,
        height: usize,
        direction: WarpDirection,
    ) -> Result<Matrix3<f64>, LaneError> {
        Ok(self.anchors.transform_matrix(width, height, direction)?)
    }

    /// Binarizes a camera frame (gray, blur, threshold).
    pub fn threshold(&self, frame: &RgbImageU8) -> GrayImageU8 {
        preprocess::threshold(frame, &self.thresholder)
    }

    /// Warps a binary camera-space image into the birdseye view.
    pub fn to_birdseye(&self, binary: &GrayImageU8) -> Result<GrayImageU8, LaneError> {
        let (w, h) = (binary.width(), binary.height());
        let m = self.transform_matrix(w, h, WarpDirection::ToBirdseye)?;
        let mut out = GrayImageU8::new(w, h);
        warp_perspective(binary, &m, &mut out)?;
        Ok(out)
    }
}

type FitResult = Result<Vec<f64>, FitError>;

fn fit_side(samples: &[Sample], n: usize) -> FitResult {
    let (rows, cols) = ScanResult::fit_inputs(samples);
    fit_polynomial(&rows, &cols, n)
}

#[cfg(feature = "parallel")]
fn fit_sides(left: &[Sample], right: &[Sample], n: usize) -> (FitResult, FitResult) {
    rayon::join(|| fit_side(left, n), || fit_side(right, n))
}

#[cfg(not(feature = "parallel"))]
fn fit_sides(left: &[Sample], right: &[Sample], n: usize) -> (FitResult, FitResult) {
    (fit_side(left, n), fit_side(right, n))
}
