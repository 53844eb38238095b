//! JSON configuration for the lane detector.
//!
//! ```json
//! {
//!   "detector": { "threshold": 40, "row_step": 5, "col_step": 1,
//!                 "start": { "left": 20, "right": 80 } },
//!   "lane": { "coefficients": 3 }
//! }
//! ```
//!
//! Only `detector` is required; `lane`, `perspective`, `thresholder` and
//! `render` fall back to their defaults. Scan parameters are read as signed
//! integers so that negative values are reported as invalid configuration.

pub mod demo;

use crate::error::LaneError;
use crate::perspective::PerspectiveAnchors;
use crate::preprocess::ThresholdParams;
use crate::render::RenderParams;
use crate::scanner::ScanParams;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct LaneConfig {
    pub detector: DetectorConfig,
    #[serde(default)]
    pub lane: LaneShapeConfig,
    #[serde(default)]
    pub perspective: PerspectiveAnchors,
    #[serde(default)]
    pub thresholder: ThresholdParams,
    #[serde(default)]
    pub render: RenderParams,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DetectorConfig {
    pub threshold: i64,
    pub row_step: i64,
    pub col_step: i64,
    pub start: StartConfig,
}

/// Seed positions as percentages of the image width.
#[derive(Clone, Debug, Deserialize)]
pub struct StartConfig {
    pub left: i64,
    pub right: i64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LaneShapeConfig {
    /// Coefficients per curve (polynomial order + 1).
    pub coefficients: usize,
}

impl Default for LaneShapeConfig {
    fn default() -> Self {
        Self { coefficients: 3 }
    }
}

impl DetectorConfig {
    pub fn to_params(&self) -> Result<ScanParams, LaneError> {
        ScanParams::new(
            self.threshold,
            self.row_step,
            self.col_step,
            self.start.left,
            self.start.right,
        )
        .map_err(LaneError::InvalidConfig)
    }
}

impl LaneConfig {
    /// Checks every section; the first violation is reported.
    pub fn validate(&self) -> Result<ScanParams, LaneError> {
        let params = self.detector.to_params()?;
        if self.lane.coefficients == 0 {
            return Err(LaneError::InvalidConfig(
                "lane.coefficients must be >= 1".to_string(),
            ));
        }
        self.thresholder
            .validate()
            .and_then(|_| self.render.validate())
            .map_err(LaneError::InvalidConfig)?;
        Ok(params)
    }
}

/// Deserializes `json`; `origin` only labels the error.
pub(crate) fn parse_json<T: DeserializeOwned>(json: &str, origin: &Path) -> Result<T, LaneError> {
    serde_json::from_str(json).map_err(|source| LaneError::ConfigParse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Reads and deserializes a JSON file without further validation.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LaneError> {
    let data = fs::read_to_string(path).map_err(|source| LaneError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&data, path)
}

pub fn parse_config(json: &str, origin: &Path) -> Result<LaneConfig, LaneError> {
    parse_json(json, origin)
}

pub fn load_config(path: &Path) -> Result<LaneConfig, LaneError> {
    let config: LaneConfig = read_json(path)?;
    config.validate()?;
    Ok(config)
}
