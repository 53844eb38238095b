use super::{read_json, LaneConfig};
use crate::error::LaneError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config for the `lane_demo` tool: input frame, outputs, and the pipeline record.
#[derive(Debug, Deserialize)]
pub struct LaneDemoConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    pub output: LaneDemoOutputConfig,
    #[serde(flatten)]
    pub pipeline: LaneConfig,
}

#[derive(Debug, Deserialize)]
pub struct LaneDemoOutputConfig {
    #[serde(rename = "annotated_image")]
    pub annotated_image: PathBuf,
    #[serde(rename = "report_json")]
    pub report_json: PathBuf,
    #[serde(default)]
    pub birdseye_image: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<LaneDemoConfig, LaneError> {
    let config: LaneDemoConfig = read_json(path)?;
    config.pipeline.validate()?;
    Ok(config)
}
