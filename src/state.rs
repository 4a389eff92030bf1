use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DetectionError;
use crate::types::DetectionConfig;

/// Get the canonical config file path (~/.taskscan/config.json)
pub fn config_path() -> Result<PathBuf, DetectionError> {
    let home = dirs::home_dir().ok_or(DetectionError::HomeDirNotFound)?;
    Ok(home.join(".taskscan").join("config.json"))
}

/// Load configuration from ~/.taskscan/config.json.
///
/// A missing file is not an error: the built-in defaults apply.
pub fn load_config() -> Result<DetectionConfig, DetectionError> {
    let path = config_path()?;
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(DetectionConfig::default());
    }
    load_config_from(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<DetectionConfig, DetectionError> {
    let content = fs::read_to_string(path).map_err(|e| DetectionError::ConfigRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let config: DetectionConfig =
        serde_json::from_str(&content).map_err(|e| DetectionError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    config.validate().map_err(DetectionError::InvalidConfig)?;

    if config != DetectionConfig::default() {
        log::warn!(
            "Using non-default detection thresholds from {}: scan >= {}, validate >= {}/{}",
            path.display(),
            config.thresholds.scan_min_confidence,
            config.thresholds.validator_min_confidence,
            config.thresholds.validator_negative_min_confidence
        );
    }

    Ok(config)
}
