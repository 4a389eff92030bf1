//! Error types for the detection service
//!
//! The detection core is infallible. Errors come from the edges:
//! - Config: missing home directory, unreadable or invalid config file
//! - Input: email/task/signal batches that cannot be read or parsed
//! - Service: suggestion actions refused by validation or the task store

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration or input batches
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Could not find home directory")]
    HomeDirNotFound,

    #[error("Failed to read config {path}: {message}")]
    ConfigRead { path: PathBuf, message: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to read input {path}: {message}")]
    InputRead { path: PathBuf, message: String },

    #[error("Failed to parse input {path}: {message}")]
    InputParse { path: PathBuf, message: String },
}

impl DetectionError {
    /// Returns true if the problem lives in the config file rather than the inputs
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DetectionError::HomeDirNotFound
                | DetectionError::ConfigRead { .. }
                | DetectionError::ConfigParse { .. }
                | DetectionError::InvalidConfig(_)
        )
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DetectionError::HomeDirNotFound => "Set HOME or pass --config with an explicit path.",
            DetectionError::ConfigRead { .. } => "Check the config file exists and is readable.",
            DetectionError::ConfigParse { .. } => {
                "Check ~/.taskscan/config.json is valid JSON with camelCase keys."
            }
            DetectionError::InvalidConfig(_) => {
                "Fix the thresholds in ~/.taskscan/config.json or delete it to use defaults."
            }
            DetectionError::InputRead { .. } => "Check the input path and file permissions.",
            DetectionError::InputParse { .. } => {
                "Inputs must be JSON arrays of emails or tasks with camelCase fields."
            }
        }
    }
}

/// Errors from acting on a completion suggestion
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Suggestion failed validation: {0}")]
    InvalidSuggestion(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task already complete: {0}")]
    TaskAlreadyComplete(String),

    #[error("Task store error: {0}")]
    Store(String),
}

/// Serializable error representation for JSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub message: String,
    pub error_type: ErrorType,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Config,
    Input,
}

impl From<&DetectionError> for ErrorReport {
    fn from(err: &DetectionError) -> Self {
        let error_type = if err.is_config_error() {
            ErrorType::Config
        } else {
            ErrorType::Input
        };

        ErrorReport {
            message: err.to_string(),
            error_type,
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
