//! Tracker errors
//!
//! Event handling itself never fails. Only construction, `start()` and
//! configuration/replay loading return these.

use thiserror::Error;

/// Errors that can occur while configuring or starting a tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Tracker already active: {0}")]
    AlreadyActive(String),

    #[error("Invalid click window: {0}ms (must be finite and > 0)")]
    InvalidWindow(f64),

    #[error("Invalid smoothing factor: {0} (must lie in (0, 1])")]
    InvalidSmoothingFactor(f64),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
