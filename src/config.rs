//! Tracker configuration
//!
//! Every field has a default, so `{}` is a valid configuration file.

use crate::error::{TrackerError, TrackerResult};
use crate::input::CursorStyle;
use crate::trackers::{FollowerConfig, DEFAULT_CLICK_WINDOW_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackersConfig {
    pub click_counter: ClickCounterConfig,
    pub follower: FollowerConfig,
    pub clicks: ClicksConfig,
    pub cursor: CursorConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClickCounterConfig {
    pub window_ms: f64,
}

impl Default for ClickCounterConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_CLICK_WINDOW_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClicksConfig {
    pub prevent_context_menu: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CursorConfig {
    pub style: CursorStyle,
}

impl TrackersConfig {
    pub fn from_json_str(json: &str) -> TrackerResult<Self> {
        let config: TrackersConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> TrackerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> TrackerResult<()> {
        let window = self.click_counter.window_ms;
        if !window.is_finite() || window <= 0.0 {
            tracing::warn!("invalid clickCounter.windowMs: {}", window);
            return Err(TrackerError::InvalidWindow(window));
        }
        if let Err(e) = self.follower.validate() {
            tracing::warn!("invalid follower config: {}", e);
            return Err(e);
        }
        Ok(())
    }
}
