// THEORY:
// Configuration describes *how* an image is sampled and *how often* the live loop runs.
// It deliberately does not expose the pixel thresholds: those live in
// `core_modules::calibration` as fixed calibration data.
//
// Every section carries `#[serde(default)]`, so a JSON file only needs to name the
// values it wants to change.

use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Side length of the square canvas an upload is resampled onto before gating.
pub const DEFAULT_CANVAS_SIZE: u32 = 224;
/// Every Nth pixel is sampled.
pub const DEFAULT_SAMPLE_STRIDE: usize = 8;
/// Live analysis cadence in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 300;
pub const DEFAULT_METRIC_WINDOW: usize = 25;
pub const DEFAULT_MOOD_WINDOW: usize = 30;
pub const DEFAULT_UPDATE_BUFFER: usize = 16;

/// Settings for the upload validity gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Width of the canvas the upload is resampled onto.
    pub canvas_width: u32,
    /// Height of the canvas the upload is resampled onto.
    pub canvas_height: u32,
    /// Sampling stride in pixels.
    pub sample_stride: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            sample_stride: DEFAULT_SAMPLE_STRIDE,
        }
    }
}

/// Settings for the cosmetic skin scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmeticConfig {
    /// Sampling stride in pixels (8 pixels = 32 bytes).
    pub sample_stride: usize,
}

impl Default for CosmeticConfig {
    fn default() -> Self {
        Self {
            sample_stride: DEFAULT_SAMPLE_STRIDE,
        }
    }
}

/// Settings for the live-video session driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Milliseconds between analysis ticks.
    pub interval_ms: u64,
    /// Number of skin readings kept for display averaging.
    pub metric_window: usize,
    /// Number of mood readings kept for display averaging.
    pub mood_window: usize,
    /// Capacity of the channel carrying per-frame updates to the display.
    pub update_buffer: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            metric_window: DEFAULT_METRIC_WINDOW,
            mood_window: DEFAULT_MOOD_WINDOW,
            update_buffer: DEFAULT_UPDATE_BUFFER,
        }
    }
}

/// Top-level configuration for every entry point of the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub gate: GateConfig,
    pub cosmetic: CosmeticConfig,
    pub live: LiveConfig,
}

impl VisionConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: VisionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.gate.validate()?;
        self.cosmetic.validate()?;
        self.live.validate()
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(VisionError::Config("gate canvas dimensions must be non-zero".into()));
        }
        if self.sample_stride == 0 {
            return Err(VisionError::InvalidStride);
        }
        Ok(())
    }
}

impl CosmeticConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_stride == 0 {
            return Err(VisionError::InvalidStride);
        }
        Ok(())
    }
}

impl LiveConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(VisionError::Config("live interval must be non-zero".into()));
        }
        if self.metric_window == 0 || self.mood_window == 0 {
            return Err(VisionError::Config("history windows must hold at least one reading".into()));
        }
        if self.update_buffer == 0 {
            return Err(VisionError::Config("update buffer must be non-zero".into()));
        }
        Ok(())
    }
}
