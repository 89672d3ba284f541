//! Startup configuration
//!
//! Read once when the field is created; never updated while running.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("viewport must be finite and positive, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("speed must be finite and positive, got {0}")]
    InvalidSpeed(f64),
    #[error("radii must be finite and non-negative (max {max}, min {min})")]
    InvalidRadius { max: f64, min: f64 },
    #[error("min radius {min} exceeds max radius {max}")]
    RadiusOrder { max: f64, min: f64 },
    #[error("deflection spread must be finite and non-negative, got {0}")]
    InvalidSpread(f64),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
    /// Speed magnitude (V) held by every ball
    pub speed: f64,
    /// Display radius away from edges
    pub max_radius: f64,
    /// Deep penetration threshold that triggers a bounce
    pub min_radius: f64,
    /// Maximum random perturbation applied on bounce
    pub deflection_spread: f64,
    /// Number of balls (N)
    pub population: u32,
    /// Run seed; `None` lets the host pick one
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            speed: BALL_SPEED,
            max_radius: MAX_RADIUS,
            min_radius: MIN_RADIUS,
            deflection_spread: RANDOM_DIFF,
            population: BALL_COUNT,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Default configuration for a viewport of the given size
    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the values the physics relies on.
    ///
    /// A viewport smaller than a ball is accepted; the spawner centers balls
    /// on such an axis.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !positive(self.width) || !positive(self.height) {
            return Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        if !positive(self.speed) {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if !non_negative(self.max_radius) || !non_negative(self.min_radius) {
            return Err(ConfigError::InvalidRadius {
                max: self.max_radius,
                min: self.min_radius,
            });
        }
        if self.min_radius > self.max_radius {
            return Err(ConfigError::RadiusOrder {
                max: self.max_radius,
                min: self.min_radius,
            });
        }
        if !non_negative(self.deflection_spread) {
            return Err(ConfigError::InvalidSpread(self.deflection_spread));
        }
        Ok(())
    }

    /// Whether balls fit inside the viewport at full radius on both axes
    pub fn fits_viewport(&self) -> bool {
        self.width > 2.0 * self.max_radius && self.height > 2.0 * self.max_radius
    }
}
