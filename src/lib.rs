//! Bounce - a field of balls bouncing inside a rectangular viewport
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, per-frame physics, snapshots)
//! - `fps`: Rolling frames-per-second measurement
//! - `driver`: Frame loop tying the simulation, monitor and renderer together
//! - `platform`: Clock and frame scheduler abstractions
//! - `renderer`: WebGPU rendering of a snapshot
//! - `config`: Startup configuration

pub mod config;
pub mod driver;
pub mod fps;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use driver::{Driver, FrameSink, FrameStatus};
pub use fps::FrameRateMonitor;

/// Simulation configuration constants
pub mod consts {
    /// Number of balls in the field
    pub const BALL_COUNT: u32 = 100;
    /// Speed magnitude every ball keeps (pixels per frame)
    pub const BALL_SPEED: f64 = 10.0;
    /// Maximum random perturbation applied to the rebound angle
    pub const RANDOM_DIFF: f64 = 5.0;

    /// Display radius away from the edges
    pub const MAX_RADIUS: f64 = 25.0;
    /// Penetration threshold that actually triggers a bounce
    pub const MIN_RADIUS: f64 = 15.0;

    /// Viewport used when the host does not provide one
    pub const DEFAULT_WIDTH: f64 = 800.0;
    pub const DEFAULT_HEIGHT: f64 = 600.0;

    /// Length of one frame rate window (ms)
    pub const FPS_WINDOW_MS: f64 = 1000.0;
}

/// Speed component left over for one axis when the other axis takes `other`.
///
/// The radicand is clamped at zero so floating-point drift past `speed`
/// never yields NaN.
#[inline]
pub fn complementary_speed(speed: f64, other: f64) -> f64 {
    (speed * speed - other * other).max(0.0).sqrt()
}
