//! Frame rate measurement
//!
//! Counts frames and publishes a rounded frames-per-second figure once per
//! window. The last figure is held until the next window closes.

use crate::consts::FPS_WINDOW_MS;

#[derive(Debug, Clone)]
pub struct FrameRateMonitor {
    frame_count: u32,
    /// Start of the current window (ms)
    window_start: f64,
    current_fps: u32,
}

impl FrameRateMonitor {
    /// Start the first window at `now` (ms)
    pub fn new(now: f64) -> Self {
        Self {
            frame_count: 0,
            window_start: now,
            current_fps: 0,
        }
    }

    /// Last published rate (0 until the first window closes)
    pub fn fps(&self) -> u32 {
        self.current_fps
    }

    /// Frames counted in the current window
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Record one frame at `now` (ms, monotonic).
    ///
    /// Returns true when a window closed and a new rate was published.
    pub fn tick(&mut self, now: f64) -> bool {
        self.frame_count += 1;

        let elapsed = now - self.window_start;
        if elapsed < FPS_WINDOW_MS {
            return false;
        }

        self.current_fps = (self.frame_count as f64 / elapsed * 1000.0).round() as u32;
        self.frame_count = 0;
        self.window_start = now;
        log::debug!("fps: {}", self.current_fps);
        true
    }
}
