//! Browser platform implementations

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{Clock, FrameCallback, FrameScheduler};

/// `performance.now()`
pub struct PerformanceClock {
    performance: web_sys::Performance,
}

impl PerformanceClock {
    pub fn new() -> Option<Self> {
        let performance = web_sys::window()?.performance()?;
        Some(Self { performance })
    }
}

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        self.performance.now()
    }
}

/// `window.requestAnimationFrame`
#[derive(Default)]
pub struct AnimationFrameScheduler;

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; frame dropped");
            return;
        };
        let closure = Closure::once(move |_time: f64| callback());
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed");
        }
        closure.forget();
    }
}
