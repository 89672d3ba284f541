//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic milliseconds)
//! - Frame scheduling (once per display refresh)

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use native::InstantClock;
#[cfg(target_arch = "wasm32")]
pub use web::{AnimationFrameScheduler, PerformanceClock};

/// Frame callback handed to a scheduler
pub type FrameCallback = Box<dyn FnOnce()>;

/// Monotonic, non-decreasing time source in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Runs a callback once at the next display refresh.
///
/// Callbacks run in request order, each to completion before the next.
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback);
}

/// Clock driven by hand (tests, fixed-rate headless runs)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move time forward; negative steps are ignored
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms.max(0.0));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// FIFO scheduler pumped by the host loop
#[derive(Default)]
pub struct QueueScheduler {
    queue: RefCell<VecDeque<FrameCallback>>,
}

impl QueueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks waiting for the next refresh
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the callbacks queued before this refresh.
    ///
    /// Callbacks requested while pumping wait for the next refresh.
    /// Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let due: Vec<FrameCallback> = self.queue.borrow_mut().drain(..).collect();
        let count = due.len();
        for callback in due {
            callback();
        }
        count
    }
}

impl FrameScheduler for QueueScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push_back(callback);
    }
}
