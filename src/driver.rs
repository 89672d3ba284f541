//! Frame loop
//!
//! Each frame: advance the population, hand the new snapshot to the
//! renderer, count the frame, then ask the host for the next one.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::SimConfig;
use crate::fps::FrameRateMonitor;
use crate::platform::{Clock, FrameScheduler};
use crate::sim::{SimState, Snapshot};

/// Consumer of published frames (the renderer)
pub trait FrameSink {
    /// Draw `snapshot`; must not hold on to anything but clones
    fn present(&mut self, snapshot: &Snapshot, fps: u32);
}

/// Whether the loop should request another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// Owns the simulation, the frame rate monitor and the renderer
pub struct Driver<C: Clock, S: FrameSink> {
    state: SimState,
    monitor: FrameRateMonitor,
    clock: C,
    sink: S,
    running: bool,
    /// Stop after this many frames (headless runs)
    frame_limit: Option<u64>,
}

impl<C: Clock, S: FrameSink> Driver<C, S> {
    pub fn new(config: SimConfig, seed: u64, clock: C, sink: S) -> Self {
        let monitor = FrameRateMonitor::new(clock.now_ms());
        Self {
            state: SimState::new(config, seed),
            monitor,
            clock,
            sink,
            running: true,
            frame_limit: None,
        }
    }

    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.state.snapshot()
    }

    pub fn fps(&self) -> u32 {
        self.monitor.fps()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tear down: no frame runs or gets scheduled after this
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Stopping after frame {}", self.state.snapshot().frame);
        }
        self.running = false;
    }

    /// Run one frame
    pub fn frame(&mut self) -> FrameStatus {
        if !self.running {
            return FrameStatus::Stopped;
        }

        let snapshot = self.state.advance();
        self.sink.present(snapshot, self.monitor.fps());

        if self.monitor.tick(self.clock.now_ms()) {
            log::debug!("frame {}: {} fps", snapshot.frame, self.monitor.fps());
        }

        if self.frame_limit.is_some_and(|limit| snapshot.frame >= limit) {
            self.stop();
            return FrameStatus::Stopped;
        }
        FrameStatus::Continue
    }
}

/// Start the frame loop on `scheduler`.
///
/// Every callback runs one frame and requests the next one until the driver
/// stops.
pub fn run<C, S, F>(driver: Rc<RefCell<Driver<C, S>>>, scheduler: Rc<F>)
where
    C: Clock + 'static,
    S: FrameSink + 'static,
    F: FrameScheduler + 'static,
{
    let next = Rc::clone(&scheduler);
    scheduler.request_frame(Box::new(move || {
        let status = driver.borrow_mut().frame();
        if status == FrameStatus::Continue {
            run(driver, next);
        }
    }));
}
