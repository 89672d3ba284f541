//! Bounce entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement};

    use bounce::driver::{self, Driver, FrameSink};
    use bounce::platform::{AnimationFrameScheduler, PerformanceClock};
    use bounce::renderer::{RenderState, frame_vertices};
    use bounce::sim::Snapshot;
    use bounce::SimConfig;

    /// Draws frames to the canvas and the FPS readout to the HUD
    struct CanvasSink {
        render_state: RenderState,
        fps_el: Option<Element>,
        shown_fps: Option<u32>,
    }

    impl CanvasSink {
        fn update_hud(&mut self, fps: u32) {
            if self.shown_fps == Some(fps) {
                return;
            }
            if let Some(el) = &self.fps_el {
                el.set_text_content(Some(&format!("FPS: {fps}")));
            }
            self.shown_fps = Some(fps);
        }
    }

    impl FrameSink for CanvasSink {
        fn present(&mut self, snapshot: &Snapshot, fps: u32) {
            let vertices = frame_vertices(snapshot);
            match self.render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
            self.update_hud(fps);
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Bounce starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Simulation runs in CSS pixels; the surface uses device pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = SimConfig::with_viewport(client_w as f64, client_h as f64);
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let seed = js_sys::Date::now() as u64;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let viewport = Vec2::new(client_w as f32, client_h as f32);
        let render_state = RenderState::new(surface, &adapter, width, height, viewport)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let sink = CanvasSink {
            render_state,
            fps_el: document.get_element_by_id("fps"),
            shown_fps: None,
        };
        let clock = PerformanceClock::new().ok_or("no performance timer")?;
        let driver = Rc::new(RefCell::new(Driver::new(config, seed, clock, sink)));

        driver::run(driver, Rc::new(AnimationFrameScheduler));

        log::info!("Bounce running!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use bounce::driver::{self, Driver, FrameSink};
    use bounce::platform::{InstantClock, QueueScheduler};
    use bounce::sim::Snapshot;
    use bounce::{ConfigError, SimConfig};

    /// Frames to run when `BOUNCE_FRAMES` is unset
    const DEFAULT_FRAMES: u64 = 600;
    /// Pacing between frames (~60 Hz)
    const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

    /// Frames between summaries (~1s at the headless pacing)
    const LOG_INTERVAL_FRAMES: u64 = 60;

    /// Logs a summary of the field every `LOG_INTERVAL_FRAMES` frames
    /// instead of drawing
    #[derive(Default)]
    struct LogSink {
        summaries: u64,
    }

    impl FrameSink for LogSink {
        fn present(&mut self, snapshot: &Snapshot, fps: u32) {
            if snapshot.frame % LOG_INTERVAL_FRAMES != 0 {
                return;
            }
            self.summaries += 1;
            let visible = snapshot.balls().iter().filter(|b| b.is_visible()).count();
            log::info!(
                "frame {}: FPS {} ({}/{} balls visible)",
                snapshot.frame,
                fps,
                visible,
                snapshot.len()
            );
            if let Some(ball) = snapshot.balls().first() {
                log::debug!(
                    "ball {} ({}) at {} moving {}",
                    ball.id,
                    ball.color.hex(),
                    ball.pos,
                    ball.vel
                );
            }
        }
    }

    fn load_config() -> Result<SimConfig, ConfigError> {
        match std::env::args().nth(1) {
            Some(path) => {
                log::info!("Loading config from {}", path);
                SimConfig::load(path)
            }
            None => {
                let config = SimConfig::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let config = load_config()?;
        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });
        let frames = std::env::var("BOUNCE_FRAMES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FRAMES);

        log::info!("Running {} frames headless", frames);

        let driver = Rc::new(RefCell::new(
            Driver::new(config, seed, InstantClock::new(), LogSink::default())
                .with_frame_limit(frames),
        ));
        let scheduler = Rc::new(QueueScheduler::new());

        driver::run(Rc::clone(&driver), Rc::clone(&scheduler));
        while scheduler.run_frame() > 0 {
            std::thread::sleep(FRAME_INTERVAL);
        }

        let d = driver.borrow();
        log::info!(
            "Finished at {} fps ({} summaries logged)",
            d.fps(),
            d.sink().summaries
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bounce (native, headless) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
