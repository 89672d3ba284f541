//! Initial population

use glam::DVec2;
use rand::Rng;

use super::state::{Ball, Color};
use crate::complementary_speed;
use crate::config::SimConfig;

/// Uniform position on one axis that keeps a ball of `radius` inside
/// `extent`. Axes too small for the ball put it at the center.
fn spawn_coord<R: Rng + ?Sized>(rng: &mut R, radius: f64, extent: f64) -> f64 {
    let span = extent - radius * 2.0;
    if span <= 0.0 {
        return extent / 2.0;
    }
    rng.random::<f64>() * span + radius
}

/// Random 24-bit color
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::from_u32(rng.random_range(0..=0xFF_FFFF))
}

/// Create a single ball with random position, direction and color.
///
/// `vel.x` is uniform in `[-V, V]` and `vel.y` takes whatever is left of the
/// speed budget, with a random sign, so `|vel| == V` exactly.
pub fn spawn<R: Rng + ?Sized>(id: u32, config: &SimConfig, rng: &mut R) -> Ball {
    let speed = config.speed;
    let vx = rng.random::<f64>() * speed * 2.0 - speed;
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let vy = complementary_speed(speed, vx) * sign;

    let x = spawn_coord(rng, config.max_radius, config.width);
    let y = spawn_coord(rng, config.max_radius, config.height);

    Ball {
        id,
        pos: DVec2::new(x, y),
        vel: DVec2::new(vx, vy),
        radius_x: config.max_radius,
        radius_y: config.max_radius,
        color: random_color(rng),
    }
}

/// Spawn the whole population with ids `0..population`
pub fn spawn_population<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Vec<Ball> {
    if !config.fits_viewport() {
        log::warn!(
            "Viewport {}x{} is too small for radius {}; centering balls on the short axis",
            config.width,
            config.height,
            config.max_radius
        );
    }
    (0..config.population)
        .map(|id| {
            let ball = spawn(id, config, rng);
            log::trace!("ball {} spawned at {} color {}", id, ball.pos, ball.color.hex());
            ball
        })
        .collect()
}
