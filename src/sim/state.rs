//! Simulation state and core types
//!
//! Everything needed to reproduce a run from its seed lives here.

use std::sync::Arc;

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::spawn::spawn_population;
use super::step::step_all;
use crate::config::SimConfig;

/// 24-bit display color, opaque to physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from the low 24 bits of `rgb` (0xRRGGBB)
    pub const fn from_u32(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    /// CSS style `#RRGGBB`
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Normalized RGBA for vertex colors
    pub fn to_rgba(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: u32,
    pub pos: DVec2,
    /// Displacement per frame; its length is always the configured speed
    pub vel: DVec2,
    /// Horizontal display radius (shrinks near the left/right edges)
    pub radius_x: f64,
    /// Vertical display radius (shrinks near the top/bottom edges)
    pub radius_y: f64,
    pub color: Color,
}

impl Ball {
    /// Whether the ball has any visible extent
    pub fn is_visible(&self) -> bool {
        self.radius_x > 0.0 && self.radius_y > 0.0
    }
}

/// Immutable population at a single frame.
///
/// Cloning shares the ball list; a new frame always builds a new list, so
/// holders of an older snapshot never see it change.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Frame counter (0 = freshly spawned)
    pub frame: u64,
    balls: Arc<[Ball]>,
}

impl Snapshot {
    pub fn new(frame: u64, balls: Vec<Ball>) -> Self {
        Self {
            frame,
            balls: balls.into(),
        }
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }
}

/// Complete simulation state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    config: SimConfig,
    rng: Pcg32,
    snapshot: Snapshot,
}

impl SimState {
    /// Spawn a fresh population from `config` using `seed`.
    ///
    /// `config` is expected to have passed [`SimConfig::validate`].
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let balls = spawn_population(&config, &mut rng);
        log::info!(
            "Spawned {} balls in {}x{} viewport (seed {})",
            balls.len(),
            config.width,
            config.height,
            seed
        );
        Self {
            seed,
            config,
            rng,
            snapshot: Snapshot::new(0, balls),
        }
    }

    /// Latest published population
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Advance every ball by one frame and replace the snapshot
    pub fn advance(&mut self) -> &Snapshot {
        self.snapshot = step_all(&self.snapshot, &self.config, &mut self.rng);
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_u32(0x12AB3F).hex(), "#12AB3F");
        assert_eq!(Color::new(0, 0, 0).hex(), "#000000");
        assert_eq!(Color::from_u32(0xFF0000).to_rgba(), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_snapshot_is_not_mutated_by_advance() {
        let mut state = SimState::new(SimConfig::default(), 42);
        let before = state.snapshot().clone();
        let first = before.balls()[0].clone();

        state.advance();

        assert_eq!(before.frame, 0);
        assert_eq!(before.balls()[0], first);
        assert_eq!(state.snapshot().frame, 1);
        assert_ne!(state.snapshot().balls()[0].pos, first.pos);
    }

    #[test]
    fn test_population_conserved() {
        let config = SimConfig {
            population: 37,
            ..SimConfig::with_viewport(300.0, 200.0)
        };
        let mut state = SimState::new(config, 7);

        for _ in 0..500 {
            state.advance();
            let snapshot = state.snapshot();
            assert_eq!(snapshot.len(), 37);
            for (i, ball) in snapshot.balls().iter().enumerate() {
                assert_eq!(ball.id, i as u32);
            }
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed produce identical runs
        let mut state1 = SimState::new(SimConfig::default(), 99999);
        let mut state2 = SimState::new(SimConfig::default(), 99999);

        for _ in 0..300 {
            state1.advance();
            state2.advance();
        }

        assert_eq!(state1.snapshot().balls(), state2.snapshot().balls());
    }

    #[test]
    fn test_empty_population() {
        let config = SimConfig {
            population: 0,
            ..SimConfig::default()
        };
        let mut state = SimState::new(config, 1);
        state.advance();
        assert!(state.snapshot().is_empty());
        assert_eq!(state.snapshot().frame, 1);
    }
}
