//! Deterministic simulation module
//!
//! All ball physics lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod spawn;
pub mod state;
pub mod step;

pub use spawn::{random_color, spawn, spawn_population};
pub use state::{Ball, Color, SimState, Snapshot};
pub use step::{deflect, step, step_all};
