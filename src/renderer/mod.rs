//! WebGPU rendering module
//!
//! Balls are tessellated into triangle fans on the CPU and drawn with a
//! single flat-color pipeline.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, viewport_to_ndc};
pub use shapes::frame_vertices;
pub use vertex::Vertex;
