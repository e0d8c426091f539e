//! Math utilities module
//!
//! Provides re-exports from glam, the scene transform type and the vector
//! helpers used to place pole-vector and blend controls.

mod transform;
pub mod vector;

pub use transform::Transform;
pub use vector::{blend_control_position, normalize, pole_vector_position, LimbAxis};

// Re-export commonly used glam types
pub use glam::{Mat4, Quat, Vec3};
