//! Strand Mathematics Library
//!
//! Small vector and matrix types used by the polyline ribbon pipeline.
//!
//! ## Core Types
//!
//! - [`Vec2`] - screen-space positions, directions and normals
//! - [`Vec3`] - world-space polyline points
//! - [`Vec4`] - homogeneous clip-space positions
//! - [`Mat4`] - column-major 4x4 matrix for the projection-view-model transform

mod vec2;
mod vec3;
mod vec4;
pub mod mat4;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use mat4::Mat4;
