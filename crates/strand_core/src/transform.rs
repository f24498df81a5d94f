//! Transform stage
//!
//! Maps polyline points into clip space and applies the global opacity.

use strand_math::{mat4, Mat4, Vec4};

use crate::polyline::{LinePoint, Polyline};

/// A point after the projection-view-model transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    /// Homogeneous clip-space position
    pub position: Vec4,
    /// RGBA color with opacity applied
    pub color: [f32; 4],
}

/// Combine projection, view and model matrices (applied model first)
pub fn combined_transform(projection: Mat4, view: Mat4, model: Mat4) -> Mat4 {
    mat4::mul(projection, mat4::mul(view, model))
}

/// Transform one point into clip space, scaling its alpha by `opacity`
pub fn transform_point(matrix: &Mat4, point: &LinePoint, opacity: f32) -> ClipVertex {
    let [r, g, b, a] = point.color;
    ClipVertex {
        position: mat4::transform_point(*matrix, point.position),
        color: [r, g, b, a * opacity.clamp(0.0, 1.0)],
    }
}

/// Transform every point of a polyline
pub fn transform_polyline(matrix: &Mat4, polyline: &Polyline, opacity: f32) -> Vec<ClipVertex> {
    polyline
        .points()
        .iter()
        .map(|p| transform_point(matrix, p, opacity))
        .collect()
}
