//! GPU-compatible data types for the ribbon pipeline
//!
//! These types are designed to match the shader layouts in `ribbon.wgsl` exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use strand_core::{LineParams, LinePoint, SegmentWindow};
use strand_math::{mat4, Mat4};

/// Vertices emitted per segment instance: 6 for the ribbon, 3 for the gap triangle
pub const VERTICES_PER_SEGMENT: u32 = 9;

/// A polyline point in the storage buffer
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuLinePoint {
    /// World position (x, y, z, 1)
    pub position: [f32; 4],
    /// RGBA color
    pub color: [f32; 4],
}

impl GpuLinePoint {
    /// Create a new point
    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position: [position[0], position[1], position[2], 1.0],
            color,
        }
    }
}

impl From<&LinePoint> for GpuLinePoint {
    fn from(point: &LinePoint) -> Self {
        Self::new(point.position.to_array(), point.color)
    }
}

/// Indices of one segment window `[previous, start, end, next]`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SegmentIndices {
    pub prev: u32,
    pub start: u32,
    pub end: u32,
    pub next: u32,
}

impl SegmentIndices {
    /// Create from a window of point indices
    pub fn from_window(window: SegmentWindow<u32>) -> Self {
        let [prev, start, end, next] = window;
        Self { prev, start, end, next }
    }

    /// Indices as an array
    pub fn to_array(self) -> [u32; 4] {
        [self.prev, self.start, self.end, self.next]
    }
}

/// Per-batch line uniforms
/// Layout: 96 bytes total (must match ribbon.wgsl LineUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LineUniforms {
    /// Combined projection * view * model matrix (64 bytes)
    pub transform: Mat4,
    /// Viewport size in pixels
    pub viewport: [f32; 2],
    /// Line width in pixels
    pub width: f32,
    /// Global opacity
    pub opacity: f32,
    /// Antialiasing ramp width in pixels
    pub falloff: f32,
    /// Off-screen cull margin in multiples of the half viewport
    pub cull_margin: f32,
    /// `ShadingMode::as_u32`
    pub mode: u32,
    pub _padding: u32,
}

impl LineUniforms {
    /// Uniforms for drawing with `params` under `transform`
    pub fn new(transform: Mat4, params: &LineParams) -> Self {
        Self {
            transform,
            viewport: params.viewport.into(),
            width: params.width,
            opacity: params.opacity,
            falloff: params.falloff,
            cull_margin: params.cull_margin,
            mode: params.mode.as_u32(),
            _padding: 0,
        }
    }
}

impl Default for LineUniforms {
    fn default() -> Self {
        Self::new(mat4::IDENTITY, &LineParams::new(1.0, 1.0, 1.0))
    }
}
