//! Antialiased polyline ribbons
//!
//! This crate is the CPU side of the Strand line pipeline. A polyline flows
//! through three stages:
//!
//! - [`transform`] - points into clip space, alpha scaled by the global opacity
//! - [`expansion`] - each 4-point segment window into a mitered ribbon quad,
//!   with a bevel and gap-closing triangle at sharp corners
//! - [`shading`] - per-pixel edge falloff and width clipping
//!
//! [`Framebuffer`] runs all three in software. The GPU pipeline in
//! `strand_render` implements the same stages in WGSL.

pub mod params;
pub mod polyline;
pub mod transform;
pub mod expansion;
pub mod shading;
pub mod raster;
pub mod gradient;

pub use params::{LineParams, ParamsError, ShadingMode, DEFAULT_CULL_MARGIN, DEFAULT_FALLOFF};
pub use polyline::{adjacency_indices, segment_windows, LinePoint, Polyline, PolylineError, SegmentWindow};
pub use transform::{combined_transform, transform_point, transform_polyline, ClipVertex};
pub use expansion::{expand_polyline, expand_segment, Join, RibbonVertex, SegmentGeometry};
pub use shading::{edge_alpha, shade_fragment, Fragment};
pub use raster::Framebuffer;
pub use gradient::{ColorStop, Gradient, GradientError};

// Re-export math types used throughout the public API
pub use strand_math::{Mat4, Vec2, Vec3, Vec4};
