//! Polyline Ribbon Rendering Library
//!
//! This crate provides the wgpu-based pipeline that draws antialiased
//! polyline ribbons. It runs the same transform, expansion and shading stages
//! as `strand_core`, in WGSL.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`pipeline::RibbonPipeline`] - Vertex-pulling ribbon expansion and edge shading
//! - [`pipeline::LineBatch`] - Per-layer GPU buffers and uniforms
//! - [`renderable::RibbonGeometry`] - Converts polylines to GPU buffers

pub mod context;
pub mod pipeline;
pub mod renderable;

// Re-export core types for convenience
pub use strand_core::{LineParams, LinePoint, Polyline, ShadingMode};

pub use renderable::{GeometryError, RibbonGeometry};
