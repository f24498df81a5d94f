//! Rendering pipeline components
//!
//! GPU data layouts and the vertex-pulling ribbon pipeline.

pub mod types;
pub mod ribbon_pipeline;

// Re-export types
pub use types::{GpuLinePoint, LineUniforms, SegmentIndices, VERTICES_PER_SEGMENT};

// Re-export pipeline
pub use ribbon_pipeline::{LineBatch, RibbonPipeline, DEPTH_FORMAT};
