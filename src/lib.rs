//! Strand - antialiased polyline ribbon viewer
//!
//! Configuration, the walker demo scene and the window/render systems behind
//! the `strand` binary. The line pipeline itself lives in `strand_core` (CPU)
//! and `strand_render` (GPU).

pub mod config;
pub mod scene;
pub mod systems;
