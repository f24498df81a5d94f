//! Application systems
//!
//! Window and GPU rendering, kept out of main.rs so the event loop only routes events.

mod render;
mod window;

pub use render::{RenderError, RenderSystem};
pub use window::{WindowError, WindowSystem};
