//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The ribbon pipeline and one line batch per layer
//! - Frame rendering

use std::sync::Arc;
use winit::{dpi::PhysicalSize, window::Window};
use strand_core::{combined_transform, ShadingMode};
use strand_math::{mat4, Mat4, Vec3};
use strand_render::{
    context::{ContextError, RenderContext},
    pipeline::{LineBatch, LineUniforms, RibbonPipeline},
    RibbonGeometry,
};
use crate::config::{AppConfig, CameraConfig, LayerConfig, RenderingConfig};
use crate::scene::LayerKind;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// GPU setup failed
    Context(ContextError),
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Context(e) => write!(f, "GPU setup failed: {}", e),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// A line batch and the style it is drawn with
struct Layer {
    batch: LineBatch,
    style: LayerConfig,
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: RibbonPipeline,
    rings: Layer,
    edges: Layer,
    render_config: RenderingConfig,
    camera_config: CameraConfig,
}

impl RenderSystem {
    /// Create render system from window and config
    ///
    /// Both layers start empty until [`upload_layer`](Self::upload_layer).
    pub fn new(window: Arc<Window>, config: &AppConfig) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, config.window.vsync))?;

        let pipeline = RibbonPipeline::new(
            &context.device,
            context.config.format,
            context.config.width,
            context.config.height,
            config.rendering.depth_test,
        );

        let empty = RibbonGeometry::new();
        let mut rings = Layer {
            batch: pipeline.create_batch(&context.device, label(LayerKind::Rings), &empty),
            style: config.rings.clone(),
        };
        let mut edges = Layer {
            batch: pipeline.create_batch(&context.device, label(LayerKind::Edges), &empty),
            style: config.edges.clone(),
        };
        rings.batch.visible = rings.style.visible;
        edges.batch.visible = edges.style.visible;

        Ok(Self {
            context,
            pipeline,
            rings,
            edges,
            render_config: config.rendering.clone(),
            camera_config: config.camera.clone(),
        })
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut Layer {
        match kind {
            LayerKind::Rings => &mut self.rings,
            LayerKind::Edges => &mut self.edges,
        }
    }

    /// Handle window resize
    ///
    /// A minimized window reports a zero size; the surface and depth buffer
    /// then keep their previous size so they still match each other.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(size) = drawable_size(width, height) else {
            return;
        };
        self.context.resize(size);
        let (width, height) = self.size();
        self.pipeline.ensure_depth_texture(&self.context.device, width, height);
    }

    /// Reconfigure the surface after it was lost
    pub fn reconfigure(&self) {
        self.context.reconfigure();
    }

    /// Replace a layer's geometry
    pub fn upload_layer(&mut self, kind: LayerKind, geometry: &RibbonGeometry) {
        let batch = self.pipeline.create_batch(&self.context.device, label(kind), geometry);
        let layer = self.layer_mut(kind);
        let visible = layer.batch.visible;
        layer.batch = batch;
        layer.batch.visible = visible;
    }

    /// Show or hide a layer, returning whether it is now visible
    pub fn toggle_layer(&mut self, kind: LayerKind) -> bool {
        let layer = self.layer_mut(kind);
        layer.batch.visible = !layer.batch.visible;
        layer.batch.visible
    }

    /// Advance each layer to its next shading mode
    pub fn cycle_modes(&mut self) -> (ShadingMode, ShadingMode) {
        (self.rings.style.cycle_mode(), self.edges.style.cycle_mode())
    }

    /// Current ring and edge shading modes
    pub fn modes(&self) -> (ShadingMode, ShadingMode) {
        (self.rings.style.mode, self.edges.style.mode)
    }

    /// Projection and view matrices for the current surface size
    fn view_projection(&self) -> (Mat4, Mat4) {
        let projection = mat4::perspective(
            self.camera_config.fov.to_radians(),
            self.context.aspect_ratio(),
            self.camera_config.near,
            self.camera_config.far,
        );
        let view = mat4::translation(Vec3::new(0.0, 0.0, -self.camera_config.distance));
        (projection, view)
    }

    /// Render a single frame with the given model matrix
    pub fn render_frame(&mut self, model: Mat4) -> Result<(), RenderError> {
        let (projection, view) = self.view_projection();
        let transform = combined_transform(projection, view, model);
        let (width, height) = self.size();

        for layer in [&self.rings, &self.edges] {
            let params = layer
                .style
                .line_params(width as f32, height as f32, &self.render_config);
            layer
                .batch
                .update_uniforms(&self.context.queue, &LineUniforms::new(transform, &params));
        }

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => return Err(RenderError::SurfaceLost),
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Rings first, trajectories on top
        let bg = &self.render_config.background_color;
        self.pipeline.render(
            &mut encoder,
            &view,
            &[&self.rings.batch, &self.edges.batch],
            wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.config.width, self.context.config.height)
    }
}

/// The size to configure for a resize event, or `None` while minimized
fn drawable_size(width: u32, height: u32) -> Option<PhysicalSize<u32>> {
    (width > 0 && height > 0).then(|| PhysicalSize::new(width, height))
}

fn label(kind: LayerKind) -> &'static str {
    match kind {
        LayerKind::Rings => "Rings",
        LayerKind::Edges => "Edges",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
        assert_eq!(
            format!("{}", RenderError::from(ContextError::NoAdapter)),
            "GPU setup failed: No compatible GPU adapter found"
        );
    }

    #[test]
    fn test_minimized_window_keeps_size() {
        assert_eq!(drawable_size(0, 0), None);
        assert_eq!(drawable_size(1280, 0), None);
        assert_eq!(drawable_size(0, 720), None);
        assert_eq!(drawable_size(1280, 720), Some(PhysicalSize::new(1280, 720)));
    }

    #[test]
    fn test_layer_labels() {
        assert_eq!(label(LayerKind::Rings), "Rings");
        assert_eq!(label(LayerKind::Edges), "Edges");
    }
}
