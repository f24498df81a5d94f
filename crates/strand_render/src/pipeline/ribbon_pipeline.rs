//! Render pipeline for antialiased polyline ribbons
//!
//! There is no geometry stage in wgpu, so segments are expanded by vertex
//! pulling: points and segment windows live in storage buffers and every
//! segment is one instance of a 9-vertex triangle list. Each [`LineBatch`]
//! owns its buffers, uniforms and bind group, so batches with different
//! widths or shading modes can share one render pass.

use wgpu::util::DeviceExt;

use super::types::{GpuLinePoint, LineUniforms, SegmentIndices, VERTICES_PER_SEGMENT};
use crate::renderable::RibbonGeometry;

/// Depth buffer format used by the ribbon pass
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// GPU resources of one drawable set of lines
pub struct LineBatch {
    label: String,
    /// Kept alive for the bind group
    _point_buffer: wgpu::Buffer,
    _segment_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    point_count: u32,
    segment_count: u32,
    /// Skipped by [`RibbonPipeline::render`] when false
    pub visible: bool,
}

impl LineBatch {
    /// Write this batch's uniforms; takes effect at the next submitted pass
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &LineUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    pub fn segment_count(&self) -> u32 {
        self.segment_count
    }
}

/// Ribbon render pipeline and the depth buffer it draws with
pub struct RibbonPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl RibbonPipeline {
    /// Create the pipeline for a surface format and size
    ///
    /// With `depth_test` off, depth is neither tested nor written and batches
    /// simply draw in order.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        depth_test: bool,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Ribbon Bind Group Layout"),
            entries: &[
                // Line uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Points (read-only storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Segment windows (read-only storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ribbon Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ribbon Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/ribbon.wgsl").into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Ribbon Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Ribbon triangles come in both windings
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: depth_test,
                depth_compare: if depth_test {
                    wgpu::CompareFunction::Less
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let width = width.max(1);
        let height = height.max(1);

        Self {
            pipeline,
            bind_group_layout,
            depth_view: create_depth_view(device, width, height),
            depth_size: (width, height),
        }
    }

    /// Upload geometry into a new batch
    pub fn create_batch(
        &self,
        device: &wgpu::Device,
        label: &str,
        geometry: &RibbonGeometry,
    ) -> LineBatch {
        // Storage bindings must not be empty
        let placeholder_point = [GpuLinePoint::default()];
        let placeholder_segment = [SegmentIndices::default()];
        let points: &[GpuLinePoint] = if geometry.points.is_empty() {
            &placeholder_point
        } else {
            &geometry.points
        };
        let segments: &[SegmentIndices] = if geometry.segments.is_empty() {
            &placeholder_segment
        } else {
            &geometry.segments
        };

        let point_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Point Buffer", label)),
            contents: bytemuck::cast_slice(points),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let segment_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Segment Buffer", label)),
            contents: bytemuck::cast_slice(segments),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Uniform Buffer", label)),
            contents: bytemuck::bytes_of(&LineUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Bind Group", label)),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: point_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: segment_buffer.as_entire_binding(),
                },
            ],
        });

        log::debug!(
            "Uploaded {} batch: {} points, {} segments",
            label,
            geometry.point_count(),
            geometry.segment_count()
        );

        LineBatch {
            label: label.to_string(),
            _point_buffer: point_buffer,
            _segment_buffer: segment_buffer,
            uniform_buffer,
            bind_group,
            point_count: geometry.point_count() as u32,
            segment_count: geometry.segment_count() as u32,
            visible: true,
        }
    }

    /// Recreate the depth buffer if the target size changed
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let size = (width.max(1), height.max(1));
        if self.depth_size != size {
            self.depth_view = create_depth_view(device, size.0, size.1);
            self.depth_size = size;
        }
    }

    /// Clear the target and draw every visible batch in order
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        batches: &[&LineBatch],
        clear_color: wgpu::Color,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Ribbon Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        for batch in batches.iter().filter(|b| b.visible && b.segment_count > 0) {
            render_pass.set_bind_group(0, &batch.bind_group, &[]);
            render_pass.draw(0..VERTICES_PER_SEGMENT, 0..batch.segment_count);
        }
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Ribbon Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
