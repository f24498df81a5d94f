//! Software rasterizer
//!
//! A small CPU renderer that runs all three stages: it rasterizes expanded
//! ribbon triangles at pixel centers, interpolates their attributes linearly,
//! shades each covered pixel and blends it source-over into a [`Framebuffer`].
//! It mirrors what the GPU pipeline does and makes the output of the pipeline
//! inspectable pixel by pixel.

use strand_math::{Mat4, Vec2};

use crate::expansion::{expand_polyline, RibbonVertex, SegmentGeometry};
use crate::params::{LineParams, ParamsError};
use crate::polyline::Polyline;
use crate::shading::{ndc_to_pixel, shade_fragment, Fragment};
use crate::transform::transform_polyline;

/// RGBA color buffer with an optional depth buffer
#[derive(Clone, Debug)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    color: Vec<[f32; 4]>,
    depth: Vec<f32>,
    depth_test: bool,
}

impl Framebuffer {
    /// Create a transparent black framebuffer without depth testing
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            color: vec![[0.0; 4]; width * height],
            depth: vec![f32::INFINITY; width * height],
            depth_test: false,
        }
    }

    /// Enable or disable the `Less` depth test
    pub fn with_depth_test(mut self, enabled: bool) -> Self {
        self.depth_test = enabled;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Size in pixels, as the viewport a draw should use
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Fill with `color` and reset depth
    pub fn clear(&mut self, color: [f32; 4]) {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
    }

    /// Color at a pixel (top-left origin)
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f32; 4]> {
        self.index(x, y).map(|i| self.color[i])
    }

    /// Stored depth at a pixel; infinity where nothing was written
    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Pack into 8-bit RGBA rows, top row first
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.color
            .iter()
            .flat_map(|c| c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Run the full pipeline for one polyline
    ///
    /// `params.viewport` should match the framebuffer size. Returns the number
    /// of segments that survived culling.
    pub fn draw_polyline(
        &mut self,
        polyline: &Polyline,
        matrix: &Mat4,
        params: &LineParams,
    ) -> Result<usize, ParamsError> {
        params.validate()?;

        let clip = transform_polyline(matrix, polyline, params.opacity);
        let segments = expand_polyline(&clip, polyline.is_closed(), params);
        for segment in &segments {
            self.draw_segment(segment, params);
        }
        Ok(segments.len())
    }

    /// Rasterize every triangle of one segment
    pub fn draw_segment(&mut self, segment: &SegmentGeometry, params: &LineParams) {
        for triangle in segment.triangles() {
            self.draw_triangle(&triangle, params);
        }
    }

    /// Rasterize one ribbon triangle
    ///
    /// A pixel is covered when its center lies inside the triangle. Centers
    /// exactly on an edge belong to only one of the two triangles sharing it.
    pub fn draw_triangle(&mut self, triangle: &[RibbonVertex; 3], params: &LineParams) {
        let viewport = self.viewport();
        let to_pixel = |v: &RibbonVertex| ndc_to_pixel(Vec2::new(v.position.x, v.position.y), viewport);

        let mut verts = [triangle[0], triangle[1], triangle[2]];
        let mut pts = [to_pixel(&verts[0]), to_pixel(&verts[1]), to_pixel(&verts[2])];

        let mut area = edge(pts[0], pts[1], pts[2]);
        if area == 0.0 || !area.is_finite() {
            return;
        }
        if area < 0.0 {
            verts.swap(1, 2);
            pts.swap(1, 2);
            area = -area;
        }

        let min = pts[0].min(pts[1]).min(pts[2]);
        let max = pts[0].max(pts[1]).max(pts[2]);
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w = [
                    edge(pts[1], pts[2], p),
                    edge(pts[2], pts[0], p),
                    edge(pts[0], pts[1], p),
                ];
                let owns = [
                    covers(w[0], pts[1], pts[2]),
                    covers(w[1], pts[2], pts[0]),
                    covers(w[2], pts[0], pts[1]),
                ];
                if owns.contains(&false) {
                    continue;
                }

                let l = w.map(|wi| wi / area);
                self.shade(x, y, p, &verts, l, params);
            }
        }
    }

    fn shade(
        &mut self,
        x: usize,
        y: usize,
        frag_coord: Vec2,
        verts: &[RibbonVertex; 3],
        l: [f32; 3],
        params: &LineParams,
    ) {
        let depth = verts[0].depth * l[0] + verts[1].depth * l[1] + verts[2].depth * l[2];
        if !(-1.0..=1.0).contains(&depth) {
            return;
        }

        let i = y * self.width + x;
        if self.depth_test && depth >= self.depth[i] {
            return;
        }

        let center = verts[0].center * l[0] + verts[1].center * l[1] + verts[2].center * l[2];
        let mut color = [0.0; 4];
        for (c, out) in color.iter_mut().enumerate() {
            *out = verts[0].color[c] * l[0] + verts[1].color[c] * l[1] + verts[2].color[c] * l[2];
        }

        let Some(src) = shade_fragment(frag_coord, &Fragment { center, color }, params) else {
            return;
        };

        if self.depth_test {
            self.depth[i] = depth;
        }
        self.color[i] = blend_over(src, self.color[i]);
    }
}

/// Twice the signed area of `(a, b, p)`; positive when `p` is on the
/// clockwise-in-y-down side of `a -> b`
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

/// Whether an edge covers a point with edge function `w`
///
/// Points exactly on the edge are kept only for one traversal direction; two
/// consistently oriented triangles walk a shared edge in opposite directions.
fn covers(w: f32, a: Vec2, b: Vec2) -> bool {
    if w != 0.0 {
        return w > 0.0;
    }
    let d = b - a;
    d.y > 0.0 || (d.y == 0.0 && d.x < 0.0)
}

/// Source-over blend of straight (non-premultiplied) colors
fn blend_over(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let a = src[3];
    [
        src[0] * a + dst[0] * (1.0 - a),
        src[1] * a + dst[1] * (1.0 - a),
        src[2] * a + dst[2] * (1.0 - a),
        a + dst[3] * (1.0 - a),
    ]
}
