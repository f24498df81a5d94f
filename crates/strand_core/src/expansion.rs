//! Expansion stage
//!
//! Turns one segment window `[previous, start, end, next]` of clip-space points
//! into a screen-aligned ribbon quad with mitered joins.
//!
//! All join math happens in screen space: perspective-divided NDC scaled by half
//! the viewport, so one unit is one pixel and the origin is the viewport center.
//! Output vertices are converted back to NDC with `w = 1`; the per-pixel stage
//! measures distances against the unoffset segment point carried in `center`.
//!
//! ## Joins
//!
//! The start join bisects the normals of the previous and current segment, the
//! end join those of the current and next. A miter's length is the width divided
//! by the projection of the miter onto the current segment's normal, so both
//! ribbon edges stay exactly `width / 2` away from the axis.
//!
//! When a corner turns by more than 90° the miter would shoot far past the corner.
//! The join is then replaced by a bevel (the segment's own normal, length equal to
//! the width) and the segment starting at that corner emits a gap-closing
//! triangle on the outer side. Each corner is the start join of exactly one
//! segment, so the gap is filled once.

use strand_math::{Vec2, Vec4};

use crate::params::LineParams;
use crate::polyline::{segment_windows, SegmentWindow};
use crate::transform::ClipVertex;

/// Directions shorter than this (in pixels) are treated as zero-length
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Miter projections below this are treated as folded and fall back to the width
pub const MITER_EPSILON: f32 = 1e-3;

/// Points with a clip-space `w` at or below this are behind the eye
pub const W_EPSILON: f32 = 1e-6;

/// A vertex of the expanded ribbon
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RibbonVertex {
    /// Output position: NDC x and y, depth, w = 1
    pub position: Vec4,
    /// The unoffset segment endpoint this vertex was pushed out from, in NDC
    pub center: Vec2,
    /// RGBA color
    pub color: [f32; 4],
    /// Normalized depth (z / w)
    pub depth: f32,
}

/// How one end of a segment is joined to its neighbor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Join {
    /// Unit direction the ribbon edges are offset along
    pub direction: Vec2,
    /// Full offset length across the ribbon; vertices sit at ±length/2
    pub length: f32,
    /// True when the sharp-corner fallback replaced the miter
    pub bevel: bool,
}

impl Join {
    fn miter(prev_normal: Vec2, next_normal: Vec2, segment_normal: Vec2, width: f32) -> Self {
        let direction = (prev_normal + next_normal)
            .try_normalized(DIRECTION_EPSILON)
            .unwrap_or(segment_normal);
        let projection = direction.dot(segment_normal);
        let length = if projection.abs() < MITER_EPSILON {
            width
        } else {
            width / projection
        };
        Self { direction, length, bevel: false }
    }

    fn bevel(segment_normal: Vec2, width: f32) -> Self {
        Self {
            direction: segment_normal,
            length: width,
            bevel: true,
        }
    }

    fn offset(&self) -> Vec2 {
        self.direction * (self.length * 0.5)
    }
}

/// Geometry emitted for one segment
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentGeometry {
    /// Main ribbon strip: start + a, start - a, end + b, end - b
    pub ribbon: [RibbonVertex; 4],
    /// Gap-closing strip at a beveled start corner
    pub gap: Option<[RibbonVertex; 3]>,
    /// Join at the segment start
    pub start_join: Join,
    /// Join at the segment end
    pub end_join: Join,
}

impl SegmentGeometry {
    /// Total number of emitted vertices (4 or 7)
    pub fn vertex_count(&self) -> usize {
        self.ribbon.len() + self.gap.map_or(0, |g| g.len())
    }

    /// Emitted triangle strips
    pub fn strips(&self) -> impl Iterator<Item = &[RibbonVertex]> {
        std::iter::once(&self.ribbon[..]).chain(self.gap.as_ref().map(|g| &g[..]))
    }

    /// The strips unrolled into independent triangles
    pub fn triangles(&self) -> Vec<[RibbonVertex; 3]> {
        self.strips()
            .flat_map(|strip| strip.windows(3).map(|t| [t[0], t[1], t[2]]))
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct ScreenPoint {
    pos: Vec2,
    depth: f32,
}

fn to_screen(clip: Vec4, half_viewport: Vec2) -> Option<ScreenPoint> {
    if !clip.is_finite() || clip.w <= W_EPSILON {
        return None;
    }
    let ndc = clip.perspective_divide();
    Some(ScreenPoint {
        pos: Vec2::new(ndc.x, ndc.y).component_mul(half_viewport),
        depth: ndc.z,
    })
}

fn outside(p: Vec2, bound: Vec2) -> bool {
    p.x.abs() > bound.x || p.y.abs() > bound.y
}

/// Expand one segment window into ribbon geometry
///
/// Returns `None` when the segment is culled: an endpoint is behind the eye or
/// outside the enlarged viewport bound. Degenerate input (repeated points,
/// folded segments) never produces non-finite output.
pub fn expand_segment(
    window: &SegmentWindow<ClipVertex>,
    params: &LineParams,
) -> Option<SegmentGeometry> {
    let [prev, start, end, next] = window;
    let half_viewport = params.half_viewport();

    let p1 = to_screen(start.position, half_viewport)?;
    let p2 = to_screen(end.position, half_viewport)?;

    let bound = half_viewport * params.cull_margin;
    if outside(p1.pos, bound) || outside(p2.pos, bound) {
        return None;
    }

    // Neighbors only contribute directions; an unusable one counts as repeated
    let p0 = to_screen(prev.position, half_viewport).map_or(p1.pos, |p| p.pos);
    let p3 = to_screen(next.position, half_viewport).map_or(p2.pos, |p| p.pos);

    let d0 = (p1.pos - p0).try_normalized(DIRECTION_EPSILON);
    let d1 = (p2.pos - p1.pos).try_normalized(DIRECTION_EPSILON);
    let d2 = (p3 - p2.pos).try_normalized(DIRECTION_EPSILON);

    let v1 = d1.or(d0).or(d2).unwrap_or(Vec2::X);
    let v0 = d0.unwrap_or(v1);
    let v2 = d2.unwrap_or(v1);

    let n0 = v0.perp();
    let n1 = v1.perp();
    let n2 = v2.perp();

    let width = params.width;
    let start_join = if v0.dot(v1) < 0.0 {
        Join::bevel(n1, width)
    } else {
        Join::miter(n0, n1, n1, width)
    };
    let end_join = if v1.dot(v2) < 0.0 {
        Join::bevel(n1, width)
    } else {
        Join::miter(n1, n2, n1, width)
    };

    let emit = |pos: Vec2, anchor: &ScreenPoint, color: [f32; 4]| {
        let ndc = pos.component_div(half_viewport);
        RibbonVertex {
            position: Vec4::new(ndc.x, ndc.y, anchor.depth, 1.0),
            center: anchor.pos.component_div(half_viewport),
            color,
            depth: anchor.depth,
        }
    };

    let a = start_join.offset();
    let b = end_join.offset();
    let ribbon = [
        emit(p1.pos + a, &p1, start.color),
        emit(p1.pos - a, &p1, start.color),
        emit(p2.pos + b, &p2, end.color),
        emit(p2.pos - b, &p2, end.color),
    ];

    let gap = start_join.bevel.then(|| {
        // The previous segment arrives heading towards +n1 when the corner turns
        // clockwise, leaving the open wedge on the +n side
        let side = if v0.dot(n1) > 0.0 { 1.0 } else { -1.0 };
        let reach = params.half_width() * side;
        [
            emit(p1.pos, &p1, start.color),
            emit(p1.pos + n0 * reach, &p1, start.color),
            emit(p1.pos + n1 * reach, &p1, start.color),
        ]
    });

    Some(SegmentGeometry {
        ribbon,
        gap,
        start_join,
        end_join,
    })
}

/// Expand every segment of a clip-space point sequence
///
/// Culled segments are skipped.
pub fn expand_polyline(
    vertices: &[ClipVertex],
    closed: bool,
    params: &LineParams,
) -> Vec<SegmentGeometry> {
    let windows = segment_windows(vertices.len(), closed);
    let total = windows.len();

    let geometry: Vec<SegmentGeometry> = windows
        .into_iter()
        .filter_map(|w| expand_segment(&w.map(|i| vertices[i]), params))
        .collect();

    if geometry.len() < total {
        log::trace!("Culled {} of {} segments", total - geometry.len(), total);
    }

    geometry
}
