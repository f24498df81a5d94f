//! Shading stage
//!
//! Per-pixel edge antialiasing. The distance from a pixel to the interpolated
//! segment center decides its coverage:
//!
//! ```text
//!   alpha
//!   1 |--------------.
//!     |               \
//!   0 |________________\______ distance
//!                  w/2-f  w/2
//! ```

use strand_math::Vec2;

use crate::params::{LineParams, ShadingMode};

/// Interpolated attributes arriving at one pixel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    /// Interpolated segment center in NDC
    pub center: Vec2,
    /// Interpolated RGBA color
    pub color: [f32; 4],
}

/// Map an NDC position to framebuffer pixel coordinates (top-left origin, y down)
pub fn ndc_to_pixel(ndc: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    )
}

/// Alpha multiplier for a pixel at `distance` from the axis
///
/// 1 inside `half_width - falloff`, ramping linearly to 0 at `half_width`.
/// Distances beyond `half_width` are not clamped here; callers decide whether
/// to discard them.
pub fn edge_alpha(distance: f32, half_width: f32, falloff: f32) -> f32 {
    if falloff > 0.0 && distance > half_width - falloff {
        (distance - half_width) / -falloff
    } else {
        1.0
    }
}

/// Shade one pixel
///
/// `frag_coord` is the pixel center in framebuffer coordinates. Returns `None`
/// when the pixel is discarded.
pub fn shade_fragment(frag_coord: Vec2, fragment: &Fragment, params: &LineParams) -> Option<[f32; 4]> {
    if params.mode == ShadingMode::Plain {
        return Some(fragment.color);
    }

    let center = ndc_to_pixel(fragment.center, params.viewport);
    let distance = frag_coord.distance(center);
    let half_width = params.half_width();

    let [r, g, b, a] = fragment.color;
    if distance > half_width {
        return match params.mode {
            ShadingMode::Clip => None,
            _ => Some(fragment.color),
        };
    }

    Some([r, g, b, a * edge_alpha(distance, half_width, params.falloff)])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;
    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    /// A fragment whose center is the middle of a 100x100 viewport (pixel 50, 50)
    fn centered() -> Fragment {
        Fragment { center: Vec2::ZERO, color: WHITE }
    }

    fn shade_at(distance: f32, params: &LineParams) -> Option<[f32; 4]> {
        shade_fragment(Vec2::new(50.0 + distance, 50.0), &centered(), params)
    }

    #[test]
    fn test_ndc_to_pixel() {
        let viewport = Vec2::new(200.0, 100.0);
        assert_eq!(ndc_to_pixel(Vec2::new(-1.0, 1.0), viewport), Vec2::new(0.0, 0.0));
        assert_eq!(ndc_to_pixel(Vec2::new(1.0, -1.0), viewport), Vec2::new(200.0, 100.0));
        assert_eq!(ndc_to_pixel(Vec2::ZERO, viewport), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_edge_alpha_ramp() {
        assert_eq!(edge_alpha(0.0, 5.0, 1.0), 1.0);
        assert_eq!(edge_alpha(4.0, 5.0, 1.0), 1.0);
        assert!(approx_eq(edge_alpha(4.5, 5.0, 1.0), 0.5));
        assert!(approx_eq(edge_alpha(5.0, 5.0, 1.0), 0.0));
        assert!(approx_eq(edge_alpha(4.0, 5.0, 2.0), 0.5));
    }

    #[test]
    fn test_edge_alpha_without_falloff() {
        assert_eq!(edge_alpha(4.99, 5.0, 0.0), 1.0);
    }

    #[test]
    fn test_inside_is_opaque() {
        let params = LineParams::new(100.0, 100.0, 10.0);
        assert_eq!(shade_at(0.0, &params), Some(WHITE));
        assert_eq!(shade_at(3.9, &params), Some(WHITE));
    }

    #[test]
    fn test_ramp_midpoint_is_half_alpha() {
        let params = LineParams::new(100.0, 100.0, 10.0);
        let color = shade_at(10.0 / 2.0 - 0.5, &params).unwrap();
        assert!(approx_eq(color[3], 0.5), "alpha {}", color[3]);
        assert_eq!(&color[..3], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_ramp_scales_existing_alpha() {
        let params = LineParams::new(100.0, 100.0, 10.0);
        let fragment = Fragment { center: Vec2::ZERO, color: [1.0, 1.0, 1.0, 0.5] };
        let color = shade_fragment(Vec2::new(54.5, 50.0), &fragment, &params).unwrap();
        assert!(approx_eq(color[3], 0.25));
    }

    #[test]
    fn test_clip_discards_outside() {
        let params = LineParams::new(100.0, 100.0, 10.0);
        assert_eq!(shade_at(10.0 / 2.0 + 0.01, &params), None);
    }

    #[test]
    fn test_soft_keeps_outside() {
        let params = LineParams::new(100.0, 100.0, 10.0).with_mode(ShadingMode::Soft);
        assert_eq!(shade_at(5.01, &params), Some(WHITE));
        let ramp = shade_at(4.5, &params).unwrap();
        assert!(approx_eq(ramp[3], 0.5));
    }

    #[test]
    fn test_plain_passes_through() {
        let params = LineParams::new(100.0, 100.0, 10.0).with_mode(ShadingMode::Plain);
        assert_eq!(shade_at(4.5, &params), Some(WHITE));
        assert_eq!(shade_at(20.0, &params), Some(WHITE));
    }

    #[test]
    fn test_distance_is_euclidean() {
        let params = LineParams::new(100.0, 100.0, 10.0);
        // 3-4-5 triangle: exactly on the outer edge
        let color = shade_fragment(Vec2::new(53.0, 54.0), &centered(), &params).unwrap();
        assert!(approx_eq(color[3], 0.0));
    }
}
