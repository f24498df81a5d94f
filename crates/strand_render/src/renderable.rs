//! Renderable geometry - bridges polylines to GPU buffers
//!
//! Points of any number of polylines share one point buffer. Each polyline
//! contributes its segment windows as indices into that buffer, so a line can
//! be any index sequence over the shared points: a contiguous range for a
//! ring, or a strided walk through per-iteration point sets for a trajectory.

use strand_core::{adjacency_indices, LinePoint, Polyline};
use crate::pipeline::{GpuLinePoint, SegmentIndices};

/// GPU-ready points and segment windows
#[derive(Clone, Debug, Default)]
pub struct RibbonGeometry {
    /// Shared point buffer
    pub points: Vec<GpuLinePoint>,
    /// One window per drawn segment, indexing `points`
    pub segments: Vec<SegmentIndices>,
}

impl RibbonGeometry {
    /// Create empty geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create geometry with pre-allocated capacity
    pub fn with_capacity(point_capacity: usize, segment_capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(point_capacity),
            segments: Vec::with_capacity(segment_capacity),
        }
    }

    /// Collect geometry from a set of polylines
    pub fn from_polylines(polylines: &[Polyline]) -> Self {
        let points = polylines.iter().map(|p| p.len()).sum();
        let segments = polylines.iter().map(|p| p.segment_count()).sum();

        let mut result = Self::with_capacity(points, segments);
        for polyline in polylines {
            result.add_polyline(polyline);
        }
        result
    }

    /// Append a polyline's points and segments
    pub fn add_polyline(&mut self, polyline: &Polyline) {
        let base = self.add_points(polyline.points());
        let indices: Vec<u32> = (base..base + polyline.len() as u32).collect();
        self.push_windows(&indices, polyline.is_closed());
    }

    /// Append points without segments, returning the index of the first one
    pub fn add_points(&mut self, points: &[LinePoint]) -> u32 {
        let base = self.points.len() as u32;
        self.points.extend(points.iter().map(GpuLinePoint::from));
        base
    }

    /// Append a line through already added points
    ///
    /// Index sequences shorter than two points add nothing.
    pub fn add_indexed_line(&mut self, indices: &[u32], closed: bool) -> Result<(), GeometryError> {
        let len = self.points.len();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= len) {
            return Err(GeometryError::IndexOutOfRange { index, len });
        }
        self.push_windows(indices, closed);
        Ok(())
    }

    fn push_windows(&mut self, indices: &[u32], closed: bool) {
        self.segments.extend(
            adjacency_indices(indices, closed)
                .into_iter()
                .map(SegmentIndices::from_window),
        );
    }

    /// Clear all geometry
    pub fn clear(&mut self) {
        self.points.clear();
        self.segments.clear();
    }

    /// Get the number of points
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Get the number of segments
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Error building [`RibbonGeometry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A line referenced a point that has not been added
    IndexOutOfRange { index: u32, len: usize },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::IndexOutOfRange { index, len } => {
                write!(f, "Point index {} out of range for {} points", index, len)
            }
        }
    }
}

impl std::error::Error for GeometryError {}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_math::Vec3;

    const WHITE: [f32; 4] = [1.0; 4];

    fn points(n: usize) -> Vec<LinePoint> {
        (0..n)
            .map(|i| LinePoint::new(Vec3::new(i as f32, 0.0, 0.0), WHITE))
            .collect()
    }

    #[test]
    fn test_new_is_empty() {
        let geom = RibbonGeometry::new();
        assert_eq!(geom.point_count(), 0);
        assert_eq!(geom.segment_count(), 0);
        assert!(geom.is_empty());
    }

    #[test]
    fn test_add_open_polyline() {
        let mut geom = RibbonGeometry::new();
        geom.add_polyline(&Polyline::new(points(4)).unwrap());

        assert_eq!(geom.point_count(), 4);
        let windows: Vec<[u32; 4]> = geom.segments.iter().map(|s| s.to_array()).collect();
        assert_eq!(windows, vec![[0, 0, 1, 2], [0, 1, 2, 3], [1, 2, 3, 3]]);
    }

    #[test]
    fn test_indices_offset_per_polyline() {
        let polylines = vec![
            Polyline::new(points(3)).unwrap(),
            Polyline::closed(points(3)).unwrap(),
        ];
        let geom = RibbonGeometry::from_polylines(&polylines);

        assert_eq!(geom.point_count(), 6);
        assert_eq!(geom.segment_count(), 2 + 3);
        // The ring's closing segment wraps within its own points
        assert_eq!(geom.segments[4].to_array(), [4, 5, 3, 4]);
        assert!(geom.segments[2..].iter().all(|s| s.to_array().iter().all(|&i| i >= 3)));
    }

    #[test]
    fn test_strided_line() {
        let mut geom = RibbonGeometry::new();
        // Three iterations of two walkers each
        let base = geom.add_points(&points(6));
        assert_eq!(base, 0);
        geom.add_indexed_line(&[1, 3, 5], false).unwrap();
        assert_eq!(geom.segments[0].to_array(), [1, 1, 3, 5]);
        assert_eq!(geom.segments[1].to_array(), [1, 3, 5, 5]);
    }

    #[test]
    fn test_indexed_line_out_of_range() {
        let mut geom = RibbonGeometry::new();
        geom.add_points(&points(2));
        assert_eq!(
            geom.add_indexed_line(&[0, 2], false),
            Err(GeometryError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(geom.is_empty());
    }

    #[test]
    fn test_short_indexed_line_adds_nothing() {
        let mut geom = RibbonGeometry::new();
        geom.add_points(&points(2));
        geom.add_indexed_line(&[1], false).unwrap();
        assert!(geom.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut geom = RibbonGeometry::from_polylines(&[Polyline::new(points(5)).unwrap()]);
        assert!(!geom.is_empty());
        geom.clear();
        assert_eq!(geom.point_count(), 0);
        assert_eq!(geom.segment_count(), 0);
    }
}
