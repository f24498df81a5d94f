//! Polylines and their 4-point segment windows
//!
//! Every segment is expanded with its neighbors in view: the window
//! `[previous, start, end, next]`. Open polylines duplicate their endpoints to
//! synthesize the missing neighbors; closed polylines wrap around so the closing
//! corner is joined like any other.

use serde::{Serialize, Deserialize};
use strand_math::Vec3;

/// A 4-point window `[previous, start, end, next]` around one segment
pub type SegmentWindow<T> = [T; 4];

/// A polyline control point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    /// World-space position
    pub position: Vec3,
    /// RGBA color, 0-1 per channel
    pub color: [f32; 4],
}

impl LinePoint {
    /// Create a new point
    pub fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// An ordered sequence of at least two connected points
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<LinePoint>,
    closed: bool,
}

impl Polyline {
    /// Create an open polyline
    pub fn new(points: Vec<LinePoint>) -> Result<Self, PolylineError> {
        if points.len() < 2 {
            return Err(PolylineError::TooFewPoints(points.len()));
        }
        Ok(Self { points, closed: false })
    }

    /// Create a closed polyline (ring); the last point connects back to the first
    pub fn closed(points: Vec<LinePoint>) -> Result<Self, PolylineError> {
        let mut polyline = Self::new(points)?;
        polyline.closed = true;
        Ok(polyline)
    }

    /// Create an open polyline with a single color for every point
    pub fn from_positions(positions: &[Vec3], color: [f32; 4]) -> Result<Self, PolylineError> {
        Self::new(positions.iter().map(|&p| LinePoint::new(p, color)).collect())
    }

    /// Control points
    pub fn points(&self) -> &[LinePoint] {
        &self.points
    }

    /// Whether the polyline loops back to its first point
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a polyline has at least two points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of segments drawn
    pub fn segment_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }

    /// Point windows for every segment
    pub fn windows(&self) -> impl Iterator<Item = SegmentWindow<LinePoint>> + '_ {
        segment_windows(self.points.len(), self.closed)
            .into_iter()
            .map(move |w| w.map(|i| self.points[i]))
    }
}

/// Index windows for every segment of a sequence of `len` points
///
/// Open sequences duplicate the first and last index as the missing neighbors;
/// closed sequences wrap around. Sequences shorter than two points have no
/// segments.
pub fn segment_windows(len: usize, closed: bool) -> Vec<SegmentWindow<usize>> {
    if len < 2 {
        return Vec::new();
    }

    if closed {
        (0..len)
            .map(|i| [(i + len - 1) % len, i, (i + 1) % len, (i + 2) % len])
            .collect()
    } else {
        let last = len - 1;
        (0..last)
            .map(|i| [i.saturating_sub(1), i, i + 1, (i + 2).min(last)])
            .collect()
    }
}

/// Adjacency windows over an arbitrary index sequence
///
/// This is the element layout a GPU draw consumes: each window references four
/// entries of a shared point buffer. For `(0, 1, 2, 3)`, open:
///
/// ```text
/// 0, 0, 1, 2,
/// 0, 1, 2, 3,
/// 1, 2, 3, 3
/// ```
pub fn adjacency_indices(indices: &[u32], closed: bool) -> Vec<SegmentWindow<u32>> {
    segment_windows(indices.len(), closed)
        .into_iter()
        .map(|w| w.map(|i| indices[i]))
        .collect()
}

/// Error constructing a [`Polyline`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    /// A polyline needs at least two points
    TooFewPoints(usize),
}

impl std::fmt::Display for PolylineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolylineError::TooFewPoints(n) => {
                write!(f, "Polyline must have at least 2 points, got {}", n)
            }
        }
    }
}

impl std::error::Error for PolylineError {}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    fn line(n: usize) -> Vec<LinePoint> {
        (0..n)
            .map(|i| LinePoint::new(Vec3::new(i as f32, 0.0, 0.0), WHITE))
            .collect()
    }

    #[test]
    fn test_rejects_short_polyline() {
        assert_eq!(Polyline::new(line(1)), Err(PolylineError::TooFewPoints(1)));
        assert_eq!(Polyline::closed(Vec::new()), Err(PolylineError::TooFewPoints(0)));
        let msg = Polyline::new(line(0)).unwrap_err().to_string();
        assert!(msg.contains("at least 2 points"));
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(Polyline::new(line(4)).unwrap().segment_count(), 3);
        assert_eq!(Polyline::closed(line(4)).unwrap().segment_count(), 4);
    }

    #[test]
    fn test_adjacency_indices_open() {
        let windows = adjacency_indices(&[0, 1, 2, 3], false);
        assert_eq!(
            windows.concat(),
            vec![
                0, 0, 1, 2,
                0, 1, 2, 3,
                1, 2, 3, 3,
            ]
        );
    }

    #[test]
    fn test_adjacency_indices_two_points() {
        assert_eq!(adjacency_indices(&[7, 9], false), vec![[7, 7, 9, 9]]);
    }

    #[test]
    fn test_adjacency_indices_strided() {
        // A walker trajectory in a shared buffer: every third vertex
        let windows = adjacency_indices(&[1, 4, 7], false);
        assert_eq!(windows, vec![[1, 1, 4, 7], [1, 4, 7, 7]]);
    }

    #[test]
    fn test_adjacency_indices_closed_wraps() {
        let windows = adjacency_indices(&[0, 1, 2], true);
        assert_eq!(windows, vec![[2, 0, 1, 2], [0, 1, 2, 0], [1, 2, 0, 1]]);
    }

    #[test]
    fn test_segment_windows_too_short() {
        assert!(segment_windows(0, false).is_empty());
        assert!(segment_windows(1, true).is_empty());
    }

    #[test]
    fn test_polyline_windows() {
        let polyline = Polyline::new(line(3)).unwrap();
        let windows: Vec<_> = polyline.windows().collect();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0][0].position.x, 0.0);
        assert_eq!(windows[0][1].position.x, 0.0);
        assert_eq!(windows[1][3].position.x, 2.0);
    }
}
