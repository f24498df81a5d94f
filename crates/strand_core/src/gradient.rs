//! Linear color gradients
//!
//! A gradient is a list of color stops positioned in [0, 1], kept sorted by
//! position. Sampling interpolates linearly between the surrounding stops and
//! clamps to the first/last stop outside their range.

use serde::{Serialize, Deserialize};

/// A color at a position along a gradient
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position in [0, 1]
    pub position: f32,
    /// RGBA color, 0-1 per channel
    pub color: [f32; 4],
}

impl ColorStop {
    pub fn new(position: f32, color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// Sorted, non-empty sequence of color stops
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColorStop>", into = "Vec<ColorStop>")]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    /// Create a gradient from stops in any order
    pub fn new(mut stops: Vec<ColorStop>) -> Result<Self, GradientError> {
        if stops.is_empty() {
            return Err(GradientError::Empty);
        }
        if let Some(stop) = stops.iter().find(|s| !(0.0..=1.0).contains(&s.position)) {
            return Err(GradientError::StopOutOfRange(stop.position));
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { stops })
    }

    /// Black at 0, opaque red at 1
    pub fn black_to_red() -> Self {
        Self {
            stops: vec![
                ColorStop::new(0.0, [0.0, 0.0, 0.0, 1.0]),
                ColorStop::new(1.0, [1.0, 0.0, 0.0, 1.0]),
            ],
        }
    }

    /// White at 0, black at 1
    pub fn white_to_black() -> Self {
        Self {
            stops: vec![
                ColorStop::new(0.0, [1.0, 1.0, 1.0, 1.0]),
                ColorStop::new(1.0, [0.0, 0.0, 0.0, 1.0]),
            ],
        }
    }

    /// Stops sorted by position
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// The stop closest to `t`; ties go to the earlier stop
    pub fn nearest_stop(&self, t: f32) -> &ColorStop {
        let mut nearest = &self.stops[0];
        for stop in &self.stops[1..] {
            if (stop.position - t).abs() < (nearest.position - t).abs() {
                nearest = stop;
            }
        }
        nearest
    }

    /// Interpolated color at `t`
    pub fn sample(&self, t: f32) -> [f32; 4] {
        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];
        if t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        // Index of the first stop strictly after t; t lies inside (first, last)
        let next = self.stops.partition_point(|s| s.position <= t);
        let (a, b) = (&self.stops[next - 1], &self.stops[next]);
        let span = b.position - a.position;
        let f = if span > 0.0 { (t - a.position) / span } else { 0.0 };

        let mut color = [0.0; 4];
        for (i, c) in color.iter_mut().enumerate() {
            *c = a.color[i] + (b.color[i] - a.color[i]) * f;
        }
        color
    }

    /// `steps` evenly spaced colors: step `i` samples `i / steps`
    ///
    /// The last step therefore stops short of position 1, which keeps
    /// successive rings of a cyclic sequence distinct.
    pub fn generate(&self, steps: usize) -> Vec<[f32; 4]> {
        (0..steps)
            .map(|i| self.sample(i as f32 / steps as f32))
            .collect()
    }
}

impl TryFrom<Vec<ColorStop>> for Gradient {
    type Error = GradientError;

    fn try_from(stops: Vec<ColorStop>) -> Result<Self, Self::Error> {
        Gradient::new(stops)
    }
}

impl From<Gradient> for Vec<ColorStop> {
    fn from(gradient: Gradient) -> Self {
        gradient.stops
    }
}

/// Error constructing a [`Gradient`]
#[derive(Debug, Clone, PartialEq)]
pub enum GradientError {
    /// A gradient needs at least one stop
    Empty,
    /// Stop positions must lie in [0, 1]
    StopOutOfRange(f32),
}

impl std::fmt::Display for GradientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradientError::Empty => write!(f, "Gradient has no color stops"),
            GradientError::StopOutOfRange(p) => {
                write!(f, "Color stop position {} is outside [0, 1]", p)
            }
        }
    }
}

impl std::error::Error for GradientError {}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn color_approx_eq(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPSILON)
    }

    fn rgb() -> Gradient {
        Gradient::new(vec![
            ColorStop::new(1.0, [0.0, 0.0, 1.0, 1.0]),
            ColorStop::new(0.0, [1.0, 0.0, 0.0, 1.0]),
            ColorStop::new(0.5, [0.0, 1.0, 0.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_stops_are_sorted() {
        let positions: Vec<f32> = rgb().stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_rejects_invalid() {
        assert_eq!(Gradient::new(Vec::new()), Err(GradientError::Empty));
        assert_eq!(
            Gradient::new(vec![ColorStop::new(1.5, [1.0; 4])]),
            Err(GradientError::StopOutOfRange(1.5))
        );
        assert!(Gradient::new(vec![ColorStop::new(f32::NAN, [1.0; 4])]).is_err());
    }

    #[test]
    fn test_sample_interpolates() {
        let g = rgb();
        assert!(color_approx_eq(g.sample(0.0), [1.0, 0.0, 0.0, 1.0]));
        assert!(color_approx_eq(g.sample(0.25), [0.5, 0.5, 0.0, 1.0]));
        assert!(color_approx_eq(g.sample(0.5), [0.0, 1.0, 0.0, 1.0]));
        assert!(color_approx_eq(g.sample(0.75), [0.0, 0.5, 0.5, 1.0]));
    }

    #[test]
    fn test_sample_clamps_outside_stops() {
        let g = Gradient::new(vec![
            ColorStop::new(0.25, [1.0, 1.0, 1.0, 1.0]),
            ColorStop::new(0.75, [0.0, 0.0, 0.0, 1.0]),
        ])
        .unwrap();
        assert_eq!(g.sample(0.0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(g.sample(1.0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_single_stop_is_constant() {
        let g = Gradient::new(vec![ColorStop::new(0.3, [0.2, 0.4, 0.6, 1.0])]).unwrap();
        assert_eq!(g.sample(0.0), [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(g.sample(0.9), [0.2, 0.4, 0.6, 1.0]);
    }

    #[test]
    fn test_generate_black_to_red() {
        let colors = Gradient::black_to_red().generate(4);
        assert_eq!(colors.len(), 4);
        assert!(color_approx_eq(colors[0], [0.0, 0.0, 0.0, 1.0]));
        assert!(color_approx_eq(colors[2], [0.5, 0.0, 0.0, 1.0]));
        assert!(color_approx_eq(colors[3], [0.75, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_generate_zero_steps() {
        assert!(Gradient::white_to_black().generate(0).is_empty());
    }

    #[test]
    fn test_nearest_stop() {
        let g = rgb();
        assert_eq!(g.nearest_stop(0.2).position, 0.0);
        assert_eq!(g.nearest_stop(0.25).position, 0.0);
        assert_eq!(g.nearest_stop(0.3).position, 0.5);
        assert_eq!(g.nearest_stop(2.0).position, 1.0);
    }
}
