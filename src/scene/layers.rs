//! Line layers built from walker trajectories
//!
//! Both layers draw the same recorded points. Rings connect the walkers of one
//! iteration; edges follow one walker through every iteration.

use strand_core::{LinePoint, Polyline};
use strand_render::{GeometryError, RibbonGeometry};
use crate::config::LayerConfig;
use super::Trajectories;

/// Which lines a layer draws through the trajectory points
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// One line per iteration
    Rings,
    /// One line per walker
    Edges,
}

impl LayerKind {
    /// Point index sequences, one per line
    fn lines(self, trajectories: &Trajectories) -> Vec<Vec<u32>> {
        match self {
            LayerKind::Rings => (0..trajectories.iteration_count())
                .map(|i| trajectories.ring_indices(i))
                .collect(),
            LayerKind::Edges => (0..trajectories.walker_count())
                .map(|w| trajectories.trajectory_indices(w))
                .collect(),
        }
    }
}

/// Trajectory points colored by the layer style
fn layer_points(trajectories: &Trajectories, layer: &LayerConfig) -> Vec<LinePoint> {
    let positions = trajectories.positions();
    positions
        .iter()
        .zip(layer.colors(positions.len()))
        .map(|(&p, color)| LinePoint::new(p, color))
        .collect()
}

/// GPU geometry for one layer
///
/// Lines with fewer than two points are skipped.
pub fn build_layer(
    trajectories: &Trajectories,
    kind: LayerKind,
    layer: &LayerConfig,
) -> Result<RibbonGeometry, GeometryError> {
    let lines = kind.lines(trajectories);
    let mut geometry = RibbonGeometry::with_capacity(
        trajectories.positions().len(),
        lines.iter().map(Vec::len).sum(),
    );

    geometry.add_points(&layer_points(trajectories, layer));
    for indices in &lines {
        geometry.add_indexed_line(indices, layer.closed)?;
    }

    log::debug!(
        "Built {:?} layer: {} points, {} segments",
        kind,
        geometry.point_count(),
        geometry.segment_count()
    );
    Ok(geometry)
}

/// The layer's lines as standalone polylines
pub fn layer_polylines(trajectories: &Trajectories, kind: LayerKind, layer: &LayerConfig) -> Vec<Polyline> {
    let points = layer_points(trajectories, layer);
    kind.lines(trajectories)
        .into_iter()
        .filter_map(|indices| {
            let line: Vec<LinePoint> = indices.iter().map(|&i| points[i as usize]).collect();
            let polyline = if layer.closed {
                Polyline::closed(line)
            } else {
                Polyline::new(line)
            };
            polyline.ok()
        })
        .collect()
}
