//! Demo scene: walker trajectories drawn as two line layers

mod layers;
mod walkers;

pub use layers::{build_layer, layer_polylines, LayerKind};
pub use walkers::{
    InteractionLaw, RelationModel, SeedStream, Trajectories, WalkerParams, WalkerSeeds, WalkerSystem,
};
