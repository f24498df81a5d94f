//! Interacting random walkers
//!
//! A set of walkers starts at random positions and is pulled towards the
//! walkers it is related to, once per iteration. Every iteration's positions
//! are recorded, so the result can be drawn both as one ring per iteration and
//! as one trajectory per walker.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Serialize, Deserialize};
use strand_math::Vec3;

/// Velocity gain of the velocity interaction law
const VELOCITY_GAIN: f32 = 0.1;

/// Probability floor for a relation in the sparse model (plus `1 / count`)
const SPARSE_DENSITY: f64 = 0.25;

/// How relations move the walkers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionLaw {
    /// Relations displace positions directly
    #[default]
    Position,
    /// Relations accelerate, velocities accumulate
    Velocity,
}

/// Which walkers are related to which
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationModel {
    /// Walker `i` follows walker `i + 1`, the last follows the first
    #[default]
    OneToOne,
    /// Random relations
    Sparse,
    /// Every walker follows every other
    ManyToMany,
}

/// One of the independent random streams behind a simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedStream {
    /// Start positions
    Positions,
    /// Which walkers follow which
    Layout,
    /// Relation strengths
    Strengths,
}

/// Seeds of the random streams
///
/// Each stream is drawn on its own, so reseeding one keeps what the others
/// produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerSeeds {
    pub positions: u64,
    pub layout: u64,
    pub strengths: u64,
}

impl Default for WalkerSeeds {
    fn default() -> Self {
        Self {
            positions: 1,
            layout: 2,
            strengths: 3,
        }
    }
}

impl WalkerSeeds {
    /// Advance one stream's seed, returning the new value
    pub fn reseed(&mut self, stream: SeedStream) -> u64 {
        let seed = match stream {
            SeedStream::Positions => &mut self.positions,
            SeedStream::Layout => &mut self.layout,
            SeedStream::Strengths => &mut self.strengths,
        };
        *seed = seed.wrapping_add(1);
        *seed
    }
}

/// Walker simulation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkerParams {
    /// Number of walkers
    pub count: usize,
    /// Start positions are drawn from `]-spread, spread[` per axis
    pub spread: f32,
    pub law: InteractionLaw,
    pub relations: RelationModel,
    /// Mean relation strength
    pub relation_avg: f32,
    /// Relation strengths vary uniformly by up to this much around the mean
    pub relation_var: f32,
    /// Number of recorded iterations, the start positions included
    pub iterations: usize,
    /// Random seeds, the same seeds always yield the same trajectories
    pub seeds: WalkerSeeds,
}

impl Default for WalkerParams {
    fn default() -> Self {
        Self {
            count: 3,
            spread: 10.0,
            law: InteractionLaw::Position,
            relations: RelationModel::OneToOne,
            relation_avg: 0.1,
            relation_var: 0.0,
            iterations: 10,
            seeds: WalkerSeeds::default(),
        }
    }
}

/// Recorded walker positions, iteration-major
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectories {
    walkers: usize,
    iterations: usize,
    positions: Vec<Vec3>,
}

impl Trajectories {
    /// Number of walkers
    pub fn walker_count(&self) -> usize {
        self.walkers
    }

    /// Number of recorded iterations
    pub fn iteration_count(&self) -> usize {
        self.iterations
    }

    /// All positions; iteration `i` occupies `i * walker_count()..(i + 1) * walker_count()`
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Position of `walker` at `iteration`
    pub fn position(&self, iteration: usize, walker: usize) -> Option<Vec3> {
        if walker >= self.walkers {
            return None;
        }
        self.positions.get(iteration * self.walkers + walker).copied()
    }

    /// Point indices of the ring formed by every walker at `iteration`
    pub fn ring_indices(&self, iteration: usize) -> Vec<u32> {
        if iteration >= self.iterations {
            return Vec::new();
        }
        let start = (iteration * self.walkers) as u32;
        (start..start + self.walkers as u32).collect()
    }

    /// Point indices of `walker`'s path through every iteration
    pub fn trajectory_indices(&self, walker: usize) -> Vec<u32> {
        if walker >= self.walkers {
            return Vec::new();
        }
        (0..self.iterations)
            .map(|i| (i * self.walkers + walker) as u32)
            .collect()
    }
}

/// Runs the walker simulation
pub struct WalkerSystem {
    params: WalkerParams,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    /// Row `i` holds the strength with which walker `i` follows each walker
    relations: Vec<Vec<f32>>,
}

impl WalkerSystem {
    /// Draw start positions and relations for `params`
    ///
    /// Positions, relation layout and relation strengths come from separate
    /// seeded streams, so switching the relation model keeps the start
    /// positions.
    pub fn new(params: WalkerParams) -> Self {
        let mut position_rng = StdRng::seed_from_u64(params.seeds.positions);
        let mut layout_rng = StdRng::seed_from_u64(params.seeds.layout);
        let mut strength_rng = StdRng::seed_from_u64(params.seeds.strengths);

        let n = params.count;
        let positions = (0..n)
            .map(|_| {
                Vec3::new(
                    symmetric(&mut position_rng, params.spread),
                    symmetric(&mut position_rng, params.spread),
                    symmetric(&mut position_rng, params.spread),
                )
            })
            .collect();

        let relations = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        let strength = params.relation_avg
                            + symmetric(&mut strength_rng, params.relation_var);
                        if related(params.relations, i, j, n, &mut layout_rng) {
                            strength
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            params,
            positions,
            velocities: vec![Vec3::ZERO; n],
            relations,
        }
    }

    pub fn params(&self) -> &WalkerParams {
        &self.params
    }

    /// Current positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Relation strength with which walker `i` follows walker `j`
    pub fn relation(&self, i: usize, j: usize) -> f32 {
        self.relations
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(0.0)
    }

    /// Advance every walker by one iteration
    pub fn step(&mut self) {
        let pulls: Vec<Vec3> = (0..self.positions.len())
            .map(|i| self.pull(i))
            .collect();

        match self.params.law {
            InteractionLaw::Position => {
                for (position, pull) in self.positions.iter_mut().zip(pulls) {
                    *position = *position + pull;
                }
            }
            InteractionLaw::Velocity => {
                for ((position, velocity), pull) in self
                    .positions
                    .iter_mut()
                    .zip(self.velocities.iter_mut())
                    .zip(pulls)
                {
                    *velocity = *velocity + pull * VELOCITY_GAIN;
                    *position = *position + *velocity;
                }
            }
        }
    }

    /// Weighted sum of the offsets from walker `i` to the walkers it follows
    fn pull(&self, i: usize) -> Vec3 {
        let origin = self.positions[i];
        self.positions
            .iter()
            .zip(&self.relations[i])
            .fold(Vec3::ZERO, |acc, (&other, &strength)| acc + (other - origin) * strength)
    }

    /// Record the start positions and `iterations - 1` further steps
    pub fn run(mut self) -> Trajectories {
        let iterations = self.params.iterations;
        let walkers = self.params.count;
        let mut positions = Vec::with_capacity(iterations * walkers);

        for i in 0..iterations {
            if i > 0 {
                self.step();
            }
            positions.extend_from_slice(&self.positions);
        }

        log::debug!(
            "Simulated {} walkers over {} iterations ({:?} law, {:?} relations)",
            walkers,
            iterations,
            self.params.law,
            self.params.relations
        );

        Trajectories {
            walkers,
            iterations,
            positions,
        }
    }
}

/// Uniform sample in `]-extent, extent[`
fn symmetric(rng: &mut StdRng, extent: f32) -> f32 {
    (rng.gen::<f32>() * 2.0 - 1.0) * extent
}

/// Whether walker `i` follows walker `j`; nobody follows themselves
fn related(model: RelationModel, i: usize, j: usize, count: usize, rng: &mut StdRng) -> bool {
    // Drawn for every pair so the layout does not depend on the diagonal
    let roll = rng.gen::<f64>();
    if i == j {
        return false;
    }
    match model {
        RelationModel::OneToOne => j == (i + 1) % count,
        RelationModel::Sparse => roll < SPARSE_DENSITY + 1.0 / count as f64,
        RelationModel::ManyToMany => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(count: usize, iterations: usize) -> WalkerParams {
        WalkerParams {
            count,
            iterations,
            seeds: WalkerSeeds {
                positions: 7,
                layout: 8,
                strengths: 9,
            },
            ..WalkerParams::default()
        }
    }

    #[test]
    fn test_same_seed_same_trajectories() {
        let a = WalkerSystem::new(params(5, 20)).run();
        let b = WalkerSystem::new(params(5, 20)).run();
        assert_eq!(a, b);

        let mut reseeded = params(5, 20);
        reseeded.seeds.reseed(SeedStream::Positions);
        let c = WalkerSystem::new(reseeded).run();
        assert_ne!(a, c);
    }

    #[test]
    fn test_start_positions_within_spread() {
        let system = WalkerSystem::new(WalkerParams { spread: 2.5, ..params(50, 1) });
        for p in system.positions() {
            assert!(p.x.abs() < 2.5 && p.y.abs() < 2.5 && p.z.abs() < 2.5);
        }
    }

    #[test]
    fn test_one_to_one_relations() {
        let system = WalkerSystem::new(params(4, 1));
        for i in 0..4 {
            for j in 0..4 {
                let expected = if j == (i + 1) % 4 { 0.1 } else { 0.0 };
                assert_eq!(system.relation(i, j), expected, "relation {} -> {}", i, j);
            }
        }
    }

    #[test]
    fn test_many_to_many_has_empty_diagonal() {
        let system = WalkerSystem::new(WalkerParams {
            relations: RelationModel::ManyToMany,
            ..params(3, 1)
        });
        for i in 0..3 {
            assert_eq!(system.relation(i, i), 0.0);
            assert_eq!(system.relation(i, (i + 1) % 3), 0.1);
        }
    }

    #[test]
    fn test_relation_model_keeps_start_positions() {
        let one = WalkerSystem::new(params(6, 1));
        let sparse = WalkerSystem::new(WalkerParams {
            relations: RelationModel::Sparse,
            ..params(6, 1)
        });
        assert_eq!(one.positions(), sparse.positions());
    }

    #[test]
    fn test_reseeding_relations_keeps_start_positions() {
        let base = WalkerSystem::new(WalkerParams {
            relations: RelationModel::Sparse,
            relation_var: 0.05,
            ..params(6, 1)
        });

        for stream in [SeedStream::Layout, SeedStream::Strengths] {
            let mut next = base.params().clone();
            next.seeds.reseed(stream);
            let reseeded = WalkerSystem::new(next);
            assert_eq!(reseeded.positions(), base.positions(), "{:?}", stream);

            let relations_changed = (0..6)
                .flat_map(|i| (0..6).map(move |j| (i, j)))
                .any(|(i, j)| reseeded.relation(i, j) != base.relation(i, j));
            assert!(relations_changed, "{:?}", stream);
        }
    }

    #[test]
    fn test_reseeding_positions_keeps_relations() {
        let base = WalkerSystem::new(WalkerParams {
            relations: RelationModel::Sparse,
            relation_var: 0.05,
            ..params(6, 1)
        });
        let mut next = base.params().clone();
        next.seeds.reseed(SeedStream::Positions);
        let reseeded = WalkerSystem::new(next);

        assert_ne!(reseeded.positions(), base.positions());
        for i in 0..6 {
            for j in 0..6 {
                assert_eq!(reseeded.relation(i, j), base.relation(i, j));
            }
        }
    }

    #[test]
    fn test_reseed_advances_one_stream() {
        let mut seeds = WalkerSeeds::default();
        assert_eq!(seeds.reseed(SeedStream::Layout), 3);
        assert_eq!(seeds, WalkerSeeds { positions: 1, layout: 3, strengths: 3 });

        let mut last = WalkerSeeds { strengths: u64::MAX, ..WalkerSeeds::default() };
        assert_eq!(last.reseed(SeedStream::Strengths), 0);
    }

    #[test]
    fn test_position_law_contracts_pair() {
        // Two walkers following each other close 20% of their distance per step
        let trajectories = WalkerSystem::new(params(2, 3)).run();
        let gap = |i: usize| {
            let a = trajectories.position(i, 0).unwrap();
            let b = trajectories.position(i, 1).unwrap();
            (b - a).length()
        };
        assert!((gap(1) - gap(0) * 0.8).abs() < 1e-4);
        assert!((gap(2) - gap(0) * 0.64).abs() < 1e-4);
    }

    #[test]
    fn test_velocity_law_accumulates() {
        let mut system = WalkerSystem::new(WalkerParams {
            law: InteractionLaw::Velocity,
            ..params(2, 1)
        });
        let start = system.positions().to_vec();
        let pull = (start[1] - start[0]) * 0.1 * VELOCITY_GAIN;

        system.step();
        let first = system.positions()[0] - start[0];
        assert!((first - pull).length() < 1e-5);

        // The second step moves at least as far as the first
        let before = system.positions()[0];
        system.step();
        assert!((system.positions()[0] - before).length() >= first.length() - 1e-6);
    }

    #[test]
    fn test_zero_strength_keeps_walkers_still() {
        let trajectories = WalkerSystem::new(WalkerParams {
            relation_avg: 0.0,
            relations: RelationModel::ManyToMany,
            ..params(4, 5)
        })
        .run();
        for i in 1..5 {
            for w in 0..4 {
                assert_eq!(trajectories.position(i, w), trajectories.position(0, w));
            }
        }
    }

    #[test]
    fn test_trajectory_layout() {
        let trajectories = WalkerSystem::new(params(3, 4)).run();
        assert_eq!(trajectories.positions().len(), 12);
        assert_eq!(trajectories.ring_indices(2), vec![6, 7, 8]);
        assert_eq!(trajectories.trajectory_indices(1), vec![1, 4, 7, 10]);
        assert!(trajectories.ring_indices(4).is_empty());
        assert!(trajectories.trajectory_indices(3).is_empty());
        assert_eq!(trajectories.position(0, 3), None);
    }
}
