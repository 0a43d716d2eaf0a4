mod bubble;
mod forces;

use log::debug;
use nalgebra::SVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ForceConfig;
use crate::graph::RelationGraph;

pub use bubble::{BubbleSimulation, Viewport};
use forces::{apply_attraction, apply_centering, apply_repulsion, integrate};

/// One simulated entity: position, velocity and a pin flag.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode<const D: usize> {
    pub entity: usize,
    pub position: SVector<f32, D>,
    pub velocity: SVector<f32, D>,
    pub is_pinned: bool,
}

impl<const D: usize> SimNode<D> {
    pub fn at(entity: usize, position: SVector<f32, D>) -> Self {
        Self {
            entity,
            position,
            velocity: SVector::zeros(),
            is_pinned: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationPhase {
    Uninitialized,
    Running,
}

impl SimulationPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "waiting",
            Self::Running => "running",
        }
    }
}

/// Read-only per-frame view for the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSnapshot<const D: usize> {
    pub positions: Vec<(usize, SVector<f32, D>)>,
    pub edges: Vec<(usize, usize)>,
}

/// Force-directed layout over `D` dimensions. Owned by the view that shows it;
/// advanced one tick per frame with [`ForceSimulation::tick`] or [`step`].
#[derive(Clone, Debug)]
pub struct ForceSimulation<const D: usize> {
    nodes: Vec<SimNode<D>>,
    edges: Vec<(usize, usize)>,
    config: ForceConfig,
    phase: SimulationPhase,
    ticks: u64,
}

impl<const D: usize> ForceSimulation<D> {
    /// Seeds every entity at a random point inside a cube of side
    /// `initial_spread` centred on the origin, at rest.
    pub fn seeded(graph: &RelationGraph, config: ForceConfig, seed: u64) -> Self {
        let config = config.sanitized();
        let mut rng = StdRng::seed_from_u64(seed);
        let nodes = graph
            .entities
            .iter()
            .map(|entity| {
                let position = SVector::<f32, D>::from_fn(|_, _| {
                    (rng.r#gen::<f32>() - 0.5) * config.initial_spread
                });
                SimNode::at(entity.id, position)
            })
            .collect::<Vec<_>>();

        debug!(
            "seeded {}-d layout with {} nodes and {} edges (seed {seed})",
            D,
            nodes.len(),
            graph.edges.len()
        );

        Self::from_parts(nodes, graph.edge_pairs(), config)
    }

    pub fn from_parts(
        nodes: Vec<SimNode<D>>,
        edges: Vec<(usize, usize)>,
        config: ForceConfig,
    ) -> Self {
        Self {
            nodes,
            edges,
            config: config.sanitized(),
            phase: SimulationPhase::Uninitialized,
            ticks: 0,
        }
    }

    /// Advances the layout by one frame. `dt` is in seconds; one 60 Hz frame
    /// is one unscaled step. Slower frames are split into substeps no larger
    /// than one unscaled step, so a long frame never stiffens the springs.
    pub fn tick(&mut self, dt: f32) {
        self.phase = SimulationPhase::Running;
        self.ticks += 1;
        if self.nodes.is_empty() {
            return;
        }

        let (substeps, step_scale) = substeps(time_scale(dt));
        for _ in 0..substeps {
            self.substep(step_scale);
        }
    }

    fn substep(&mut self, time_scale: f32) {
        let config = self.config;
        apply_repulsion(
            &mut self.nodes,
            config.repulsion,
            config.distance_epsilon,
            time_scale,
        );
        apply_attraction(&mut self.nodes, &self.edges, config.attraction, time_scale);
        apply_centering(&mut self.nodes, config.centering, time_scale);
        integrate(&mut self.nodes, config.damping, time_scale);
    }

    #[cfg(test)]
    pub fn nodes(&self) -> &[SimNode<D>] {
        &self.nodes
    }

    #[cfg(test)]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> ForceConfig {
        self.config
    }

    pub fn set_config(&mut self, config: ForceConfig) {
        self.config = config.sanitized();
    }

    #[cfg(test)]
    pub fn position(&self, index: usize) -> Option<SVector<f32, D>> {
        self.nodes.get(index).map(|node| node.position)
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.nodes.get(index).is_some_and(|node| node.is_pinned)
    }

    pub fn set_pinned(&mut self, index: usize, pinned: bool) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.is_pinned = pinned;
        }
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.nodes
            .iter()
            .map(|node| node.velocity.norm_squared() * 0.5)
            .sum()
    }

    pub fn snapshot(&self) -> LayoutSnapshot<D> {
        LayoutSnapshot {
            positions: self
                .nodes
                .iter()
                .map(|node| (node.entity, node.position))
                .collect(),
            edges: self.edges.clone(),
        }
    }
}

impl<const D: usize> Default for ForceSimulation<D> {
    fn default() -> Self {
        Self::from_parts(Vec::new(), Vec::new(), ForceConfig::default())
    }
}

/// Pure form of [`ForceSimulation::tick`].
pub fn step<const D: usize>(mut state: ForceSimulation<D>, dt: f32) -> ForceSimulation<D> {
    state.tick(dt);
    state
}

fn time_scale(dt: f32) -> f32 {
    if dt.is_finite() {
        (dt * 60.0).clamp(0.25, 3.0)
    } else {
        1.0
    }
}

/// Splits a frame's time scale into equal steps of at most 1.0.
fn substeps(time_scale: f32) -> (u32, f32) {
    let count = (time_scale - 1e-3).ceil().max(1.0) as u32;
    (count, time_scale / count as f32)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use approx::assert_relative_eq;
    use nalgebra::{Vector2, Vector3};
    use serde_json::json;

    use super::*;
    use crate::payload::NetworkPayload;

    const FRAME: f32 = 1.0 / 60.0;

    /// Two campaigns, four users, three keywords with fixed wiring.
    fn synthetic_graph() -> RelationGraph {
        RelationGraph::build(&NetworkPayload::from_value(&json!({
            "campaign": {
                "c1": {
                    "u1": { "hatekeywords": ["k1"] },
                    "u2": { "hatekeywords": ["k1"] }
                },
                "c2": {
                    "u3": { "hatekeywords": ["k2"] },
                    "u4": { "hatekeywords": ["k3"] }
                }
            }
        })))
    }

    fn mean_distances<const D: usize>(simulation: &ForceSimulation<D>) -> (f32, f32) {
        let linked = simulation
            .edges()
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect::<HashSet<_>>();
        let nodes = simulation.nodes();

        let mut linked_sum = 0.0;
        let mut unlinked_sum = 0.0;
        let mut unlinked_count = 0usize;
        for &(a, b) in &linked {
            linked_sum += (nodes[a].position - nodes[b].position).norm();
        }
        for a in 0..nodes.len() {
            for b in (a + 1)..nodes.len() {
                if !linked.contains(&(a, b)) {
                    unlinked_sum += (nodes[a].position - nodes[b].position).norm();
                    unlinked_count += 1;
                }
            }
        }

        (
            linked_sum / linked.len() as f32,
            unlinked_sum / unlinked_count as f32,
        )
    }

    #[test]
    fn empty_simulation_ticks_without_effect() {
        let simulation = ForceSimulation::<3>::seeded(
            &RelationGraph::default(),
            ForceConfig::default(),
            7,
        );
        assert_eq!(simulation.phase(), SimulationPhase::Uninitialized);

        let simulation = step(simulation, FRAME);
        assert_eq!(simulation.phase(), SimulationPhase::Running);
        assert!(simulation.snapshot().positions.is_empty());
        assert!(simulation.snapshot().edges.is_empty());
    }

    #[test]
    fn single_node_trends_to_origin() {
        let mut simulation = ForceSimulation::from_parts(
            vec![SimNode::at(0, Vector3::new(12.0, -8.0, 5.0))],
            Vec::new(),
            ForceConfig::default(),
        );

        let start = simulation.nodes()[0].position.norm();
        let mut previous_peak = start;
        for round in 0..10 {
            let mut peak = 0.0_f32;
            for _ in 0..300 {
                simulation.tick(FRAME);
                peak = peak.max(simulation.nodes()[0].position.norm());
            }
            assert!(peak.is_finite());
            assert!(peak <= previous_peak + 1e-3, "round {round} diverged");
            previous_peak = peak;
        }

        assert!(simulation.nodes()[0].position.norm() < start * 0.01);
    }

    #[test]
    fn resting_node_at_origin_stays_put() {
        let mut node = SimNode::at(0, Vector2::zeros());
        node.velocity = Vector2::new(0.5, -0.25);
        let mut simulation = ForceSimulation::from_parts(vec![node], Vec::new(), ForceConfig::default());

        for _ in 0..3000 {
            simulation.tick(FRAME);
        }

        assert!(simulation.nodes()[0].velocity.norm() < 1e-6);
        assert!(simulation.nodes()[0].position.norm() < 1e-3);
    }

    #[test]
    fn linked_nodes_end_closer_than_unlinked_in_3d() {
        let graph = synthetic_graph();
        assert_eq!(graph.len(), 9);

        let mut simulation = ForceSimulation::<3>::seeded(&graph, ForceConfig::default(), 42);
        for _ in 0..500 {
            simulation.tick(FRAME);
        }

        let (linked, unlinked) = mean_distances(&simulation);
        assert!(linked < unlinked, "linked {linked} vs unlinked {unlinked}");
    }

    #[test]
    fn linked_nodes_end_closer_than_unlinked_in_2d() {
        let graph = synthetic_graph();
        for seed in [1, 2, 3] {
            let mut simulation = ForceSimulation::<2>::seeded(&graph, ForceConfig::default(), seed);
            for _ in 0..500 {
                simulation = step(simulation, FRAME);
            }

            let (linked, unlinked) = mean_distances(&simulation);
            assert!(linked < unlinked, "seed {seed}: {linked} vs {unlinked}");
        }
    }

    #[test]
    fn disconnected_nodes_separate_without_escaping() {
        let nodes = (0..2).map(|entity| SimNode::at(entity, Vector3::zeros())).collect();
        let mut simulation = ForceSimulation::from_parts(nodes, Vec::new(), ForceConfig::default());

        for _ in 0..2000 {
            simulation.tick(FRAME);
        }

        let separation =
            (simulation.nodes()[0].position - simulation.nodes()[1].position).norm();
        assert!(separation > 4.0 && separation < 8.0, "separation {separation}");
        assert!(simulation.nodes()[0].position.norm() < 8.0);
    }

    #[test]
    fn pinned_nodes_hold_their_position() {
        let graph = synthetic_graph();
        let mut simulation = ForceSimulation::<3>::seeded(&graph, ForceConfig::default(), 9);
        let anchor = simulation.position(0).expect("node exists");
        simulation.set_pinned(0, true);

        for _ in 0..100 {
            simulation.tick(FRAME);
        }

        assert!(simulation.is_pinned(0));
        assert_eq!(simulation.position(0), Some(anchor));
        assert_ne!(simulation.position(1), None);
    }

    #[test]
    fn seeding_is_deterministic_and_bounded() {
        let graph = synthetic_graph();
        let first = ForceSimulation::<3>::seeded(&graph, ForceConfig::default(), 5);
        let second = ForceSimulation::<3>::seeded(&graph, ForceConfig::default(), 5);
        assert_eq!(first.snapshot(), second.snapshot());

        let half = ForceConfig::default().initial_spread / 2.0;
        assert!(first.nodes().iter().all(|node| {
            node.position.iter().all(|component| component.abs() <= half)
                && node.velocity.norm() == 0.0
        }));
    }

    #[test]
    fn snapshot_reports_entity_ids_and_edges() {
        let graph = synthetic_graph();
        let simulation = ForceSimulation::<3>::seeded(&graph, ForceConfig::default(), 1);
        let snapshot = simulation.snapshot();

        let ids = snapshot.positions.iter().map(|(id, _)| *id).collect::<Vec<_>>();
        assert_eq!(ids, (0..graph.len()).collect::<Vec<_>>());
        assert_eq!(snapshot.edges, graph.edge_pairs());
    }

    #[test]
    fn frame_sized_step_matches_unscaled_tick() {
        let nodes = vec![
            SimNode::at(0, Vector2::new(1.0, 0.0)),
            SimNode::at(1, Vector2::new(-1.0, 0.0)),
        ];
        let config = ForceConfig {
            attraction: 0.0,
            centering: 0.0,
            ..ForceConfig::default()
        };
        let simulation = step(ForceSimulation::from_parts(nodes, Vec::new(), config), FRAME);

        let push = 0.1 / (2.1 * 2.1);
        assert_relative_eq!(simulation.nodes()[0].position.x, 1.0 + push, epsilon = 1e-6);
        assert_relative_eq!(simulation.nodes()[0].velocity.x, push * 0.95, epsilon = 1e-6);
        assert_relative_eq!(simulation.nodes()[1].position.x, -1.0 - push, epsilon = 1e-6);
    }

    #[test]
    fn layout_stays_finite_for_a_few_hundred_nodes() {
        let mut campaigns = serde_json::Map::new();
        for campaign in 0..6 {
            let mut users = serde_json::Map::new();
            for user in 0..20 {
                let keywords = (0..3)
                    .map(|keyword| format!("k{}", (campaign * 7 + user + keyword) % 40))
                    .collect::<Vec<_>>();
                users.insert(
                    format!("u{campaign}_{user}"),
                    json!({ "hatekeywords": keywords }),
                );
            }
            campaigns.insert(format!("c{campaign}"), serde_json::Value::Object(users));
        }
        let graph = RelationGraph::build(&NetworkPayload::from_value(
            &json!({ "campaign": campaigns }),
        ));
        assert!(graph.len() > 150);

        let mut simulation = ForceSimulation::<3>::seeded(&graph, ForceConfig::default(), 11);
        for _ in 0..200 {
            simulation.tick(FRAME);
        }

        assert!(simulation.nodes().iter().all(|node| {
            node.position.iter().all(|component| component.is_finite() && component.abs() < 500.0)
        }));
    }

    #[test]
    fn long_frames_split_into_unit_substeps() {
        assert_eq!(substeps(1.0), (1, 1.0));
        assert_eq!(substeps(0.25), (1, 0.25));
        assert_eq!(substeps(3.0), (3, 1.0));

        let (count, scale) = substeps(time_scale(0.04));
        assert_eq!(count, 3);
        assert!(scale <= 1.0);
    }

    #[test]
    fn slow_frame_matches_three_fast_frames() {
        let graph = synthetic_graph();
        let mut slow = ForceSimulation::<3>::seeded(&graph, ForceConfig::default(), 4);
        let mut fast = slow.clone();

        for _ in 0..20 {
            slow.tick(3.0 / 60.0);
            for _ in 0..3 {
                fast.tick(FRAME);
            }
        }

        for (a, b) in slow.nodes().iter().zip(fast.nodes()) {
            assert!((a.position - b.position).norm() < 1e-3);
        }
    }

    #[test]
    fn hub_graph_stays_bounded_at_twenty_fps() {
        let users = (0..300)
            .map(|user| {
                (
                    format!("user{user}"),
                    json!({ "hatekeywords": [format!("kw{}", user % 50)] }),
                )
            })
            .collect::<serde_json::Map<_, _>>();
        let graph = RelationGraph::build(&NetworkPayload::from_value(
            &json!({ "campaign": { "hub": users } }),
        ));
        assert_eq!(graph.len(), 351);

        let mut simulation = ForceSimulation::<3>::seeded(&graph, ForceConfig::default(), 3);
        for _ in 0..400 {
            simulation.tick(1.0 / 20.0);
        }

        assert!(simulation.nodes().iter().all(|node| {
            node.position.iter().all(|component| component.is_finite() && component.abs() < 100.0)
        }));
    }
}
