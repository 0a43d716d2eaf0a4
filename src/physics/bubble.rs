use eframe::egui::{Pos2, Vec2, vec2};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::BubbleConfig;
use crate::graph::BubbleDatum;

const GOLDEN_ANGLE: f32 = std::f32::consts::PI * (3.0 - 2.236_068);

/// Size of the area bubbles must stay inside, in screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    fn max_radius(self, min_radius: f32) -> f32 {
        (self.width.min(self.height) / 4.0).max(min_radius)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BubbleNode {
    pub datum: BubbleDatum,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BubblePhase {
    Uninitialized,
    Running,
    /// Heat has reached its floor; jitter keeps the bubbles drifting.
    Settled,
}

impl BubblePhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "waiting",
            Self::Running => "cooling",
            Self::Settled => "settled",
        }
    }
}

/// Packed-circle layout for the campaign bubbles.
///
/// Heat starts at 1 and decays toward zero but is held at `heat_floor`, so
/// the layout never freezes completely.
#[derive(Clone, Debug)]
pub struct BubbleSimulation {
    nodes: Vec<BubbleNode>,
    viewport: Viewport,
    config: BubbleConfig,
    heat: f32,
    phase: BubblePhase,
    rng: StdRng,
}

impl BubbleSimulation {
    pub fn new(data: Vec<BubbleDatum>, viewport: Viewport, config: BubbleConfig, seed: u64) -> Self {
        let config = config.sanitized();
        let radii = bubble_radii(&data, viewport, &config);
        let center = viewport.center();

        let nodes = data
            .into_iter()
            .zip(radii)
            .enumerate()
            .map(|(index, (datum, radius))| {
                let spiral = 10.0 * (0.5 + index as f32).sqrt();
                let angle = index as f32 * GOLDEN_ANGLE;
                BubbleNode {
                    datum,
                    position: center + vec2(angle.cos(), angle.sin()) * spiral,
                    velocity: Vec2::ZERO,
                    radius,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "bubble layout with {} bubbles in {}x{}",
            nodes.len(),
            viewport.width,
            viewport.height
        );

        let mut simulation = Self {
            nodes,
            viewport,
            config,
            heat: 1.0,
            phase: BubblePhase::Uninitialized,
            rng: StdRng::seed_from_u64(seed),
        };
        simulation.clamp_to_viewport();
        simulation
    }

    pub fn tick(&mut self) {
        if self.nodes.is_empty() {
            return;
        }

        let floor = self.config.heat_floor;
        self.heat = (self.heat - self.heat * self.config.heat_decay()).max(floor);
        self.phase = if self.heat <= floor {
            BubblePhase::Settled
        } else {
            BubblePhase::Running
        };

        self.apply_charge();
        self.apply_collisions();

        let retain = 1.0 - self.config.velocity_decay;
        for node in &mut self.nodes {
            node.velocity *= retain;
            node.position += node.velocity;
        }

        self.apply_centering();
        self.apply_jitter();
        self.clamp_to_viewport();
    }

    fn apply_charge(&mut self) {
        let strength = self.config.charge * self.heat;
        if strength == 0.0 {
            return;
        }

        let node_count = self.nodes.len();
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let delta = self.nodes[j].position - self.nodes[i].position;
                let distance_sq = delta.length_sq().max(1.0);
                let impulse = delta * (strength / distance_sq);
                self.nodes[i].velocity += impulse;
                self.nodes[j].velocity -= impulse;
            }
        }
    }

    fn apply_collisions(&mut self) {
        let strength = self.config.collision_strength;
        let padding = self.config.collision_padding;
        let node_count = self.nodes.len();

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let (a, b) = (&self.nodes[i], &self.nodes[j]);
                let mut delta = (a.position + a.velocity) - (b.position + b.velocity);
                let min_distance = a.radius + b.radius + padding * 2.0;
                let mut distance = delta.length();
                if distance >= min_distance {
                    continue;
                }

                if distance <= 0.0001 {
                    let angle =
                        ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * std::f32::consts::TAU;
                    delta = vec2(angle.cos(), angle.sin()) * 0.001;
                    distance = 0.001;
                }

                let radius_a_sq = a.radius * a.radius;
                let radius_b_sq = b.radius * b.radius;
                let share_a = radius_b_sq / (radius_a_sq + radius_b_sq);
                let push = delta * ((min_distance - distance) / distance * strength);

                self.nodes[i].velocity += push * share_a;
                self.nodes[j].velocity -= push * (1.0 - share_a);
            }
        }
    }

    fn apply_centering(&mut self) {
        let strength = self.config.centering;
        if strength <= 0.0 {
            return;
        }

        let mut centroid = Vec2::ZERO;
        for node in &self.nodes {
            centroid += node.position;
        }
        centroid /= self.nodes.len() as f32;

        let shift = (self.viewport.center() - centroid) * strength;
        for node in &mut self.nodes {
            node.position += shift;
        }
    }

    fn apply_jitter(&mut self) {
        let amplitude = self.config.jitter;
        if amplitude <= 0.0 {
            return;
        }

        for node in &mut self.nodes {
            let dx = (self.rng.r#gen::<f32>() - 0.5) * amplitude;
            let dy = (self.rng.r#gen::<f32>() - 0.5) * amplitude;
            node.position += vec2(dx, dy);
        }
    }

    fn clamp_to_viewport(&mut self) {
        let Viewport { width, height } = self.viewport;
        for node in &mut self.nodes {
            node.position.x = clamp_axis(node.position.x, node.radius, width);
            node.position.y = clamp_axis(node.position.y, node.radius, height);
        }
    }

    /// Adopts a new viewport. Positions and velocities carry over; radii are
    /// rescaled and anything now outside the bounds is pulled back in.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }

        debug!(
            "bubble viewport resized to {}x{}",
            viewport.width, viewport.height
        );
        self.viewport = viewport;
        let data = self
            .nodes
            .iter()
            .map(|node| node.datum.clone())
            .collect::<Vec<_>>();
        for (node, radius) in self
            .nodes
            .iter_mut()
            .zip(bubble_radii(&data, viewport, &self.config))
        {
            node.radius = radius;
        }
        self.clamp_to_viewport();
    }

    /// Topmost bubble under `point`, in viewport coordinates.
    pub fn hit_test(&self, point: Pos2) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, node)| (point.to_vec2() - node.position).length() <= node.radius)
            .map(|(index, _)| index)
    }

    pub fn nodes(&self) -> &[BubbleNode] {
        &self.nodes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn heat(&self) -> f32 {
        self.heat
    }

    pub fn phase(&self) -> BubblePhase {
        self.phase
    }
}

fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    if radius * 2.0 >= extent {
        extent * 0.5
    } else {
        value.clamp(radius, extent - radius)
    }
}

/// Square-root scale from `[0, max value]` onto `[min radius, max radius]`.
fn bubble_radii(data: &[BubbleDatum], viewport: Viewport, config: &BubbleConfig) -> Vec<f32> {
    let max_value = data.iter().map(|datum| datum.value).max().unwrap_or(0).max(1) as f32;
    let min_radius = config.min_radius;
    let max_radius = viewport.max_radius(min_radius);

    data.iter()
        .map(|datum| {
            let t = (datum.value as f32 / max_value).sqrt();
            min_radius + (max_radius - min_radius) * t
        })
        .collect()
}
