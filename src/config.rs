use crate::payload::PayloadPaths;

/// Constants of the network force layout. Values are tunable defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
    pub repulsion: f32,
    pub attraction: f32,
    pub centering: f32,
    pub damping: f32,
    pub distance_epsilon: f32,
    pub initial_spread: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            repulsion: 0.1,
            attraction: 0.002,
            centering: 0.001,
            damping: 0.95,
            distance_epsilon: 0.1,
            initial_spread: 30.0,
        }
    }
}

impl ForceConfig {
    /// Clamps every constant into a range where the layout stays stable.
    /// Damping is kept strictly below 1.
    pub fn sanitized(self) -> Self {
        Self {
            repulsion: finite_or(self.repulsion, 0.1).clamp(0.0, 10.0),
            attraction: finite_or(self.attraction, 0.002).clamp(0.0, 0.2),
            centering: finite_or(self.centering, 0.001).clamp(0.0, 0.1),
            damping: finite_or(self.damping, 0.95).clamp(0.0, 0.995),
            distance_epsilon: finite_or(self.distance_epsilon, 0.1).clamp(0.001, 10.0),
            initial_spread: finite_or(self.initial_spread, 30.0).clamp(1.0, 1000.0),
        }
    }
}

/// Constants of the campaign bubble layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleConfig {
    /// Pairwise charge; positive pulls bubbles together, negative pushes apart.
    pub charge: f32,
    /// Fraction of the centroid offset removed per tick.
    pub centering: f32,
    pub collision_strength: f32,
    pub collision_padding: f32,
    pub velocity_decay: f32,
    pub heat_min: f32,
    pub heat_floor: f32,
    pub heat_decay_ticks: u32,
    pub jitter: f32,
    pub min_radius: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            charge: 5.0,
            centering: 1.0,
            collision_strength: 1.0,
            collision_padding: 1.0,
            velocity_decay: 0.4,
            heat_min: 0.001,
            heat_floor: 0.01,
            heat_decay_ticks: 300,
            jitter: 0.1,
            min_radius: 20.0,
        }
    }
}

impl BubbleConfig {
    pub fn sanitized(self) -> Self {
        Self {
            charge: finite_or(self.charge, 5.0).clamp(-200.0, 200.0),
            centering: finite_or(self.centering, 1.0).clamp(0.0, 1.0),
            collision_strength: finite_or(self.collision_strength, 1.0).clamp(0.0, 1.0),
            collision_padding: finite_or(self.collision_padding, 1.0).clamp(0.0, 50.0),
            velocity_decay: finite_or(self.velocity_decay, 0.4).clamp(0.01, 1.0),
            heat_min: finite_or(self.heat_min, 0.001).clamp(1e-6, 0.5),
            heat_floor: finite_or(self.heat_floor, 0.01).clamp(0.0, 1.0),
            heat_decay_ticks: self.heat_decay_ticks.max(1),
            jitter: finite_or(self.jitter, 0.1).clamp(0.0, 10.0),
            min_radius: finite_or(self.min_radius, 20.0).clamp(1.0, 500.0),
        }
    }

    /// Per-tick heat decay that reaches `heat_min` after `heat_decay_ticks`.
    pub fn heat_decay(&self) -> f32 {
        1.0 - self.heat_min.powf(1.0 / self.heat_decay_ticks as f32)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Everything the dashboard needs at start-up.
#[derive(Clone, Debug, Default)]
pub struct DashboardConfig {
    pub paths: PayloadPaths,
    pub force: ForceConfig,
    pub bubble: BubbleConfig,
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn sanitized_keeps_damping_below_one() {
        let config = ForceConfig {
            damping: 1.4,
            repulsion: f32::NAN,
            ..ForceConfig::default()
        }
        .sanitized();

        assert!(config.damping < 1.0);
        assert_relative_eq!(config.repulsion, 0.1);
    }

    #[test]
    fn defaults_survive_sanitizing() {
        assert_eq!(ForceConfig::default().sanitized(), ForceConfig::default());
        assert_eq!(BubbleConfig::default().sanitized(), BubbleConfig::default());
    }

    #[test]
    fn heat_reaches_minimum_after_configured_ticks() {
        let config = BubbleConfig::default();
        let heat = (1.0 - config.heat_decay()).powi(config.heat_decay_ticks as i32);
        assert_relative_eq!(heat, config.heat_min, epsilon = 1e-5);
    }
}
