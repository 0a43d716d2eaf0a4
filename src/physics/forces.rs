use nalgebra::SVector;

use super::SimNode;

const MIN_SEPARATION: f32 = 1e-6;

/// Unit-ish direction used when two nodes share a position.
fn fallback_direction<const D: usize>(i: usize, j: usize) -> SVector<f32, D> {
    let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * std::f32::consts::TAU;
    let mut direction = SVector::<f32, D>::zeros();
    if D > 0 {
        direction[0] = angle.cos();
    }
    if D > 1 {
        direction[1] = angle.sin();
    }
    direction
}

/// Inverse-square push between every unordered pair.
pub(super) fn apply_repulsion<const D: usize>(
    nodes: &mut [SimNode<D>],
    strength: f32,
    epsilon: f32,
    time_scale: f32,
) {
    let node_count = nodes.len();
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = nodes[i].position - nodes[j].position;
            let length = delta.norm();
            let direction = if length > MIN_SEPARATION {
                delta / length
            } else {
                fallback_direction(i, j)
            };

            let distance = length + epsilon;
            let force = direction * (strength / (distance * distance) * time_scale);
            nodes[i].velocity += force;
            nodes[j].velocity -= force;
        }
    }
}

/// Linear pull along every edge.
pub(super) fn apply_attraction<const D: usize>(
    nodes: &mut [SimNode<D>],
    edges: &[(usize, usize)],
    strength: f32,
    time_scale: f32,
) {
    let node_count = nodes.len();
    for &(source, target) in edges {
        if source >= node_count || target >= node_count || source == target {
            continue;
        }

        let delta = nodes[target].position - nodes[source].position;
        let force = delta * (strength * time_scale);
        nodes[source].velocity += force;
        nodes[target].velocity -= force;
    }
}

pub(super) fn apply_centering<const D: usize>(
    nodes: &mut [SimNode<D>],
    strength: f32,
    time_scale: f32,
) {
    for node in nodes {
        let pull = node.position * (-strength * time_scale);
        node.velocity += pull;
    }
}

/// Moves unpinned nodes by their velocity, then damps every velocity.
pub(super) fn integrate<const D: usize>(nodes: &mut [SimNode<D>], damping: f32, time_scale: f32) {
    let damping_factor = damping.powf(time_scale);
    for node in nodes {
        if !node.is_pinned {
            node.position += node.velocity * time_scale;
        }
        node.velocity *= damping_factor;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    use super::*;

    fn node(x: f32, y: f32) -> SimNode<2> {
        SimNode::at(0, Vector2::new(x, y))
    }

    #[test]
    fn repulsion_is_equal_and_opposite() {
        let mut nodes = vec![node(1.0, 0.0), node(-1.0, 0.0)];
        apply_repulsion(&mut nodes, 0.1, 0.1, 1.0);

        let expected = 0.1 / (2.1 * 2.1);
        assert_relative_eq!(nodes[0].velocity.x, expected, epsilon = 1e-7);
        assert_relative_eq!(nodes[1].velocity.x, -expected, epsilon = 1e-7);
        assert_relative_eq!(nodes[0].velocity.y, 0.0);
    }

    #[test]
    fn coincident_nodes_still_separate() {
        let mut nodes = vec![node(0.0, 0.0), node(0.0, 0.0)];
        apply_repulsion(&mut nodes, 0.1, 0.1, 1.0);

        assert!(nodes[0].velocity.norm() > 0.0);
        assert!(nodes[0].velocity.iter().all(|component| component.is_finite()));
        assert_relative_eq!((nodes[0].velocity + nodes[1].velocity).norm(), 0.0);
    }

    #[test]
    fn attraction_pulls_endpoints_together() {
        let mut nodes = vec![node(0.0, 0.0), node(10.0, 0.0)];
        apply_attraction(&mut nodes, &[(0, 1)], 0.002, 1.0);

        assert_relative_eq!(nodes[0].velocity.x, 0.02, epsilon = 1e-6);
        assert_relative_eq!(nodes[1].velocity.x, -0.02, epsilon = 1e-6);
    }

    #[test]
    fn attraction_ignores_invalid_edges() {
        let mut nodes = vec![node(0.0, 0.0), node(10.0, 0.0)];
        apply_attraction(&mut nodes, &[(0, 0), (0, 7)], 0.002, 1.0);
        assert!(nodes.iter().all(|node| node.velocity.norm() == 0.0));
    }

    #[test]
    fn pinned_nodes_keep_position_but_damp() {
        let mut nodes = vec![node(3.0, 4.0)];
        nodes[0].is_pinned = true;
        nodes[0].velocity = Vector2::new(1.0, 1.0);
        integrate(&mut nodes, 0.5, 1.0);

        assert_eq!(nodes[0].position, Vector2::new(3.0, 4.0));
        assert_relative_eq!(nodes[0].velocity.x, 0.5);
    }

    #[test]
    fn centering_points_at_origin() {
        let mut nodes = vec![node(100.0, -50.0)];
        apply_centering(&mut nodes, 0.001, 1.0);
        assert_relative_eq!(nodes[0].velocity.x, -0.1, epsilon = 1e-6);
        assert_relative_eq!(nodes[0].velocity.y, 0.05, epsilon = 1e-6);
    }
}
