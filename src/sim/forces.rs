use eframe::egui::{Vec2, vec2};

use super::LayoutNode;

pub(super) const MIN_DISTANCE: f32 = 1e-6;
pub const COLLIDE_MARGIN: f32 = 2.0;

/// Direction from `to` toward `from`, with a deterministic fallback when the
/// points coincide so coincident nodes still separate.
fn separation_direction(delta: Vec2, distance: f32, from: usize, to: usize) -> Vec2 {
    if distance > MIN_DISTANCE {
        delta / distance
    } else {
        let angle =
            ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    }
}

/// Hooke-like pull of each edge toward the configured rest length.
pub(super) fn accumulate_link_force(
    nodes: &mut [LayoutNode],
    edges: &[(usize, usize)],
    link_distance: f32,
    link_strength: f32,
    alpha: f32,
) {
    for &(source, target) in edges {
        let delta = nodes[source].position - nodes[target].position;
        let distance = delta.length().max(MIN_DISTANCE);
        let direction = separation_direction(delta, distance, source, target);

        let correction = (distance - link_distance) * link_strength * alpha;
        nodes[source].velocity -= direction * correction;
        nodes[target].velocity += direction * correction;
    }
}

/// Pairwise inverse-square repulsion; negative strength pushes nodes apart.
/// Direct evaluation: the currency graphs here stay well under a hundred
/// nodes, so no spatial partitioning is warranted.
pub(super) fn accumulate_charge_force(nodes: &mut [LayoutNode], charge_strength: f32, alpha: f32) {
    for from in 0..nodes.len() {
        for to in (from + 1)..nodes.len() {
            let delta = nodes[from].position - nodes[to].position;
            let distance_sq = delta.length_sq().max(MIN_DISTANCE * MIN_DISTANCE);
            let direction = separation_direction(delta, distance_sq.sqrt(), from, to);

            let push = direction * (-charge_strength * alpha / distance_sq);
            nodes[from].velocity += push;
            nodes[to].velocity -= push;
        }
    }
}

/// Pulls the centroid of the whole node set toward `center`.
pub(super) fn accumulate_center_force(
    nodes: &mut [LayoutNode],
    center: Vec2,
    center_strength: f32,
    alpha: f32,
) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.position;
    }
    centroid /= nodes.len() as f32;

    let correction = (center - centroid) * center_strength * alpha;
    for node in nodes.iter_mut() {
        node.velocity += correction;
    }
}

/// Separates overlapping circles proportionally to penetration depth. Applied
/// to positions directly so overlaps do not survive energy decay. A pinned
/// node never moves; its partner absorbs the full separation.
pub(super) fn resolve_collisions(nodes: &mut [LayoutNode]) {
    for from in 0..nodes.len() {
        for to in (from + 1)..nodes.len() {
            let min_distance =
                nodes[from].radius + nodes[to].radius + (COLLIDE_MARGIN * 2.0);
            let delta = nodes[from].position - nodes[to].position;
            let distance = delta.length();
            if distance >= min_distance {
                continue;
            }

            let direction = separation_direction(delta, distance, from, to);
            let penetration = min_distance - distance;

            match (nodes[from].pin.is_some(), nodes[to].pin.is_some()) {
                (true, true) => {}
                (true, false) => nodes[to].position -= direction * penetration,
                (false, true) => nodes[from].position += direction * penetration,
                (false, false) => {
                    nodes[from].position += direction * (penetration * 0.5);
                    nodes[to].position -= direction * (penetration * 0.5);
                }
            }
        }
    }
}
