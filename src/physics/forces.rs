use eframe::egui::Vec2;

use crate::config::SimulationConfig;
use crate::graph::Node;
use crate::util::separation_direction;

use super::Link;
use super::quadtree::{Charge, QuadTree};

const COINCIDENT_DISTANCE_SQ: f32 = 1e-12;

/// Spring toward `link_distance`, split between the endpoints by degree so
/// that well-connected nodes move less.
pub(super) fn apply_links(
    nodes: &mut [Node],
    links: &[Link],
    degrees: &[usize],
    config: &SimulationConfig,
    alpha: f32,
) {
    let node_count = nodes.len();
    for link in links {
        let (source, target) = (link.source, link.target);
        if source >= node_count || target >= node_count || source == target {
            continue;
        }

        let mut delta = (nodes[target].position + nodes[target].velocity)
            - (nodes[source].position + nodes[source].velocity);
        if delta.length_sq() <= COINCIDENT_DISTANCE_SQ {
            delta = separation_direction(source, target) * 1e-3;
        }
        let distance = delta.length();

        let source_degree = degrees[source].max(1);
        let target_degree = degrees[target].max(1);
        let stiffness = config.link_stiffness / source_degree.min(target_degree) as f32;
        let bias = source_degree as f32 / (source_degree + target_degree) as f32;

        let correction = delta * ((distance - config.link_distance) / distance * alpha * stiffness);
        nodes[target].velocity -= correction * bias;
        nodes[source].velocity += correction * (1.0 - bias);
    }
}

pub(super) fn apply_many_body(
    nodes: &mut [Node],
    positions: &mut Vec<Vec2>,
    config: &SimulationConfig,
    alpha: f32,
) {
    positions.clear();
    positions.extend(nodes.iter().map(|node| node.position));

    let Some(tree) = QuadTree::build(positions) else {
        return;
    };

    let charge = Charge {
        strength: config.charge_strength * alpha,
        distance_min_sq: config.distance_min * config.distance_min,
        theta_sq: config.theta * config.theta,
    };
    for (index, node) in nodes.iter_mut().enumerate() {
        if !node.is_pinned() {
            node.velocity += tree.repulsion(index, positions, &charge);
        }
    }
}

/// Shifts free nodes so the centroid of the whole set moves toward `center`.
pub(super) fn apply_centering(nodes: &mut [Node], center: Vec2, strength: f32) {
    if nodes.is_empty() || strength <= 0.0 {
        return;
    }

    let centroid = nodes
        .iter()
        .fold(Vec2::ZERO, |sum, node| sum + node.position)
        / nodes.len() as f32;
    let shift = (center - centroid) * strength;
    for node in nodes.iter_mut().filter(|node| !node.is_pinned()) {
        node.position += shift;
    }
}
