//! Projects simulation state through the viewport transform onto a drawing
//! surface. Holds no state of its own.

use std::collections::HashSet;

use eframe::egui::{Color32, Pos2, Rect, Stroke, Vec2, vec2};

use crate::graph::NodeKind;
use crate::physics::Simulation;
use crate::util::truncate_label;
use crate::viewport::Transform;

/// Node radius in world units.
pub const NODE_RADIUS: f32 = 10.0;
/// Circles never shrink below this many surface pixels.
const MIN_DRAWN_RADIUS: f32 = 2.0;

/// #999 at 60% opacity.
const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(92, 92, 92, 153);
const OUTLINE_COLOR: Color32 = Color32::WHITE;
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const LABEL_COLOR: Color32 = Color32::from_gray(238);
const LABEL_MAX_CHARS: usize = 28;

/// Radius a node is drawn with at `scale`, in surface pixels.
pub fn drawn_radius(scale: f32) -> f32 {
    (NODE_RADIUS * scale).max(MIN_DRAWN_RADIUS)
}

/// [`drawn_radius`] mapped back to world units, for hit testing.
pub fn hit_radius(scale: f32) -> f32 {
    if scale > 0.0 {
        drawn_radius(scale) / scale
    } else {
        NODE_RADIUS
    }
}

/// Drawing target, in surface coordinates with the origin at the top left.
pub trait Surface {
    fn size(&self) -> Vec2;
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke);
    fn label(&mut self, at: Pos2, text: &str, color: Color32);
}

pub fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Person => Color32::from_rgb(0x4C, 0xAF, 0x50),
        NodeKind::Organization => Color32::from_rgb(0x21, 0x96, 0xF3),
        NodeKind::Event => Color32::from_rgb(0xFF, 0xC1, 0x07),
    }
}

/// Node indices to emphasize in the next frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlights {
    pub selected: Option<usize>,
    pub hovered: Option<usize>,
    pub neighbors: HashSet<usize>,
    pub matches: HashSet<usize>,
}

impl Highlights {
    pub fn new(
        simulation: &Simulation,
        selected: Option<&str>,
        hovered: Option<usize>,
        matches: &[String],
    ) -> Self {
        let neighbors = hovered
            .map(|hovered| {
                simulation
                    .links()
                    .iter()
                    .filter_map(|link| {
                        if link.source == hovered {
                            Some(link.target)
                        } else if link.target == hovered {
                            Some(link.source)
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            selected: selected.and_then(|id| simulation.index_of(id)),
            hovered,
            neighbors,
            matches: matches.iter().filter_map(|id| simulation.index_of(id)).collect(),
        }
    }

    fn is_active(&self) -> bool {
        self.hovered.is_some() || !self.matches.is_empty()
    }

    fn emphasizes(&self, index: usize) -> bool {
        self.selected == Some(index)
            || self.hovered == Some(index)
            || self.neighbors.contains(&index)
            || self.matches.contains(&index)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub nodes: usize,
    pub edges: usize,
}

/// Draws edges, then nodes, then labels. Off-surface primitives are culled.
/// Without a surface nothing happens.
pub fn draw_frame(
    surface: Option<&mut dyn Surface>,
    simulation: &Simulation,
    transform: Transform,
    highlights: &Highlights,
) -> FrameStats {
    let Some(surface) = surface else {
        return FrameStats::default();
    };

    let bounds = Rect::from_min_size(Pos2::ZERO, surface.size());
    let nodes = simulation.nodes();
    let positions = nodes
        .iter()
        .map(|node| transform.to_surface(node.position))
        .collect::<Vec<_>>();
    let radius = drawn_radius(transform.scale);
    let zoom_sqrt = transform.scale.sqrt();
    let mut stats = FrameStats::default();

    let edge_width = (1.5 * zoom_sqrt).clamp(0.5, 3.0);
    for link in simulation.links() {
        let (Some(&start), Some(&end)) = (positions.get(link.source), positions.get(link.target))
        else {
            continue;
        };
        if !edge_visible(bounds, start, end, radius) {
            continue;
        }

        let touches_hovered =
            highlights.hovered == Some(link.source) || highlights.hovered == Some(link.target);
        let stroke = if touches_hovered {
            Stroke::new(edge_width * 1.8, blend_color(EDGE_COLOR, LABEL_COLOR, 0.6))
        } else if highlights.is_active() {
            Stroke::new(edge_width, dim_color(EDGE_COLOR, 0.5))
        } else {
            Stroke::new(edge_width, EDGE_COLOR)
        };
        surface.line(start, end, stroke);
        stats.edges += 1;
    }

    let mut labels = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        let position = positions[index];
        if !circle_visible(bounds, position, radius) {
            continue;
        }

        let base = kind_color(node.kind);
        let emphasized = highlights.emphasizes(index);
        let is_selected = highlights.selected == Some(index);
        let fill = if highlights.hovered == Some(index) {
            blend_color(base, Color32::WHITE, 0.3)
        } else if highlights.matches.contains(&index) {
            blend_color(base, MATCH_COLOR, 0.5)
        } else if highlights.is_active() && !emphasized {
            dim_color(base, 0.45)
        } else {
            base
        };
        let stroke = if is_selected {
            Stroke::new(3.0, SELECTED_COLOR)
        } else if highlights.matches.contains(&index) {
            Stroke::new(2.0, MATCH_COLOR)
        } else {
            Stroke::new(1.5, OUTLINE_COLOR)
        };

        surface.circle(position, radius, fill, stroke);
        stats.nodes += 1;

        if emphasized || transform.scale > 0.6 {
            labels.push((position + vec2(radius + 4.0, 0.0), index));
        }
    }

    for (at, index) in labels {
        let text = truncate_label(&nodes[index].display_name, LABEL_MAX_CHARS);
        surface.label(at, &text, LABEL_COLOR);
    }

    stats
}

pub(crate) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(crate) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    if a1.x.max(a2.x) < b1.x.min(b2.x)
        || b1.x.max(b2.x) < a1.x.min(a2.x)
        || a1.y.max(a2.y) < b1.y.min(b2.y)
        || b1.y.max(b2.y) < a1.y.min(a2.y)
    {
        return false;
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::graph::{Edge, Node, RelationKind};
    use crate::physics::ManualScheduler;

    #[derive(Default)]
    struct RecordingSurface {
        lines: Vec<(Pos2, Pos2)>,
        circles: Vec<(Pos2, Color32, Stroke)>,
        labels: Vec<String>,
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> Vec2 {
            vec2(400.0, 400.0)
        }

        fn line(&mut self, from: Pos2, to: Pos2, _stroke: Stroke) {
            self.lines.push((from, to));
        }

        fn circle(&mut self, center: Pos2, _radius: f32, fill: Color32, stroke: Stroke) {
            self.circles.push((center, fill, stroke));
        }

        fn label(&mut self, _at: Pos2, text: &str, _color: Color32) {
            self.labels.push(text.to_owned());
        }
    }

    fn simulation() -> Simulation {
        let nodes = vec![
            Node::new("person-1", NodeKind::Person, "John Smith"),
            Node::new("organization-1", NodeKind::Organization, "Acme"),
            Node::new("event-1", NodeKind::Event, "Summit"),
        ];
        let edges = vec![Edge::new("person-1", "organization-1", RelationKind::WorksAt)];
        Simulation::start(
            nodes,
            edges,
            vec2(400.0, 400.0),
            SimulationConfig::default(),
            ManualScheduler::default(),
        )
    }

    #[test]
    fn test_without_surface_draws_nothing() {
        let stats = draw_frame(None, &simulation(), Transform::IDENTITY, &Highlights::default());
        assert_eq!(stats, FrameStats::default());
    }

    #[test]
    fn test_draws_every_visible_primitive_at_transformed_positions() {
        let simulation = simulation();
        let mut surface = RecordingSurface::default();
        let transform = Transform::new(1.0, vec2(5.0, -5.0));

        let stats = draw_frame(Some(&mut surface), &simulation, transform, &Highlights::default());

        assert_eq!(stats, FrameStats { nodes: 3, edges: 1 });
        let expected = transform.to_surface(simulation.node(0).unwrap().position);
        assert_eq!(surface.circles[0].0, expected);
        assert_eq!(surface.circles[0].1, kind_color(NodeKind::Person));
        assert_eq!(surface.labels, vec!["John Smith", "Acme", "Summit"]);
    }

    #[test]
    fn test_off_surface_nodes_are_culled() {
        let simulation = simulation();
        let mut surface = RecordingSurface::default();
        let transform = Transform::new(1.0, vec2(5_000.0, 0.0));

        let stats = draw_frame(Some(&mut surface), &simulation, transform, &Highlights::default());

        assert_eq!(stats, FrameStats::default());
        assert!(surface.circles.is_empty());
    }

    #[test]
    fn test_selected_and_matched_nodes_are_emphasized() {
        let simulation = simulation();
        let mut surface = RecordingSurface::default();
        let highlights = Highlights::new(&simulation, Some("person-1"), None, &["event-1".to_owned()]);

        draw_frame(Some(&mut surface), &simulation, Transform::IDENTITY, &highlights);

        assert_eq!(surface.circles[0].2.color, SELECTED_COLOR);
        assert_eq!(surface.circles[2].2.color, MATCH_COLOR);
        assert_ne!(surface.circles[1].1, kind_color(NodeKind::Organization));
    }

    #[test]
    fn test_hover_collects_neighbors() {
        let simulation = simulation();
        let highlights = Highlights::new(&simulation, None, Some(1), &[]);
        assert!(highlights.neighbors.contains(&0));
        assert!(!highlights.neighbors.contains(&2));
    }

    #[test]
    fn test_hit_radius_matches_drawn_circle() {
        assert_eq!(drawn_radius(1.0), NODE_RADIUS);
        assert_eq!(hit_radius(1.0), NODE_RADIUS);
        assert_eq!(drawn_radius(0.1), 2.0);
        assert!((hit_radius(0.1) - 20.0).abs() < 1e-4);
        assert!((hit_radius(4.0) * 4.0 - drawn_radius(4.0)).abs() < 1e-4);
    }

    #[test]
    fn test_palette_is_distinct_per_kind() {
        let colors = NodeKind::ALL.map(kind_color);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn test_edge_crossing_surface_is_visible() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 0.0));
        assert!(!edge_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, 150.0), 0.0));
    }
}
