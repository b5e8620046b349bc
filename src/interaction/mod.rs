//! Pointer gestures, search and focus. Sits on top of the simulation and the
//! viewport and only mutates them through their public operations.

pub mod details;
pub mod search;

use eframe::egui::{Pos2, Vec2};

use crate::config::{InteractionConfig, ViewportConfig};
use crate::physics::Simulation;
use crate::render::hit_radius;
use crate::viewport::{Transform, Viewport};

pub use details::{Connection, DetailRow, NodeDetails};
pub use search::search_nodes;

#[derive(Clone, Copy, Debug, PartialEq)]
enum PointerMode {
    Idle,
    Dragging { node: usize, press: Pos2, moved: bool },
    Panning { press: Pos2, last: Pos2, moved: bool },
}

/// What a press and release without movement landed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Click {
    Node(String),
    Background,
}

#[derive(Clone, Debug)]
pub struct Interaction {
    config: InteractionConfig,
    mode: PointerMode,
    selected: Option<String>,
    hovered: Option<usize>,
}

impl Interaction {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            mode: PointerMode::Idle,
            selected: None,
            hovered: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected = id;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn dragged(&self) -> Option<usize> {
        match self.mode {
            PointerMode::Dragging { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.mode, PointerMode::Panning { .. })
    }

    /// Drops any gesture in flight, e.g. when the simulation is replaced.
    pub fn reset(&mut self) {
        self.mode = PointerMode::Idle;
        self.selected = None;
        self.hovered = None;
    }

    pub fn pointer_pressed(
        &mut self,
        pointer: Pos2,
        simulation: &mut Simulation,
        viewport: &Viewport,
    ) {
        let world = viewport.to_world(pointer);
        match hit_test(simulation, world, viewport.scale()) {
            Some(node) if simulation.pin(node, world) => {
                let drag_target = simulation.config().drag_alpha_target;
                simulation.set_alpha_target(drag_target);
                simulation.reheat(simulation.alpha().max(drag_target));
                self.mode = PointerMode::Dragging {
                    node,
                    press: pointer,
                    moved: false,
                };
            }
            _ => {
                self.mode = PointerMode::Panning {
                    press: pointer,
                    last: pointer,
                    moved: false,
                };
            }
        }
    }

    pub fn pointer_moved(
        &mut self,
        pointer: Pos2,
        simulation: &mut Simulation,
        viewport: &mut Viewport,
    ) {
        let tolerance = self.config.click_tolerance;
        match &mut self.mode {
            PointerMode::Idle => {
                self.hovered = hit_test(simulation, viewport.to_world(pointer), viewport.scale());
            }
            PointerMode::Dragging { node, press, moved } => {
                *moved |= press.distance(pointer) > tolerance;
                simulation.pin(*node, viewport.to_world(pointer));
            }
            PointerMode::Panning { press, last, moved } => {
                *moved |= press.distance(pointer) > tolerance;
                viewport.pan_by(pointer - *last);
                *last = pointer;
            }
        }
    }

    /// Ends the gesture. Releasing a dragged node unpins it where it is and
    /// lets the layout cool down from there.
    pub fn pointer_released(&mut self, simulation: &mut Simulation) -> Option<Click> {
        let mode = std::mem::replace(&mut self.mode, PointerMode::Idle);
        match mode {
            PointerMode::Idle => None,
            PointerMode::Dragging { node, moved, .. } => {
                simulation.unpin(node);
                simulation.set_alpha_target(0.0);
                if moved {
                    return None;
                }
                let id = simulation.node(node)?.id.clone();
                self.selected = Some(id.clone());
                Some(Click::Node(id))
            }
            PointerMode::Panning { moved, .. } => {
                if moved {
                    return None;
                }
                self.selected = None;
                Some(Click::Background)
            }
        }
    }

    /// `delta` follows the browser convention: positive scrolls away and
    /// zooms out.
    pub fn wheel(&self, pointer: Pos2, delta: f32, viewport: &mut Viewport) {
        if delta == 0.0 {
            return;
        }
        viewport.zoom_at(pointer, 2f32.powf(-delta * self.config.wheel_sensitivity));
    }

    pub fn hover(&mut self, pointer: Option<Pos2>, simulation: &Simulation, viewport: &Viewport) {
        self.hovered = pointer
            .and_then(|pointer| hit_test(simulation, viewport.to_world(pointer), viewport.scale()));
    }

    pub fn search(&self, query: &str, simulation: &Simulation) -> Vec<String> {
        search_nodes(simulation.nodes(), query, &self.config)
    }

    /// Eases back to the identity transform, which frames the layout around
    /// the simulation center, and reheats the layout fully.
    pub fn center_view(
        &self,
        simulation: &mut Simulation,
        viewport: &mut Viewport,
        viewport_config: &ViewportConfig,
    ) {
        viewport.animate_to(Transform::IDENTITY, viewport_config.focus_duration());
        simulation.reheat(1.0);
    }

    /// Centers `id` on the surface at the focus scale and selects it.
    /// Returns false for an unknown id.
    pub fn focus(
        &mut self,
        id: &str,
        simulation: &Simulation,
        viewport: &mut Viewport,
        surface_size: Vec2,
        viewport_config: &ViewportConfig,
    ) -> bool {
        let Some(node) = simulation.index_of(id).and_then(|index| simulation.node(index)) else {
            tracing::debug!(id, "focus of unknown node ignored");
            return false;
        };

        let (min_scale, max_scale) = viewport.scale_extent();
        let scale = viewport_config.focus_scale.clamp(min_scale, max_scale);
        let target = Transform::centered_on(node.position, surface_size, scale);
        viewport.animate_to(target, viewport_config.focus_duration());
        self.selected = Some(node.id.clone());
        true
    }
}

/// Nearest node whose circle, as drawn at `scale`, contains `world`.
pub fn hit_test(simulation: &Simulation, world: Vec2, scale: f32) -> Option<usize> {
    let radius = hit_radius(scale);
    simulation
        .nodes()
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let distance = (node.position - world).length();
            (distance <= radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
