//! Force-directed layout: link springs, many-body repulsion and centering,
//! cooled by a geometrically decaying `alpha`.

mod forces;
mod quadtree;
mod scheduler;

use std::collections::HashMap;

use eframe::egui::Vec2;

use crate::config::SimulationConfig;
use crate::graph::{Edge, Node, RelationKind};
use crate::util::phyllotaxis;

pub use scheduler::{ManualScheduler, TickScheduler};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
    Idle,
    Running,
    Settled,
    /// Terminal: the handle no longer ticks or accepts changes.
    Stopped,
}

/// An edge resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub relation: RelationKind,
}

pub struct TickEvent<'a> {
    pub tick: u64,
    pub alpha: f32,
    pub nodes: &'a [Node],
}

type TickCallback = Box<dyn FnMut(&TickEvent<'_>)>;

pub struct Simulation {
    nodes: Vec<Node>,
    links: Vec<Link>,
    degrees: Vec<usize>,
    index_by_id: HashMap<String, usize>,
    config: SimulationConfig,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    state: SimulationState,
    tick_count: u64,
    tick_pending: bool,
    scheduler: Box<dyn TickScheduler>,
    on_tick: Option<TickCallback>,
    scratch_positions: Vec<Vec2>,
}

impl Simulation {
    /// Takes ownership of the node and edge arrays and starts ticking. Edges
    /// whose endpoints are not in `nodes` are ignored.
    pub fn start(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        viewport_size: Vec2,
        config: SimulationConfig,
        scheduler: impl TickScheduler + 'static,
    ) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let mut links = Vec::with_capacity(edges.len());
        let mut degrees = vec![0usize; nodes.len()];
        for edge in &edges {
            let (Some(&source), Some(&target)) =
                (index_by_id.get(&edge.source), index_by_id.get(&edge.target))
            else {
                tracing::debug!(
                    source = %edge.source,
                    target = %edge.target,
                    "ignoring edge with unknown endpoint"
                );
                continue;
            };
            if source == target {
                continue;
            }
            degrees[source] += 1;
            degrees[target] += 1;
            links.push(Link {
                source,
                target,
                relation: edge.relation,
            });
        }

        let mut simulation = Self {
            nodes,
            links,
            degrees,
            index_by_id,
            config,
            center: viewport_size * 0.5,
            alpha: 1.0,
            alpha_target: 0.0,
            state: SimulationState::Idle,
            tick_count: 0,
            tick_pending: false,
            scheduler: Box::new(scheduler),
            on_tick: None,
            scratch_positions: Vec::new(),
        };
        simulation.place_initial();

        tracing::info!(
            nodes = simulation.nodes.len(),
            links = simulation.links.len(),
            "starting simulation"
        );

        if simulation.nodes.is_empty() {
            simulation.state = SimulationState::Settled;
        } else {
            simulation.state = SimulationState::Running;
            simulation.request_tick();
        }
        simulation
    }

    fn place_initial(&mut self) {
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.velocity = Vec2::ZERO;
            node.position = match node.pin {
                Some(pin) => pin,
                None => self.center + phyllotaxis(index),
            };
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn on_tick(&mut self, callback: impl FnMut(&TickEvent<'_>) + 'static) {
        if self.state == SimulationState::Stopped {
            return;
        }
        self.on_tick = Some(Box::new(callback));
    }

    /// Runs the tick requested from the scheduler, if any. Returns whether a
    /// tick happened.
    pub fn on_frame(&mut self) -> bool {
        if self.state != SimulationState::Running || !self.tick_pending {
            return false;
        }

        self.tick_pending = false;
        self.tick();
        if self.state == SimulationState::Running {
            self.request_tick();
        }
        true
    }

    fn request_tick(&mut self) {
        if !self.tick_pending {
            self.tick_pending = true;
            self.scheduler.request_tick();
        }
    }

    fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        forces::apply_links(
            &mut self.nodes,
            &self.links,
            &self.degrees,
            &self.config,
            self.alpha,
        );
        forces::apply_many_body(
            &mut self.nodes,
            &mut self.scratch_positions,
            &self.config,
            self.alpha,
        );
        forces::apply_centering(&mut self.nodes, self.center, self.config.center_strength);

        let retained = 1.0 - self.config.velocity_decay;
        for node in &mut self.nodes {
            match node.pin {
                Some(pin) => {
                    node.position = pin;
                    node.velocity = Vec2::ZERO;
                }
                None => {
                    node.velocity *= retained;
                    node.position += node.velocity;
                }
            }
        }

        self.tick_count += 1;
        if let Some(callback) = self.on_tick.as_mut() {
            callback(&TickEvent {
                tick: self.tick_count,
                alpha: self.alpha,
                nodes: &self.nodes,
            });
        }

        if self.alpha < self.config.alpha_min {
            self.state = SimulationState::Settled;
            tracing::debug!(ticks = self.tick_count, "simulation settled");
        }
    }

    /// Sets `alpha` and resumes ticking if it is above the settle threshold.
    pub fn reheat(&mut self, alpha: f32) {
        if self.state == SimulationState::Stopped || self.nodes.is_empty() {
            return;
        }

        self.alpha = alpha.clamp(0.0, 1.0);
        if self.alpha >= self.config.alpha_min {
            self.state = SimulationState::Running;
            self.request_tick();
        }
    }

    /// Level that `alpha` relaxes toward. Nonzero while a node is dragged so
    /// the layout keeps reacting.
    pub fn set_alpha_target(&mut self, target: f32) {
        if self.state == SimulationState::Stopped {
            return;
        }
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn set_forces(&mut self, link_distance: f32, charge_strength: f32) {
        if self.state == SimulationState::Stopped {
            return;
        }
        self.config.link_distance = link_distance.max(0.0);
        self.config.charge_strength = charge_strength;
        self.reheat(1.0);
    }

    pub fn resize(&mut self, viewport_size: Vec2) {
        if self.state == SimulationState::Stopped {
            return;
        }
        self.center = viewport_size * 0.5;
    }

    /// Holds node `index` at `position` until [`Simulation::unpin`].
    pub fn pin(&mut self, index: usize, position: Vec2) -> bool {
        if self.state == SimulationState::Stopped {
            return false;
        }
        let Some(node) = self.nodes.get_mut(index) else {
            tracing::debug!(index, "pin of unknown node ignored");
            return false;
        };
        node.pin = Some(position);
        node.position = position;
        node.velocity = Vec2::ZERO;
        true
    }

    pub fn unpin(&mut self, index: usize) -> bool {
        if self.state == SimulationState::Stopped {
            return false;
        }
        match self.nodes.get_mut(index) {
            Some(node) => node.pin.take().is_some(),
            None => false,
        }
    }

    /// Terminal. No tick callback fires after this returns.
    pub fn stop(&mut self) {
        if self.state == SimulationState::Stopped {
            return;
        }
        self.state = SimulationState::Stopped;
        self.tick_pending = false;
        self.on_tick = None;
        self.scheduler.cancel();
        tracing::debug!(ticks = self.tick_count, "simulation stopped");
    }
}
