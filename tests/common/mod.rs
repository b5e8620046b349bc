#![allow(dead_code)]

use eframe::egui::{Vec2, vec2};

use investor_network::config::SimulationConfig;
use investor_network::entities::{Organization, Person, RecordId};
use investor_network::graph::{Graph, Node, NodeKind};
use investor_network::physics::{ManualScheduler, Simulation};

pub const SURFACE: Vec2 = vec2(800.0, 600.0);

pub fn person(id: &str, name: &str, organization: Option<&str>) -> Person {
    Person {
        id: Some(RecordId::from(id)),
        name: Some(name.to_owned()),
        organization: organization.map(RecordId::from),
        ..Default::default()
    }
}

pub fn organization(id: &str, name: &str) -> Organization {
    Organization {
        id: Some(RecordId::from(id)),
        name: Some(name.to_owned()),
        ..Default::default()
    }
}

pub fn loose_people(count: usize) -> Vec<Node> {
    (0..count)
        .map(|index| {
            Node::new(
                NodeKind::Person.node_id(&index.to_string()),
                NodeKind::Person,
                format!("Person {index}"),
            )
        })
        .collect()
}

pub fn start(graph: Graph) -> (Simulation, ManualScheduler) {
    let scheduler = ManualScheduler::default();
    let simulation = Simulation::start(
        graph.nodes,
        graph.edges,
        SURFACE,
        SimulationConfig::default(),
        scheduler.clone(),
    );
    (simulation, scheduler)
}

/// Drives scheduled ticks until the simulation stops asking for more.
pub fn run(simulation: &mut Simulation, limit: usize) -> usize {
    let mut ticks = 0;
    while ticks < limit && simulation.on_frame() {
        ticks += 1;
    }
    ticks
}
