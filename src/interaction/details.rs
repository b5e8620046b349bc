use crate::graph::{NodeKind, RelationKind};
use crate::physics::Simulation;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub relation: RelationKind,
    pub outgoing: bool,
    pub id: String,
    pub name: String,
}

/// Read-only view of one node for the inspect panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDetails {
    pub id: String,
    pub title: String,
    pub kind: NodeKind,
    pub rows: Vec<DetailRow>,
    pub connections: Vec<Connection>,
}

const NOT_AVAILABLE: &str = "N/A";

fn detail_fields(kind: NodeKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        NodeKind::Person => &[
            ("position", "Position"),
            ("email", "Email"),
            ("linkedin", "LinkedIn"),
        ],
        NodeKind::Organization => &[
            ("industry", "Industry"),
            ("website", "Website"),
            ("address", "Address"),
            ("linkedin", "LinkedIn"),
        ],
        NodeKind::Event => &[
            ("date", "Date"),
            ("time", "Time"),
            ("location", "Location"),
            ("type", "Type"),
            ("audience", "Audience"),
            ("keywords", "Keywords"),
            ("description", "Description"),
        ],
    }
}

impl NodeDetails {
    pub fn for_node(simulation: &Simulation, index: usize) -> Option<Self> {
        let node = simulation.node(index)?;

        let mut rows = detail_fields(node.kind)
            .iter()
            .map(|&(key, label)| DetailRow {
                label,
                value: node.attribute(key).unwrap_or(NOT_AVAILABLE).to_owned(),
            })
            .collect::<Vec<_>>();

        let mut connections = Vec::new();
        for link in simulation.links() {
            let (other, outgoing) = if link.source == index {
                (link.target, true)
            } else if link.target == index {
                (link.source, false)
            } else {
                continue;
            };
            let Some(other_node) = simulation.node(other) else {
                continue;
            };
            connections.push(Connection {
                relation: link.relation,
                outgoing,
                id: other_node.id.clone(),
                name: other_node.display_name.clone(),
            });
        }
        connections.sort_by(|a, b| {
            a.relation
                .cmp(&b.relation)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        if node.kind == NodeKind::Person {
            let employers = connections
                .iter()
                .filter(|connection| connection.relation == RelationKind::WorksAt && connection.outgoing)
                .map(|connection| connection.name.as_str())
                .collect::<Vec<_>>();
            let value = if employers.is_empty() {
                NOT_AVAILABLE.to_owned()
            } else {
                employers.join(", ")
            };
            rows.insert(
                1,
                DetailRow {
                    label: "Organization",
                    value,
                },
            );
        }

        Some(Self {
            id: node.id.clone(),
            title: node.display_name.clone(),
            kind: node.kind,
            rows,
            connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::entities::{EntityCollections, Organization, Person, RecordId};
    use crate::graph::build_graph;
    use crate::physics::ManualScheduler;

    #[test]
    fn test_person_details_resolve_organization_name() {
        let entities = EntityCollections {
            people: vec![Person {
                id: Some(RecordId::from("p1")),
                name: Some("John Smith".to_owned()),
                position: Some("CEO".to_owned()),
                organization: Some(RecordId::from("c1")),
                ..Default::default()
            }],
            organizations: vec![Organization {
                id: Some(RecordId::from("c1")),
                name: Some("Acme".to_owned()),
                ..Default::default()
            }],
            events: Vec::new(),
        };
        let graph = build_graph(&entities).graph;
        let simulation = Simulation::start(
            graph.nodes,
            graph.edges,
            vec2(400.0, 400.0),
            SimulationConfig::default(),
            ManualScheduler::default(),
        );

        let details = NodeDetails::for_node(&simulation, 0).unwrap();

        assert_eq!(details.title, "John Smith");
        assert_eq!(details.kind, NodeKind::Person);
        assert_eq!(
            details.rows[..3],
            [
                DetailRow {
                    label: "Position",
                    value: "CEO".to_owned()
                },
                DetailRow {
                    label: "Organization",
                    value: "Acme".to_owned()
                },
                DetailRow {
                    label: "Email",
                    value: "N/A".to_owned()
                },
            ]
        );
        assert_eq!(details.connections.len(), 1);
        assert!(details.connections[0].outgoing);

        let organization = NodeDetails::for_node(&simulation, 1).unwrap();
        assert_eq!(organization.connections[0].name, "John Smith");
        assert!(!organization.connections[0].outgoing);
        assert!(NodeDetails::for_node(&simulation, 9).is_none());
    }
}
