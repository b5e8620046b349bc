use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;

use crate::entities::{EntityCollections, Event, Organization, Person, RecordId};

use super::{Edge, Graph, Node, NodeKind, RelationKind};

/// Recoverable data problem found while building the graph. The offending
/// node or edge is dropped and the build carries on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildWarning {
    #[error("{kind} record #{position} has no usable id and was skipped")]
    MissingId { kind: NodeKind, position: usize },
    #[error("{kind} record #{position} repeats id {id:?} and was skipped")]
    DuplicateId {
        kind: NodeKind,
        position: usize,
        id: String,
    },
    #[error("{from} has a {relation} reference to {reference:?} that matches no {expected}")]
    UnresolvedReference {
        from: String,
        relation: RelationKind,
        reference: String,
        expected: NodeKind,
    },
}

#[derive(Clone, Debug, Default)]
pub struct BuildOutput {
    pub graph: Graph,
    pub warnings: Vec<BuildWarning>,
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<Node>,
    node_ids: HashSet<String>,
    edges: Vec<Edge>,
    edge_set: HashSet<Edge>,
    warnings: Vec<BuildWarning>,
}

impl GraphBuilder {
    fn add_node(
        &mut self,
        kind: NodeKind,
        position: usize,
        id: Option<&RecordId>,
        name: Option<&str>,
        attributes: BTreeMap<String, String>,
    ) -> Option<String> {
        let Some(key) = id.and_then(RecordId::key) else {
            self.warn(BuildWarning::MissingId { kind, position });
            return None;
        };

        let node_id = kind.node_id(&key);
        if self.node_ids.contains(&node_id) {
            self.warn(BuildWarning::DuplicateId {
                kind,
                position,
                id: key,
            });
            return None;
        }

        let display_name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .unwrap_or(key);

        let mut node = Node::new(node_id.clone(), kind, display_name);
        node.attributes = attributes;
        self.node_ids.insert(node_id.clone());
        self.nodes.push(node);
        Some(node_id)
    }

    fn resolve(&self, kind: NodeKind, reference: &RecordId) -> Option<String> {
        let node_id = kind.node_id(&reference.key()?);
        self.node_ids.contains(&node_id).then_some(node_id)
    }

    fn add_edge(&mut self, source: &str, target: &str, relation: RelationKind) {
        if source == target {
            return;
        }
        let edge = Edge::new(source, target, relation);
        if self.edge_set.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }

    fn unresolved(
        &mut self,
        from: &str,
        relation: RelationKind,
        reference: &RecordId,
        expected: NodeKind,
    ) {
        self.warn(BuildWarning::UnresolvedReference {
            from: from.to_owned(),
            relation,
            reference: reference.to_string(),
            expected,
        });
    }

    /// Resolves a listed reference, warning when it points nowhere. Blank
    /// references count as absent and resolve silently to nothing.
    fn reference(
        &mut self,
        from: &str,
        relation: RelationKind,
        reference: &RecordId,
        expected: NodeKind,
    ) -> Option<String> {
        if reference.is_blank() {
            return None;
        }
        let target = self.resolve(expected, reference);
        if target.is_none() {
            self.unresolved(from, relation, reference, expected);
        }
        target
    }

    fn warn(&mut self, warning: BuildWarning) {
        tracing::warn!(%warning, "graph build");
        self.warnings.push(warning);
    }

    fn finish(self) -> BuildOutput {
        tracing::info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            warnings = self.warnings.len(),
            "built relationship graph"
        );
        BuildOutput {
            graph: Graph {
                nodes: self.nodes,
                edges: self.edges,
            },
            warnings: self.warnings,
        }
    }
}

fn insert_attribute(attributes: &mut BTreeMap<String, String>, key: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
        attributes.insert(key.to_owned(), value.to_owned());
    }
}

fn person_attributes(person: &Person) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    insert_attribute(&mut attributes, "position", person.position.as_deref());
    insert_attribute(&mut attributes, "email", person.email.as_deref());
    insert_attribute(&mut attributes, "linkedin", person.linkedin.as_deref());
    attributes
}

fn organization_attributes(organization: &Organization) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    insert_attribute(&mut attributes, "industry", organization.industry.as_deref());
    insert_attribute(&mut attributes, "website", organization.website.as_deref());
    insert_attribute(
        &mut attributes,
        "address",
        organization.physical_address.as_deref(),
    );
    insert_attribute(
        &mut attributes,
        "linkedin",
        organization.linkedin_page.as_deref(),
    );
    attributes
}

fn event_attributes(event: &Event) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    insert_attribute(&mut attributes, "date", event.date.as_deref());
    insert_attribute(&mut attributes, "time", event.time.as_deref());
    insert_attribute(&mut attributes, "location", event.location.as_deref());
    insert_attribute(&mut attributes, "type", event.event_type.as_deref());
    insert_attribute(&mut attributes, "description", event.description.as_deref());
    insert_attribute(
        &mut attributes,
        "audience",
        event.target_audience.as_deref(),
    );
    if !event.keywords.is_empty() {
        attributes.insert("keywords".to_owned(), event.keywords.join(", "));
    }
    attributes
}

/// Builds the relationship graph. Records without an id, repeated ids and
/// references that resolve to nothing are dropped and reported as warnings;
/// every returned edge has both endpoints in the returned node set.
pub fn build_graph(entities: &EntityCollections) -> BuildOutput {
    let mut builder = GraphBuilder::default();

    let people = entities
        .people
        .iter()
        .enumerate()
        .map(|(position, person)| {
            builder.add_node(
                NodeKind::Person,
                position,
                person.id.as_ref(),
                person.name.as_deref(),
                person_attributes(person),
            )
        })
        .collect::<Vec<_>>();

    let organizations = entities
        .organizations
        .iter()
        .enumerate()
        .map(|(position, organization)| {
            builder.add_node(
                NodeKind::Organization,
                position,
                organization.id.as_ref(),
                organization.name.as_deref(),
                organization_attributes(organization),
            )
        })
        .collect::<Vec<_>>();

    let events = entities
        .events
        .iter()
        .enumerate()
        .map(|(position, event)| {
            builder.add_node(
                NodeKind::Event,
                position,
                event.id.as_ref(),
                event.name.as_deref(),
                event_attributes(event),
            )
        })
        .collect::<Vec<_>>();

    let mut organization_by_name: HashMap<&str, String> = HashMap::new();
    for (organization, node_id) in entities.organizations.iter().zip(&organizations) {
        if let (Some(name), Some(node_id)) = (organization.name.as_deref(), node_id) {
            let name = name.trim();
            if !name.is_empty() {
                organization_by_name
                    .entry(name)
                    .or_insert_with(|| node_id.clone());
            }
        }
    }

    for (person, node_id) in entities.people.iter().zip(&people) {
        let (Some(node_id), Some(reference)) = (node_id, person.organization.as_ref()) else {
            continue;
        };
        if reference.is_blank() {
            continue;
        }
        let target = builder.resolve(NodeKind::Organization, reference).or_else(|| {
            reference
                .as_text()
                .and_then(|name| organization_by_name.get(name).cloned())
        });
        match target {
            Some(target) => builder.add_edge(node_id, &target, RelationKind::WorksAt),
            None => builder.unresolved(
                node_id,
                RelationKind::WorksAt,
                reference,
                NodeKind::Organization,
            ),
        }
    }

    for (organization, node_id) in entities.organizations.iter().zip(&organizations) {
        let Some(node_id) = node_id else {
            continue;
        };
        for reference in &organization.key_contacts {
            if let Some(person) =
                builder.reference(node_id, RelationKind::KeyContact, reference, NodeKind::Person)
            {
                builder.add_edge(node_id, &person, RelationKind::KeyContact);
            }
        }
        // Same direction as an event's own organization list, so a pairing
        // listed on both sides yields one edge.
        for reference in &organization.recent_events {
            if let Some(event) =
                builder.reference(node_id, RelationKind::Involves, reference, NodeKind::Event)
            {
                builder.add_edge(&event, node_id, RelationKind::Involves);
            }
        }
    }

    for (event, node_id) in entities.events.iter().zip(&events) {
        let Some(node_id) = node_id else {
            continue;
        };
        for reference in &event.organizations {
            if let Some(organization) = builder.reference(
                node_id,
                RelationKind::Involves,
                reference,
                NodeKind::Organization,
            ) {
                builder.add_edge(node_id, &organization, RelationKind::Involves);
            }
        }
        for reference in &event.attendees {
            if let Some(person) =
                builder.reference(node_id, RelationKind::Attends, reference, NodeKind::Person)
            {
                builder.add_edge(&person, node_id, RelationKind::Attends);
            }
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, name: &str, organization: Option<&str>) -> Person {
        Person {
            id: Some(RecordId::from(id)),
            name: Some(name.to_owned()),
            organization: organization.map(RecordId::from),
            ..Default::default()
        }
    }

    fn organization(id: &str, name: &str) -> Organization {
        Organization {
            id: Some(RecordId::from(id)),
            name: Some(name.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_person_linked_to_organization_by_id() {
        let entities = EntityCollections {
            people: vec![person("1", "John Smith", Some("7"))],
            organizations: vec![organization("7", "Acme")],
            events: Vec::new(),
        };

        let output = build_graph(&entities);

        assert_eq!(output.graph.node_count(), 2);
        assert_eq!(
            output.graph.edges,
            vec![Edge::new(
                "person-1",
                "organization-7",
                RelationKind::WorksAt
            )]
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_person_linked_to_organization_by_name() {
        let entities = EntityCollections {
            people: vec![person("1", "Alex Chen", Some("Acme"))],
            organizations: vec![organization("comp1", "Acme")],
            events: Vec::new(),
        };

        let output = build_graph(&entities);

        assert_eq!(output.graph.edges[0].target, "organization-comp1");
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_unresolved_organization_is_dropped_with_warning() {
        let entities = EntityCollections {
            people: vec![person("1", "John Smith", Some("99"))],
            ..Default::default()
        };

        let output = build_graph(&entities);

        assert_eq!(output.graph.node_count(), 1);
        assert_eq!(output.graph.edge_count(), 0);
        assert_eq!(
            output.warnings,
            vec![BuildWarning::UnresolvedReference {
                from: "person-1".to_owned(),
                relation: RelationKind::WorksAt,
                reference: "99".to_owned(),
                expected: NodeKind::Organization,
            }]
        );
    }

    #[test]
    fn test_missing_and_duplicate_ids() {
        let entities = EntityCollections {
            people: vec![
                person("1", "First", None),
                Person {
                    id: Some(RecordId::from("  ")),
                    name: Some("Blank".to_owned()),
                    ..Default::default()
                },
                Person {
                    name: Some("No id".to_owned()),
                    ..Default::default()
                },
                person("1", "Again", None),
            ],
            ..Default::default()
        };

        let output = build_graph(&entities);

        assert_eq!(output.graph.node_count(), 1);
        assert_eq!(output.graph.nodes[0].display_name, "First");
        assert_eq!(
            output.warnings,
            vec![
                BuildWarning::MissingId {
                    kind: NodeKind::Person,
                    position: 1
                },
                BuildWarning::MissingId {
                    kind: NodeKind::Person,
                    position: 2
                },
                BuildWarning::DuplicateId {
                    kind: NodeKind::Person,
                    position: 3,
                    id: "1".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_ids_are_namespaced_by_kind() {
        let entities = EntityCollections {
            people: vec![person("1", "Person One", None)],
            organizations: vec![organization("1", "Org One")],
            events: vec![Event {
                id: Some(RecordId::from(1)),
                name: Some("Event One".to_owned()),
                ..Default::default()
            }],
        };

        let output = build_graph(&entities);

        let ids = output
            .graph
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["person-1", "organization-1", "event-1"]);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_event_references_and_edge_dedup() {
        let entities = EntityCollections {
            people: vec![person("p", "Pat", None)],
            organizations: vec![organization("o", "Org")],
            events: vec![Event {
                id: Some(RecordId::from("e")),
                name: Some("Summit".to_owned()),
                organizations: vec![RecordId::from("o"), RecordId::from("o"), RecordId::from("x")],
                attendees: vec![RecordId::from("p")],
                keywords: vec!["tech".to_owned(), "pitch".to_owned()],
                ..Default::default()
            }],
        };

        let output = build_graph(&entities);

        assert_eq!(
            output.graph.edges,
            vec![
                Edge::new("event-e", "organization-o", RelationKind::Involves),
                Edge::new("person-p", "event-e", RelationKind::Attends),
            ]
        );
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(
            output.graph.nodes[2].attribute("keywords"),
            Some("tech, pitch")
        );
    }

    #[test]
    fn test_display_name_falls_back_to_key() {
        let entities = EntityCollections {
            organizations: vec![Organization {
                id: Some(RecordId::from("acme")),
                name: Some("   ".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let output = build_graph(&entities);

        assert_eq!(output.graph.nodes[0].display_name, "acme");
    }

    #[test]
    fn test_organization_recent_events_link_once() {
        let mut company = organization("c1", "Acme");
        company.recent_events = vec![RecordId::from("e1"), RecordId::from("e9")];
        let entities = EntityCollections {
            organizations: vec![company],
            events: vec![Event {
                id: Some(RecordId::from("e1")),
                name: Some("Demo Day".to_owned()),
                organizations: vec![RecordId::from("c1")],
                ..Default::default()
            }],
            ..Default::default()
        };

        let output = build_graph(&entities);

        assert_eq!(
            output.graph.edges,
            vec![Edge::new(
                "event-e1",
                "organization-c1",
                RelationKind::Involves
            )]
        );
        assert_eq!(
            output.warnings,
            vec![BuildWarning::UnresolvedReference {
                from: "organization-c1".to_owned(),
                relation: RelationKind::Involves,
                reference: "e9".to_owned(),
                expected: NodeKind::Event,
            }]
        );
    }

    #[test]
    fn test_blank_references_are_absent() {
        let mut company = organization("c1", "Acme");
        company.key_contacts = vec![RecordId::from(""), RecordId::Other(serde_json::Value::Null)];
        company.recent_events = vec![RecordId::from("  ")];
        let entities = EntityCollections {
            people: vec![person("p1", "Pat", Some(""))],
            organizations: vec![company],
            events: vec![Event {
                id: Some(RecordId::from("e1")),
                organizations: vec![RecordId::from(" ")],
                attendees: vec![RecordId::from("")],
                ..Default::default()
            }],
        };

        let output = build_graph(&entities);

        assert_eq!(output.graph.node_count(), 3);
        assert_eq!(output.graph.edge_count(), 0);
        assert!(output.warnings.is_empty(), "{:?}", output.warnings);
    }

    #[test]
    fn test_unusual_ids_and_references_are_reported() {
        let raw = r#"{
            "people": [
                { "id": "p1", "name": "Good", "company": { "x": 1 } },
                { "id": 1.5, "name": "Float id" }
            ]
        }"#;
        let entities = crate::entities::parse_entities(raw).unwrap();

        let output = build_graph(&entities);

        assert_eq!(output.graph.node_count(), 1);
        assert_eq!(
            output.warnings,
            vec![
                BuildWarning::MissingId {
                    kind: NodeKind::Person,
                    position: 1
                },
                BuildWarning::UnresolvedReference {
                    from: "person-p1".to_owned(),
                    relation: RelationKind::WorksAt,
                    reference: r#"{"x":1}"#.to_owned(),
                    expected: NodeKind::Organization,
                },
            ]
        );
    }
}
