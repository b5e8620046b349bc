mod build;

use std::collections::BTreeMap;
use std::fmt;

use eframe::egui::Vec2;

pub use build::{BuildOutput, BuildWarning, build_graph};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Person,
    Organization,
    Event,
}

impl NodeKind {
    pub const ALL: [Self; 3] = [Self::Person, Self::Organization, Self::Event];

    pub fn label(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Event => "event",
        }
    }

    /// Namespaced node id, so `person-1` and `event-1` never collide.
    pub fn node_id(self, key: &str) -> String {
        format!("{}-{key}", self.label())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    WorksAt,
    Involves,
    Attends,
    KeyContact,
}

impl RelationKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::WorksAt => "works_at",
            Self::Involves => "involves",
            Self::Attends => "attends",
            Self::KeyContact => "key_contact",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub display_name: String,
    pub attributes: BTreeMap<String, String>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pin: Option<Vec2>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            display_name: display_name.into(),
            attributes: BTreeMap::new(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relation: RelationKind,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, relation: RelationKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }
}
