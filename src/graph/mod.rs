//! Hub-and-spoke graph of one entity and its direct relations.
//!
//! The builder turns an entity's flat property rows into nodes and edges;
//! the classifier picks a node kind from the property label.

mod builder;
mod classify;

pub use builder::GraphBuilder;
pub use classify::{KindClassifier, KindRule};

use serde::{Deserialize, Serialize};

/// Kind of a graph node, used for colouring and layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Main,
    Person,
    Location,
    Image,
    Related,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Main => "main",
            NodeKind::Person => "person",
            NodeKind::Location => "location",
            NodeKind::Image => "image",
            NodeKind::Related => "related",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(rename = "image", skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
}

/// Directed hub -> spoke edge
///
/// `relationship` mirrors `label` for page scripts that read either key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(default)]
    pub relationship: String,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str, label: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
            relationship: label.to_string(),
        }
    }
}

/// Node and edge lists in insertion order.
///
/// Node ids are unique and every edge endpoint names a node in `nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    #[serde(rename = "links")]
    pub edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    /// Graph holding only the main entity's node
    pub fn hub_only(id: &str, label: &str) -> Self {
        Self {
            nodes: vec![GraphNode {
                id: id.to_string(),
                label: label.to_string(),
                kind: NodeKind::Main,
                image_url: None,
            }],
            edges: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
