//! The constellation graph - node and link tables of the documentary.

use serde::{Deserialize, Serialize};

/// Unique identifier for a story node.
///
/// Ids are human-readable slugs authored alongside the content
/// (`"les-racines"`), never generated values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A point in layout space, the coordinate system the graph was authored in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

fn default_size() -> f32 {
    1.0
}

/// A single node of the constellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Display label. Decorative nodes carry an empty one.
    #[serde(default)]
    pub label: String,

    /// Layout-space coordinates. Nodes without coordinates are placed by the
    /// renderer and are invisible to positional queries.
    #[serde(default)]
    pub position: Option<Position>,

    /// Rendering size hint.
    #[serde(default = "default_size")]
    pub size: f32,

    /// Background filler with no chapter behind it.
    #[serde(default)]
    pub decorative: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(id),
            label: label.into(),
            position: None,
            size: default_size(),
            decorative: false,
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Mark the node as background decoration.
    pub fn decorative(mut self) -> Self {
        self.decorative = true;
        self
    }
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: NodeId::new(source),
            target: NodeId::new(target),
        }
    }
}

/// The node and link tables of a documentary graph.
///
/// Node order is meaningful: it is the authored table order, and positional
/// queries resolve ties in favor of earlier entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constellation {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl Constellation {
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self { nodes, links }
    }

    /// Nodes in authored table order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Whether the id names a decorative node. Unknown ids are not decorative.
    pub fn is_decorative(&self, id: &str) -> bool {
        self.node(id).map(|node| node.decorative).unwrap_or(false)
    }

    /// Whether a link touches a decorative endpoint.
    pub fn is_decorative_link(&self, link: &Link) -> bool {
        self.is_decorative(link.source.as_str()) || self.is_decorative(link.target.as_str())
    }
}
