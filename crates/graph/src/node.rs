//! Graph node definitions

use joint_core::{NodeId, PinId, Positioned, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a node in a dialogue graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Graph entry point; hierarchy walks start here
    Manager,
    /// Jump target that starts its own route
    Connector,
    /// Ordinary dialogue content
    Fragment,
    /// Pass-through node that only forwards links
    Tunnel,
}

impl NodeKind {
    /// True for kinds the hierarchy walk starts from
    pub fn is_root(&self) -> bool {
        matches!(self, NodeKind::Manager | NodeKind::Connector)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Manager => "Manager",
            NodeKind::Connector => "Connector",
            NodeKind::Fragment => "Fragment",
            NodeKind::Tunnel => "Tunnel",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A node on the graph canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Display name shown in the node header
    pub name: String,

    pub kind: NodeKind,

    /// Top-left corner on the canvas
    pub position: Vec2,

    pub size: Size,

    /// Pins in the order they were added
    #[serde(default)]
    pub pins: Vec<PinId>,
}

impl GraphNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            position: Vec2::ZERO,
            size: Size::default_node(),
            pins: Vec::new(),
        }
    }

    pub fn manager(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Manager)
    }

    pub fn fragment(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Fragment)
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Node bounds on the canvas
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

impl Positioned for GraphNode {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
}
