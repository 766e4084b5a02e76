//! Pin definitions
//!
//! A pin is an attachment point on a node. Links always run from an output
//! pin to an input pin.

use joint_core::{NodeId, PinId, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of a link a pin can sit on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinDirection {
    Input,
    Output,
}

impl PinDirection {
    pub fn opposite(self) -> Self {
        match self {
            PinDirection::Input => PinDirection::Output,
            PinDirection::Output => PinDirection::Input,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PinDirection::Input => "input",
            PinDirection::Output => "output",
        }
    }
}

impl std::fmt::Display for PinDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A pin owned by a graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Unique identifier for this pin
    pub id: PinId,

    /// Node this pin belongs to
    pub node: NodeId,

    pub direction: PinDirection,

    /// Display name (e.g., "Out", "Next")
    pub name: String,

    /// Top-left corner relative to the owning node's position
    pub offset: Vec2,

    /// Widget size on the canvas
    #[serde(default)]
    pub size: Size,
}

impl Pin {
    /// Create a new pin at the node's origin
    pub fn new(node: NodeId, direction: PinDirection, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            node,
            direction,
            name: name.into(),
            offset: Vec2::ZERO,
            size: Size::default_pin(),
        }
    }

    /// Create an input pin
    pub fn input(node: NodeId, name: impl Into<String>) -> Self {
        Self::new(node, PinDirection::Input, name)
    }

    /// Create an output pin
    pub fn output(node: NodeId, name: impl Into<String>) -> Self {
        Self::new(node, PinDirection::Output, name)
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PinDirection::Output
    }
}
