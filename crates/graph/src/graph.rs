//! The editor graph
//!
//! `EdGraph` holds nodes, pins and links. Node and link order is insertion
//! order, which keeps hierarchy depths and draw order stable between runs.

use crate::hierarchy::{ConnectionCategory, HierarchyMap};
use crate::node::GraphNode;
use crate::pin::{Pin, PinDirection};
use joint_core::{
    GraphId, JointError, JointResult, LinkQuery, NodeId, PinId, Positioned, Rect, Validatable,
    Vec2,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Screen-space rectangles of pin widgets, keyed by pin
pub type PinGeometries = HashMap<PinId, Rect>;

// ============================================================================
// Link
// ============================================================================

/// A connection from an output pin to an input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from: PinId,
    pub to: PinId,
}

impl Link {
    pub fn new(from: PinId, to: PinId) -> Self {
        Self { from, to }
    }

    /// True if this link joins `a` and `b`, in either order
    pub fn joins(&self, a: PinId, b: PinId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

// ============================================================================
// EdGraph
// ============================================================================

/// A dialogue graph as the editor sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdGraph {
    /// Unique identifier for this graph
    pub id: GraphId,

    pub name: String,

    /// Nodes in insertion order
    pub nodes: Vec<GraphNode>,

    /// All pins, keyed by ID
    pub pins: HashMap<PinId, Pin>,

    /// Links in insertion order
    pub links: Vec<Link>,
}

impl EdGraph {
    /// Create an empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            nodes: Vec::new(),
            pins: HashMap::new(),
            links: Vec::new(),
        }
    }

    // ========================================================================
    // Node Management
    // ========================================================================

    /// Add a node to the graph
    pub fn add_node(&mut self, node: GraphNode) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Remove a node along with its pins and every link touching them
    pub fn remove_node(&mut self, id: NodeId) -> Option<GraphNode> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(index);

        for pin in &node.pins {
            self.pins.remove(pin);
        }
        self.links
            .retain(|l| !node.pins.contains(&l.from) && !node.pins.contains(&l.to));

        Some(node)
    }

    /// Move a node so its top-left corner sits at `position`
    pub fn move_node(&mut self, id: NodeId, position: Vec2) -> JointResult<()> {
        let node = self
            .get_node_mut(id)
            .ok_or_else(|| JointError::NodeNotFound(id.to_string()))?;
        node.set_position(position);
        Ok(())
    }

    /// Move a node by a relative offset
    pub fn translate_node(&mut self, id: NodeId, delta: Vec2) -> JointResult<()> {
        let node = self
            .get_node_mut(id)
            .ok_or_else(|| JointError::NodeNotFound(id.to_string()))?;
        node.translate(delta.x, delta.y);
        Ok(())
    }

    pub fn get_node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find a node by display name
    pub fn get_node_by_name(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Pin Management
    // ========================================================================

    /// Attach a pin to its node
    pub fn add_pin(&mut self, pin: Pin) -> JointResult<PinId> {
        let id = pin.id;
        let node = self
            .get_node_mut(pin.node)
            .ok_or_else(|| JointError::NodeNotFound(pin.node.to_string()))?;
        node.pins.push(id);
        self.pins.insert(id, pin);
        Ok(id)
    }

    pub fn get_pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.get(&id)
    }

    /// The node owning a pin
    pub fn owning_node(&self, pin: PinId) -> Option<&GraphNode> {
        self.pins.get(&pin).and_then(|p| self.get_node(p.node))
    }

    /// Find a pin on a node by name
    pub fn find_pin(&self, node: NodeId, name: &str) -> Option<&Pin> {
        self.get_node(node)?
            .pins
            .iter()
            .filter_map(|id| self.pins.get(id))
            .find(|p| p.name == name)
    }

    // ========================================================================
    // Link Management
    // ========================================================================

    /// Link an output pin to an input pin
    pub fn link(&mut self, output: PinId, input: PinId) -> JointResult<()> {
        let from = self
            .pins
            .get(&output)
            .ok_or_else(|| JointError::PinNotFound(output.to_string()))?;
        let to = self
            .pins
            .get(&input)
            .ok_or_else(|| JointError::PinNotFound(input.to_string()))?;

        if from.direction != PinDirection::Output || to.direction != PinDirection::Input {
            return Err(JointError::invalid_link(format!(
                "expected output -> input, got {} '{}' -> {} '{}'",
                from.direction, from.name, to.direction, to.name
            )));
        }

        if self.is_linked(output, input) {
            return Err(JointError::DuplicateLink {
                from: from.name.clone(),
                to: to.name.clone(),
            });
        }

        self.links.push(Link::new(output, input));
        Ok(())
    }

    /// Break the link between two pins; returns whether one existed
    pub fn unlink(&mut self, a: PinId, b: PinId) -> bool {
        let before = self.links.len();
        self.links.retain(|l| !l.joins(a, b));
        self.links.len() != before
    }

    /// Remove every link touching a pin
    pub fn break_pin_links(&mut self, pin: PinId) -> usize {
        let before = self.links.len();
        self.links.retain(|l| l.from != pin && l.to != pin);
        before - self.links.len()
    }

    /// Links in insertion order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Pins linked to `pin`, in link order
    pub fn linked_to(&self, pin: PinId) -> Vec<PinId> {
        self.links
            .iter()
            .filter_map(|l| {
                if l.from == pin {
                    Some(l.to)
                } else if l.to == pin {
                    Some(l.from)
                } else {
                    None
                }
            })
            .collect()
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Canvas rectangle of a pin widget
    pub fn pin_geometry(&self, pin: PinId) -> Option<Rect> {
        let pin = self.pins.get(&pin)?;
        let node = self.get_node(pin.node)?;
        Some(Rect::new(node.position + pin.offset, pin.size))
    }

    /// Rectangles for every pin on the graph
    pub fn pin_geometries(&self) -> PinGeometries {
        self.pins
            .keys()
            .filter_map(|&id| self.pin_geometry(id).map(|rect| (id, rect)))
            .collect()
    }

    // ========================================================================
    // Classification
    // ========================================================================

    /// Depth of every node reachable from a root
    pub fn hierarchy(&self) -> HierarchyMap {
        HierarchyMap::build(self)
    }

    /// Category of the connection between `output` and `input`
    ///
    /// A missing pin on either side makes it a preview.
    pub fn classify(
        &self,
        hierarchy: &HierarchyMap,
        output: Option<PinId>,
        input: Option<PinId>,
    ) -> ConnectionCategory {
        let (Some(output), Some(input)) = (output, input) else {
            return ConnectionCategory::Preview;
        };
        let from = self.pins.get(&output).map(|p| p.node);
        let to = self.pins.get(&input).map(|p| p.node);

        match (from, to) {
            (Some(from), Some(to)) if from == to => ConnectionCategory::SelfLink,
            (Some(from), Some(to)) if hierarchy.is_recursive(from, to) => {
                ConnectionCategory::Recursive
            }
            _ => ConnectionCategory::Normal,
        }
    }
}

impl LinkQuery for EdGraph {
    fn is_linked(&self, start: PinId, end: PinId) -> bool {
        self.links.iter().any(|l| l.joins(start, end))
    }
}

impl Validatable for EdGraph {
    fn validate(&self) -> JointResult<()> {
        for pin in self.pins.values() {
            let node = self
                .get_node(pin.node)
                .ok_or_else(|| JointError::NodeNotFound(pin.node.to_string()))?;
            if !node.pins.contains(&pin.id) {
                return Err(JointError::validation(format!(
                    "Pin '{}' is not listed on node '{}'",
                    pin.name, node.name
                )));
            }
        }

        for link in &self.links {
            for end in [link.from, link.to] {
                if !self.pins.contains_key(&end) {
                    return Err(JointError::PinNotFound(end.to_string()));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
