//! Reachability hierarchy and connection categories
//!
//! Walking the graph from its root nodes assigns every reachable node a
//! depth. A link that points back to a node at the same or a shallower depth
//! loops the dialogue and is drawn as recursive.

use crate::graph::EdGraph;
use crate::node::NodeKind;
use crate::pin::PinDirection;
use joint_core::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a connection is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionCategory {
    Normal,
    /// Points back up the hierarchy
    Recursive,
    /// Both ends on the same node
    #[serde(rename = "self")]
    SelfLink,
    /// Being dragged; one end follows the mouse
    Preview,
}

impl ConnectionCategory {
    pub const ALL: [ConnectionCategory; 4] = [
        ConnectionCategory::Normal,
        ConnectionCategory::Recursive,
        ConnectionCategory::SelfLink,
        ConnectionCategory::Preview,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ConnectionCategory::Normal => "normal",
            ConnectionCategory::Recursive => "recursive",
            ConnectionCategory::SelfLink => "self",
            ConnectionCategory::Preview => "preview",
        }
    }
}

impl std::fmt::Display for ConnectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Depth of each node reachable from a `Manager` or `Connector` node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyMap {
    depths: HashMap<NodeId, u32>,
}

impl HierarchyMap {
    /// Walk the graph depth-first from every manager, then every connector
    ///
    /// Roots sit at depth 0. A node keeps the depth of the first path that
    /// reaches it.
    pub fn build(graph: &EdGraph) -> Self {
        let mut map = Self::default();
        for kind in [NodeKind::Manager, NodeKind::Connector] {
            for root in graph.nodes.iter().filter(|n| n.kind == kind) {
                map.collect_from(graph, root.id);
            }
        }
        map
    }

    fn collect_from(&mut self, graph: &EdGraph, root: NodeId) {
        // Explicit stack; children pushed in reverse so pops follow link order
        let mut stack = vec![(root, 0u32)];
        while let Some((node_id, depth)) = stack.pop() {
            if self.depths.contains_key(&node_id) {
                continue;
            }
            self.depths.insert(node_id, depth);

            let Some(node) = graph.get_node(node_id) else {
                continue;
            };
            let children: Vec<NodeId> = node
                .pins
                .iter()
                .filter(|pin| {
                    graph
                        .get_pin(**pin)
                        .is_some_and(|p| p.direction == PinDirection::Output)
                })
                .flat_map(|&pin| graph.linked_to(pin))
                .filter_map(|linked| graph.get_pin(linked).map(|p| p.node))
                .collect();

            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    pub fn depth(&self, node: NodeId) -> Option<u32> {
        self.depths.get(&node).copied()
    }

    /// True if the node lies on a route from some root
    pub fn contains(&self, node: NodeId) -> bool {
        self.depths.contains_key(&node)
    }

    /// Both nodes are reachable and `from` is not above `to`
    pub fn is_recursive(&self, from: NodeId, to: NodeId) -> bool {
        match (self.depth(from), self.depth(to)) {
            (Some(from), Some(to)) => from >= to,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}
