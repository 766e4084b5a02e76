//! Wire simulator registry
//!
//! Simulators are stored per graph in an arena: a dense `Vec` of entries plus
//! an index from wire identity to slot. Callers only ever get a `&mut` borrow
//! scoped to the current frame, never a handle that outlives a prune.

use crate::identity::WireId;
use joint_core::{GraphId, LinkQuery};
use joint_wire::WireSimulator;
use std::collections::HashMap;

// ============================================================================
// Constants
// ============================================================================

/// Seconds between prune passes
pub const PRUNE_INTERVAL: f32 = 5.0;

/// Simulators one graph may hold before new wires fall back to static curves
pub const DEFAULT_SIMULATOR_CAPACITY: usize = 4096;

// ============================================================================
// GraphWires
// ============================================================================

#[derive(Debug, Clone)]
struct Entry {
    id: WireId,
    simulator: WireSimulator,
}

/// Simulators for the wires of one graph
#[derive(Debug, Clone)]
pub struct GraphWires {
    entries: Vec<Entry>,
    index: HashMap<WireId, usize>,
    capacity: usize,
    time_since_prune: f32,
}

impl Default for GraphWires {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphWires {
    pub fn new() -> Self {
        Self::with_capacity_limit(DEFAULT_SIMULATOR_CAPACITY)
    }

    /// A registry that refuses to track more than `capacity` wires
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            capacity,
            time_since_prune: 0.0,
        }
    }

    /// Simulator for `id`, created on first use
    ///
    /// Returns `None` only when the capacity limit has been reached.
    pub fn get_or_add_simulator(&mut self, id: WireId) -> Option<&mut WireSimulator> {
        if let Some(&slot) = self.index.get(&id) {
            return self.entries.get_mut(slot).map(|e| &mut e.simulator);
        }

        if self.entries.len() >= self.capacity {
            return None;
        }

        let slot = self.entries.len();
        self.entries.push(Entry {
            id,
            simulator: WireSimulator::new(),
        });
        self.index.insert(id, slot);
        tracing::debug!(wire = %id, count = self.entries.len(), "New wire simulator");

        self.entries.last_mut().map(|e| &mut e.simulator)
    }

    pub fn get(&self, id: &WireId) -> Option<&WireSimulator> {
        self.index
            .get(id)
            .and_then(|&slot| self.entries.get(slot))
            .map(|e| &e.simulator)
    }

    pub fn contains(&self, id: &WireId) -> bool {
        self.index.contains_key(id)
    }

    /// Drop one simulator; returns whether it existed
    pub fn remove(&mut self, id: &WireId) -> bool {
        let Some(slot) = self.index.remove(id) else {
            return false;
        };
        self.entries.swap_remove(slot);
        if let Some(moved) = self.entries.get(slot) {
            self.index.insert(moved.id, slot);
        }
        true
    }

    /// Accumulate `delta_time`; once [`PRUNE_INTERVAL`] has passed, drop every
    /// simulator whose wire is a preview or no longer linked
    ///
    /// Returns the number of simulators removed.
    pub fn prune_dead_simulators(&mut self, delta_time: f32, links: &impl LinkQuery) -> usize {
        self.time_since_prune += delta_time.max(0.0);
        if self.time_since_prune < PRUNE_INTERVAL {
            return 0;
        }
        self.time_since_prune = 0.0;

        let before = self.entries.len();
        self.entries.retain(|entry| match (entry.id.start, entry.id.end) {
            (Some(start), Some(end)) => links.is_linked(start, end),
            _ => false,
        });
        let removed = before - self.entries.len();

        if removed > 0 {
            self.rebuild_index();
            tracing::info!(removed, remaining = self.entries.len(), "Pruned dead wire simulators");
        }
        removed
    }

    /// Wake every simulator, e.g. after the view was panned or zoomed
    pub fn notify_view_changed(&mut self) {
        for entry in &mut self.entries {
            entry.simulator.activate();
        }
    }

    /// Identities of the tracked wires
    pub fn ids(&self) -> impl Iterator<Item = &WireId> {
        self.entries.iter().map(|e| &e.id)
    }

    /// Number of simulators still moving
    pub fn active_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.simulator.is_active())
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity_limit(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(slot, e)| (e.id, slot))
            .collect();
    }
}

// ============================================================================
// WireRegistry
// ============================================================================

/// Per-graph simulator sets for an editor session
#[derive(Debug, Clone)]
pub struct WireRegistry {
    graphs: HashMap<GraphId, GraphWires>,
    capacity: usize,
}

impl Default for WireRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WireRegistry {
    pub fn new() -> Self {
        Self::with_capacity_limit(DEFAULT_SIMULATOR_CAPACITY)
    }

    /// Every graph created by this registry gets the same simulator limit
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            graphs: HashMap::new(),
            capacity,
        }
    }

    /// Simulators for a graph, created empty on first use
    pub fn graph_mut(&mut self, graph: GraphId) -> &mut GraphWires {
        let capacity = self.capacity;
        self.graphs
            .entry(graph)
            .or_insert_with(|| GraphWires::with_capacity_limit(capacity))
    }

    pub fn graph(&self, graph: GraphId) -> Option<&GraphWires> {
        self.graphs.get(&graph)
    }

    /// Forget a closed graph
    pub fn remove_graph(&mut self, graph: GraphId) -> Option<GraphWires> {
        self.graphs.remove(&graph)
    }

    pub fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    /// Simulators across every graph
    pub fn simulator_count(&self) -> usize {
        self.graphs.values().map(GraphWires::len).sum()
    }
}
