//! # Joint Graph
//!
//! A minimal editor graph for Joint dialogues: nodes, pins and the links
//! between them, plus the reachability hierarchy used to classify each
//! connection before it is drawn.
//!
//! ## Core Concepts
//!
//! - **GraphNode**: a dialogue node (manager, connector, fragment or tunnel)
//! - **Pin**: an input or output attachment point on a node
//! - **Link**: a connection from an output pin to an input pin
//! - **HierarchyMap**: depth of every node reachable from a root
//! - **ConnectionCategory**: normal, recursive, self or preview
//! - **Scene**: a graph plus scripted drags, stored as JSON
//!

pub mod graph;
pub mod hierarchy;
pub mod node;
pub mod pin;
pub mod scene;

pub use graph::{EdGraph, Link, PinGeometries};
pub use hierarchy::{ConnectionCategory, HierarchyMap};
pub use node::{GraphNode, NodeKind};
pub use pin::{Pin, PinDirection};
pub use scene::{
    DragStep, Scene, SceneFile, load_scene, load_scene_from_string, save_scene,
    save_scene_to_string,
};

/// Current schema version for scene files
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
