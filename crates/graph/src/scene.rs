//! Scene files
//!
//! A scene is a graph plus a scripted interaction: how many frames to run,
//! where the mouse sits and which nodes get dragged on which frame. Scenes
//! are stored as pretty-printed JSON.

use crate::graph::EdGraph;
use crate::node::GraphNode;
use crate::pin::Pin;
use crate::SCHEMA_VERSION;
use joint_core::{JointError, JointResult, Validatable, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Move a node by `delta` on a given frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragStep {
    /// Zero-based frame index
    pub frame: u32,

    /// Display name of the node to move
    pub node: String,

    pub delta: Vec2,
}

/// A graph with a scripted sequence of frames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub graph: EdGraph,

    /// Mouse position for hover testing
    #[serde(default)]
    pub mouse: Vec2,

    pub frames: u32,

    #[serde(default = "default_delta_time")]
    pub delta_time: f32,

    #[serde(default = "default_zoom")]
    pub zoom: f32,

    #[serde(default)]
    pub drags: Vec<DragStep>,
}

fn default_delta_time() -> f32 {
    1.0 / 60.0
}

fn default_zoom() -> f32 {
    1.0
}

impl Scene {
    pub fn new(graph: EdGraph, frames: u32) -> Self {
        Self {
            graph,
            mouse: Vec2::ZERO,
            frames,
            delta_time: default_delta_time(),
            zoom: default_zoom(),
            drags: Vec::new(),
        }
    }

    pub fn with_mouse(mut self, mouse: Vec2) -> Self {
        self.mouse = mouse;
        self
    }

    pub fn with_drag(mut self, frame: u32, node: impl Into<String>, delta: Vec2) -> Self {
        self.drags.push(DragStep {
            frame,
            node: node.into(),
            delta,
        });
        self
    }

    /// Apply the drags scheduled for `frame`; returns how many ran
    pub fn apply_drags(&mut self, frame: u32) -> JointResult<usize> {
        let mut applied = 0;
        for step in self.drags.iter().filter(|d| d.frame == frame) {
            let id = self
                .graph
                .get_node_by_name(&step.node)
                .map(|n| n.id)
                .ok_or_else(|| JointError::NodeNotFound(step.node.clone()))?;
            self.graph.translate_node(id, step.delta)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// A small dialogue: a manager feeding two fragments, one of which
    /// loops back to the start and one that links to itself
    pub fn sample() -> JointResult<Self> {
        let mut graph = EdGraph::new("Sample Dialogue");
        let root = graph.add_node(GraphNode::manager("Start").at(0.0, 0.0));
        let greet = graph.add_node(GraphNode::fragment("Greeting").at(320.0, -80.0));
        let reply = graph.add_node(GraphNode::fragment("Reply").at(320.0, 160.0));

        let input_offset = Vec2::new(-16.0, 40.0);
        let output_offset = Vec2::new(180.0, 40.0);

        let root_out = graph.add_pin(Pin::output(root, "Out").with_offset(output_offset))?;
        let root_in = graph.add_pin(Pin::input(root, "In").with_offset(input_offset))?;
        let greet_in = graph.add_pin(Pin::input(greet, "In").with_offset(input_offset))?;
        let greet_out = graph.add_pin(Pin::output(greet, "Out").with_offset(output_offset))?;
        let reply_in = graph.add_pin(Pin::input(reply, "In").with_offset(input_offset))?;
        let reply_out = graph.add_pin(Pin::output(reply, "Out").with_offset(output_offset))?;

        graph.link(root_out, greet_in)?;
        graph.link(greet_out, reply_in)?;
        graph.link(reply_out, root_in)?;
        graph.link(greet_out, greet_in)?;

        Ok(Scene::new(graph, 180)
            .with_mouse(Vec2::new(420.0, 130.0))
            .with_drag(30, "Reply", Vec2::new(120.0, 0.0))
            .with_drag(90, "Reply", Vec2::new(-60.0, 80.0)))
    }
}

impl Validatable for Scene {
    fn validate(&self) -> JointResult<()> {
        self.graph.validate()?;
        if !(self.delta_time.is_finite() && self.delta_time >= 0.0) {
            return Err(JointError::validation(format!(
                "delta_time must be a non-negative number, got {}",
                self.delta_time
            )));
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(JointError::validation(format!(
                "zoom must be positive, got {}",
                self.zoom
            )));
        }
        for step in &self.drags {
            if self.graph.get_node_by_name(&step.node).is_none() {
                return Err(JointError::NodeNotFound(step.node.clone()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Scene File Wrapper
// ============================================================================

/// On-disk envelope carrying the schema version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub schema_version: u32,
    pub scene: Scene,
}

impl SceneFile {
    pub fn new(scene: Scene) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            scene,
        }
    }
}

// ============================================================================
// Save / Load
// ============================================================================

/// Save a scene to a file, creating parent directories as needed
pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> JointResult<()> {
    let path = path.as_ref();
    let json = save_scene_to_string(scene).map_err(|e| JointError::FileWrite {
        path: path.to_path_buf(),
        message: format!("Failed to serialize scene: {}", e),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| JointError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, json).map_err(|e| JointError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), "Saved scene");
    Ok(())
}

/// Serialize a scene to pretty JSON
pub fn save_scene_to_string(scene: &Scene) -> JointResult<String> {
    let file = SceneFile::new(scene.clone());
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Load and validate a scene file
pub fn load_scene(path: impl AsRef<Path>) -> JointResult<Scene> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(JointError::SceneNotFound(path.to_path_buf()));
    }

    let json = std::fs::read_to_string(path).map_err(|e| JointError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_scene_from_string(&json).map_err(|e| match e {
        JointError::JsonSerialization(je) => JointError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid scene file format: {}", je),
        },
        other => other,
    })
}

/// Parse a scene from JSON, with or without the versioned envelope
pub fn load_scene_from_string(json: &str) -> JointResult<Scene> {
    let scene = match serde_json::from_str::<SceneFile>(json) {
        Ok(file) => {
            if file.schema_version > SCHEMA_VERSION {
                tracing::warn!(
                    found = file.schema_version,
                    supported = SCHEMA_VERSION,
                    "Scene was written by a newer version"
                );
            }
            file.scene
        }
        Err(_) => serde_json::from_str::<Scene>(json)?,
    };
    scene.validate()?;
    Ok(scene)
}
