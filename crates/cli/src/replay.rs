//! Scene replay
//!
//! Plays a scene through to its last frame and summarises what that frame
//! drew.

use anyhow::{Context, Result};
use joint_core::PinId;
use joint_graph::{EdGraph, Scene};
use joint_render::{DrawCounts, DrawList, ScenePlayer, SplineOverlapResult, WireSettings};
use serde::Serialize;

/// The wire under the mouse on the last frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverReport {
    /// "Node.Pin" of the wire's start, if it has one
    pub start: Option<String>,
    pub end: Option<String>,

    /// Pin nearest to the hit point
    pub nearest: Option<String>,

    /// Distance from the mouse to the wire, `None` when only close
    pub distance: Option<f32>,

    pub close_to_spline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneReport {
    pub graph: String,
    pub frames: u32,

    /// Links drawn on the last frame
    pub links_drawn: usize,

    pub simulators: usize,
    pub active_simulators: usize,
    pub draw_counts: DrawCounts,
    pub hover: Option<HoverReport>,

    /// Draw calls of the last frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_list: Option<DrawList>,
}

/// Replay `scene` with `settings`
///
/// Set `keep_draw_list` to include the last frame's draw calls in the report.
pub fn replay_scene(
    scene: Scene,
    settings: &WireSettings,
    keep_draw_list: bool,
) -> Result<SceneReport> {
    let mut player = ScenePlayer::new(scene, settings);
    let last = player.run_to_end().context("Failed to replay scene")?;

    let scene = player.scene();
    let wires = player.wires();
    tracing::info!(
        graph = %scene.graph.name,
        frames = scene.frames,
        simulators = wires.len(),
        "Scene replayed"
    );

    let (links_drawn, draw_list, overlap) = match last {
        Some(outcome) => (outcome.links_drawn, outcome.draw_list, outcome.overlap),
        None => (0, DrawList::new(), SplineOverlapResult::default()),
    };

    Ok(SceneReport {
        graph: scene.graph.name.clone(),
        frames: scene.frames,
        links_drawn,
        simulators: wires.len(),
        active_simulators: wires.active_count(),
        draw_counts: draw_list.counts(),
        hover: hover_report(&scene.graph, &overlap),
        draw_list: keep_draw_list.then_some(draw_list),
    })
}

fn hover_report(graph: &EdGraph, overlap: &SplineOverlapResult) -> Option<HoverReport> {
    if !overlap.is_valid() && !overlap.close_to_spline {
        return None;
    }

    let hit = overlap.is_valid();
    Some(HoverReport {
        start: overlap.pin1.and_then(|pin| pin_label(graph, pin)),
        end: overlap.pin2.and_then(|pin| pin_label(graph, pin)),
        nearest: if hit {
            overlap.best_pin().and_then(|pin| pin_label(graph, pin))
        } else {
            None
        },
        distance: hit.then(|| overlap.distance_squared.sqrt()),
        close_to_spline: overlap.close_to_spline,
    })
}

/// "Node.Pin" for a pin of `graph`
pub fn pin_label(graph: &EdGraph, pin: PinId) -> Option<String> {
    let pin = graph.get_pin(pin)?;
    let node = graph.owning_node(pin.id)?;
    Some(format!("{}.{}", node.name, pin.name))
}
