//! Scene playback
//!
//! Steps a `Scene` one frame at a time through the drawing policy, the way an
//! editor canvas redraws: apply the frame's drags, draw every link into a
//! fresh `DrawList`, then advance the clock.

use crate::canvas::DrawList;
use crate::hit_test::SplineOverlapResult;
use crate::policy::{ConnectionDrawingPolicy, FrameContext};
use crate::registry::GraphWires;
use crate::settings::WireSettings;
use joint_core::JointResult;
use joint_graph::Scene;

/// What one frame drew
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// Zero-based frame index
    pub frame: u32,

    /// Drags applied before drawing
    pub drags_applied: usize,

    pub links_drawn: usize,
    pub draw_list: DrawList,
    pub overlap: SplineOverlapResult,
}

/// Replays a scene against its own wire simulators
pub struct ScenePlayer<'a> {
    scene: Scene,
    settings: &'a WireSettings,
    wires: GraphWires,
    next_frame: u32,
    app_time: f64,
}

impl<'a> ScenePlayer<'a> {
    pub fn new(scene: Scene, settings: &'a WireSettings) -> Self {
        Self {
            scene,
            settings,
            wires: GraphWires::new(),
            next_frame: 0,
            app_time: 0.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn wires(&self) -> &GraphWires {
        &self.wires
    }

    /// Seconds of scene time played so far
    pub fn app_time(&self) -> f64 {
        self.app_time
    }

    pub fn is_finished(&self) -> bool {
        self.next_frame >= self.scene.frames
    }

    /// Play the next frame, or `None` once every frame has run
    pub fn step(&mut self) -> JointResult<Option<FrameOutcome>> {
        if self.is_finished() {
            return Ok(None);
        }
        let frame = self.next_frame;

        let drags_applied = self.scene.apply_drags(frame)?;
        if drags_applied > 0 {
            tracing::debug!(frame, drags_applied, "Applied drags");
        }

        let context = FrameContext::new(self.scene.delta_time, self.app_time)
            .with_mouse(self.scene.mouse)
            .with_zoom(self.scene.zoom);
        let geometries = self.scene.graph.pin_geometries();

        let mut draw_list = DrawList::new();
        let mut policy =
            ConnectionDrawingPolicy::new(self.settings, &mut self.wires, &mut draw_list, context);
        let links_drawn = policy.draw(&self.scene.graph, &geometries);
        let overlap = policy.into_overlap_result();

        self.app_time += f64::from(self.scene.delta_time);
        self.next_frame += 1;

        Ok(Some(FrameOutcome {
            frame,
            drags_applied,
            links_drawn,
            draw_list,
            overlap,
        }))
    }

    /// Play every remaining frame and return the last one
    pub fn run_to_end(&mut self) -> JointResult<Option<FrameOutcome>> {
        let mut last = None;
        while let Some(outcome) = self.step()? {
            last = Some(outcome);
        }
        Ok(last)
    }
}
