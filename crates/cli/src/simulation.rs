//! Single-wire simulation runs

use crate::args::SimulateArgs;
use joint_core::Vec2;
use joint_graph::ConnectionCategory;
use joint_wire::{WiggleWireConfig, WireSimulator};
use serde::Serialize;

/// What to simulate: a horizontal wire, optionally with one sideways jump
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPlan {
    pub length: f32,
    pub frames: u32,
    pub delta_time: f32,

    /// Frame and distance of a one-off jump of the start point
    pub jump: Option<(u32, f32)>,

    /// Keep every Nth frame in the report
    pub every: u32,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            length: 400.0,
            frames: 300,
            delta_time: 1.0 / 60.0,
            jump: None,
            every: 30,
        }
    }
}

impl From<&SimulateArgs> for SimulationPlan {
    fn from(args: &SimulateArgs) -> Self {
        Self {
            length: args.length,
            frames: args.frames,
            delta_time: args.delta_time,
            jump: args.jump_frame.map(|frame| (frame, args.jump_distance)),
            every: args.every,
        }
    }
}

/// Simulator state after one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSample {
    pub frame: u32,
    pub time: f32,
    pub start: Vec2,
    pub offset: Vec2,
    pub velocity: Vec2,
    pub target: Vec2,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub category: String,
    pub config: WiggleWireConfig,
    pub samples: Vec<FrameSample>,
    pub final_offset: Vec2,
    pub target_offset: Vec2,
    pub active: bool,

    /// Last frame on which the wire went from moving to at rest
    pub settled_frame: Option<u32>,
}

/// Run `plan` against a fresh simulator
///
/// The last frame is always sampled, whatever `every` is.
pub fn run_simulation(
    plan: &SimulationPlan,
    category: ConnectionCategory,
    config: &WiggleWireConfig,
) -> SimulationReport {
    let mut simulator = WireSimulator::new();
    let mut start = Vec2::ZERO;
    let end = Vec2::new(plan.length, 0.0);
    let every = plan.every.max(1);

    let mut samples = Vec::new();
    let mut settled_frame = None;
    let mut was_active = false;

    for frame in 0..plan.frames {
        if let Some((jump_frame, distance)) = plan.jump {
            if frame == jump_frame {
                start.x += distance;
                tracing::debug!(frame, distance, "Start point jumped");
            }
        }

        simulator.update(start, end, config, plan.delta_time);

        let active = simulator.is_active();
        if was_active && !active {
            settled_frame = Some(frame);
        }
        was_active = active;

        if frame % every == 0 || frame + 1 == plan.frames {
            samples.push(FrameSample {
                frame,
                time: (frame + 1) as f32 * plan.delta_time,
                start,
                offset: simulator.offset(),
                velocity: simulator.velocity(),
                target: simulator.target_offset(),
                active,
            });
        }
    }

    SimulationReport {
        category: category.display_name().to_string(),
        config: *config,
        samples,
        final_offset: simulator.offset(),
        target_offset: simulator.target_offset(),
        active: simulator.is_active(),
        settled_frame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_sags_and_settles() {
        let plan = SimulationPlan {
            frames: 600,
            ..SimulationPlan::default()
        };
        let config = WiggleWireConfig::default();
        let report = run_simulation(&plan, ConnectionCategory::Normal, &config);

        assert_eq!(report.category, "normal");
        assert!(report.target_offset.y > 0.0);
        assert!(report.final_offset.y >= 0.0);
        assert!(!report.active);
        assert!(report.settled_frame.is_some());
    }

    #[test]
    fn test_sampling_keeps_last_frame() {
        let plan = SimulationPlan {
            frames: 10,
            every: 4,
            ..SimulationPlan::default()
        };
        let report = run_simulation(
            &plan,
            ConnectionCategory::Normal,
            &WiggleWireConfig::default(),
        );
        let frames: Vec<u32> = report.samples.iter().map(|s| s.frame).collect();
        assert_eq!(frames, vec![0, 4, 8, 9]);
    }

    #[test]
    fn test_jump_moves_start_point() {
        let plan = SimulationPlan {
            frames: 20,
            every: 1,
            jump: Some((10, 150.0)),
            ..SimulationPlan::default()
        };
        let report = run_simulation(
            &plan,
            ConnectionCategory::Normal,
            &WiggleWireConfig::default(),
        );
        assert_eq!(report.samples[9].start, Vec2::ZERO);
        assert_eq!(report.samples[10].start, Vec2::new(150.0, 0.0));
        assert!(report.samples[10].active);
    }

    #[test]
    fn test_zero_frames() {
        let plan = SimulationPlan {
            frames: 0,
            ..SimulationPlan::default()
        };
        let report = run_simulation(
            &plan,
            ConnectionCategory::Preview,
            &WiggleWireConfig::default(),
        );
        assert!(report.samples.is_empty());
        assert_eq!(report.final_offset, Vec2::ZERO);
        assert!(!report.active);
    }
}
