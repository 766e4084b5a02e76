//! Per-wire sag simulation
//!
//! A `WireSimulator` tracks one connection's offset from the straight line
//! between its endpoints. The host feeds it endpoint positions every frame;
//! it answers with a smoothed offset that hangs the wire under gravity,
//! wobbles when a node is dragged and settles once nothing moves.
//!
//! Time is owned by the simulator: every `update` advances an internal clock
//! by the frame's delta, and interaction timestamps are taken from that clock.
//! Replaying the same frame sequence therefore always yields the same curve.

use crate::config::WiggleWireConfig;
use crate::spring::spring_interp;
use joint_core::{KINDA_SMALL_NUMBER, Vec2};
use serde::{Deserialize, Serialize};

// ============================================================================
// Tuning Constants
// ============================================================================

/// Largest frame step the spring will integrate
pub const MAX_DELTA_TIME: f32 = 1.0 / 15.0;

/// Endpoint movement (per component) that counts as an interaction
pub const POSITION_CHANGE_THRESHOLD: f32 = 1.0;

/// Offset-to-target tolerance for settling
pub const SETTLE_POSITION_TOLERANCE: f32 = 1.0;

/// Velocity tolerance for settling
pub const SETTLE_VELOCITY_TOLERANCE: f32 = 0.5;

/// Damping added on top of the configured ratio once the wire is idle
pub const MAX_EXTRA_DAMPING: f32 = 2.0;

/// Share of the endpoint jump converted into a sideways kick
const MOVEMENT_IMPULSE_SCALE: f32 = 0.5;

/// Endpoint distance at which sag reaches full strength
const FULL_SAG_DISTANCE: f32 = 50.0;

/// Slack and hang factors the wire tends toward when fully taut
const TAUT_SLACK_FACTOR: f32 = 1.01;
const TAUT_HANG_FACTOR: f32 = 0.1;

/// How much tension shrinks the sag cap
const TENSION_SAG_REDUCTION: f32 = 0.8;

/// Share of the target length kept sideways when a wire is pushed above its chord
const UPWARD_RECOVERY_SCALE: f32 = 0.7;

/// Squared endpoint distance below which the wire is treated as a point
const MIN_DISTANCE_SQUARED: f32 = 0.01;

// ============================================================================
// WireSimulator
// ============================================================================

/// Spring state for a single wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSimulator {
    /// Current offset of the curve's middle from the chord midpoint
    offset: Vec2,

    /// Rate of change of `offset`
    velocity: Vec2,

    /// Offset the spring is being pulled toward
    target_offset: Vec2,

    last_start: Vec2,
    last_end: Vec2,

    /// Average endpoint velocity measured on the last update
    endpoint_velocity: Vec2,

    /// Seconds accumulated across every update
    clock: f64,

    /// Clock reading at the last interaction
    last_interaction: f64,

    active: bool,
}

impl Default for WireSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl WireSimulator {
    /// A fresh simulator: zero offset, at rest, inactive
    pub fn new() -> Self {
        Self {
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            target_offset: Vec2::ZERO,
            last_start: Vec2::ZERO,
            last_end: Vec2::ZERO,
            endpoint_velocity: Vec2::ZERO,
            clock: 0.0,
            last_interaction: 0.0,
            active: false,
        }
    }

    /// Step the simulation one frame and return the new offset
    ///
    /// `delta_time` is clamped to [`MAX_DELTA_TIME`] for integration, but the
    /// internal clock advances by the full (non-negative) amount.
    pub fn update(
        &mut self,
        start: Vec2,
        end: Vec2,
        config: &WiggleWireConfig,
        delta_time: f32,
    ) -> Vec2 {
        let delta_time = delta_time.max(0.0);
        self.clock += f64::from(delta_time);
        let step = delta_time.min(MAX_DELTA_TIME);

        let endpoint_delta = ((start - self.last_start) + (end - self.last_end)) * 0.5;
        let endpoint_velocity = endpoint_delta / step.max(KINDA_SMALL_NUMBER);

        let moved = !start.equals(self.last_start, POSITION_CHANGE_THRESHOLD)
            || !end.equals(self.last_end, POSITION_CHANGE_THRESHOLD);
        if moved {
            let magnitude = endpoint_delta.length();
            if magnitude > POSITION_CHANGE_THRESHOLD {
                let direction = (end - start).safe_normal();
                self.velocity += direction.perpendicular()
                    * (magnitude * MOVEMENT_IMPULSE_SCALE * config.movement_response_factor);
            }
            self.activate();
        }

        self.target_offset = Self::calculate_target_offset(start, end, config);

        let idle = self.time_since_interaction();
        let damping = adaptive_damping(config, idle);
        spring_interp(
            &mut self.offset,
            &mut self.velocity,
            self.target_offset,
            step,
            config.stiffness,
            damping,
            Vec2::DOWN,
        );

        if self.offset.y < 0.0 {
            self.offset.y = 0.0;
            if !self.target_offset.is_nearly_zero(KINDA_SMALL_NUMBER) {
                self.offset.x =
                    sign(self.offset.x) * self.target_offset.length() * UPWARD_RECOVERY_SCALE;
            }
        }

        if idle > config.inactivity_threshold
            && self.offset.equals(self.target_offset, SETTLE_POSITION_TOLERANCE)
            && self.velocity.is_nearly_zero(SETTLE_VELOCITY_TOLERANCE)
        {
            if self.active {
                tracing::trace!(
                    idle,
                    offset_x = self.offset.x,
                    offset_y = self.offset.y,
                    "Wire settled"
                );
            }
            self.active = false;
            self.velocity = Vec2::ZERO;
        }

        self.last_start = start;
        self.last_end = end;
        self.endpoint_velocity = endpoint_velocity;

        self.offset
    }

    /// Where the wire wants to rest for the given endpoints
    ///
    /// Pure function of its inputs. The result is perpendicular to the chord
    /// and never points up the screen.
    pub fn calculate_target_offset(start: Vec2, end: Vec2, config: &WiggleWireConfig) -> Vec2 {
        let chord = end - start;
        let distance_sq = chord.length_squared();
        if distance_sq < MIN_DISTANCE_SQUARED {
            return Vec2::ZERO;
        }
        let distance = distance_sq.sqrt();
        let distance_scale = (distance / FULL_SAG_DISTANCE).clamp(0.0, 1.0);

        let tension = tension_factor(distance, config);
        let slack = joint_core::lerp(config.slack_factor, TAUT_SLACK_FACTOR, tension);
        let hang = joint_core::lerp(config.hang_factor, TAUT_HANG_FACTOR, tension);

        let max_sag = config.max_sag * (1.0 - tension * TENSION_SAG_REDUCTION);
        let sag = (distance * (slack - 1.0) * hang).min(max_sag);
        if sag < KINDA_SMALL_NUMBER {
            return Vec2::ZERO;
        }

        let mut direction = chord.safe_normal().perpendicular();
        if direction.y < 0.0 {
            direction = -direction;
        }

        direction * sag * distance_scale
    }

    /// Point the curve should pass through: chord midpoint plus the offset,
    /// never above the midpoint
    pub fn visual_center(&self, start: Vec2, end: Vec2) -> Vec2 {
        let midpoint = start.midpoint(end);
        let mut center = midpoint + self.offset;
        center.y = center.y.max(midpoint.y);
        center
    }

    /// Mark the wire as interacted with now
    pub fn activate(&mut self) {
        self.active = true;
        self.last_interaction = self.clock;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn target_offset(&self) -> Vec2 {
        self.target_offset
    }

    /// Average endpoint velocity seen on the last update
    pub fn endpoint_velocity(&self) -> Vec2 {
        self.endpoint_velocity
    }

    /// Seconds of simulated time since the last interaction
    pub fn time_since_interaction(&self) -> f32 {
        (self.clock - self.last_interaction) as f32
    }

    /// Seconds of simulated time seen so far
    pub fn elapsed(&self) -> f64 {
        self.clock
    }
}

/// 0 at or below the relaxed distance, 1 at or beyond the tension distance
fn tension_factor(distance: f32, config: &WiggleWireConfig) -> f32 {
    if distance <= config.relaxed_distance_threshold {
        return 0.0;
    }
    let span = config.tension_distance_threshold - config.relaxed_distance_threshold;
    if span <= 0.0 {
        return 1.0;
    }
    ((distance - config.relaxed_distance_threshold) / span).clamp(0.0, 1.0)
}

/// Damping ratio ramps quadratically from the configured value to
/// `+MAX_EXTRA_DAMPING` as the wire sits idle
fn adaptive_damping(config: &WiggleWireConfig, idle: f32) -> f32 {
    if idle <= 0.0 {
        return config.damping_ratio;
    }
    let ratio = if config.inactivity_threshold > 0.0 {
        (idle / config.inactivity_threshold).min(1.0)
    } else {
        1.0
    };
    config.damping_ratio + ratio * ratio * MAX_EXTRA_DAMPING
}

/// -1, 0 or 1; unlike `f32::signum`, zero stays zero
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FRAME: f32 = 1.0 / 60.0;

    fn run(sim: &mut WireSimulator, start: Vec2, end: Vec2, frames: usize) -> Vec2 {
        let config = WiggleWireConfig::default();
        let mut offset = Vec2::ZERO;
        for _ in 0..frames {
            offset = sim.update(start, end, &config, FRAME);
        }
        offset
    }

    fn sag_at(distance: f32) -> f32 {
        WireSimulator::calculate_target_offset(
            Vec2::ZERO,
            Vec2::new(distance, 0.0),
            &WiggleWireConfig::default(),
        )
        .length()
    }

    #[test]
    fn test_new_simulator_is_at_rest() {
        let sim = WireSimulator::new();
        assert_eq!(sim.offset(), Vec2::ZERO);
        assert_eq!(sim.velocity(), Vec2::ZERO);
        assert!(!sim.is_active());
    }

    #[test]
    fn test_horizontal_wire_sags_down_and_settles() {
        let mut sim = WireSimulator::new();
        let offset = run(&mut sim, Vec2::ZERO, Vec2::new(300.0, 0.0), 120);

        assert!(offset.y > 0.0);
        assert!(offset.y <= 200.0);
        assert!(!sim.is_active());
        assert_eq!(sim.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_stretched_wire_settles_below_max_sag() {
        let mut sim = WireSimulator::new();
        let offset = run(&mut sim, Vec2::ZERO, Vec2::new(400.0, 0.0), 300);

        assert!(offset.y > 0.0 && offset.y <= 200.0);
        assert!(!sim.is_active());
        assert!(offset.equals(sim.target_offset(), SETTLE_POSITION_TOLERANCE));
    }

    #[test]
    fn test_degenerate_wire_stays_flat() {
        let mut sim = WireSimulator::new();
        let offset = run(&mut sim, Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 60);
        assert_eq!(offset, Vec2::ZERO);
        assert_eq!(sim.target_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_target_offset_zero_for_coincident_points() {
        let config = WiggleWireConfig::default();
        let p = Vec2::new(12.0, -4.0);
        assert_eq!(WireSimulator::calculate_target_offset(p, p, &config), Vec2::ZERO);
        assert_eq!(
            WireSimulator::calculate_target_offset(p, p.offset(0.05, 0.05), &config),
            Vec2::ZERO
        );
    }

    #[test]
    fn test_target_offset_never_points_up() {
        let config = WiggleWireConfig::default();
        let start = Vec2::new(100.0, 100.0);
        for i in 0..32 {
            let angle = i as f32 / 32.0 * std::f32::consts::TAU;
            let end = start + Vec2::new(angle.cos(), angle.sin()) * 250.0;
            let target = WireSimulator::calculate_target_offset(start, end, &config);
            assert!(target.y >= 0.0, "angle {angle} gave {target:?}");
        }
    }

    #[test]
    fn test_target_offset_is_perpendicular_to_chord() {
        let config = WiggleWireConfig::default();
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(200.0, 120.0);
        let target = WireSimulator::calculate_target_offset(start, end, &config);
        assert!(target.length() > 1.0);
        assert!((target.dot((end - start).safe_normal())).abs() < 1.0e-3);
    }

    #[test]
    fn test_sag_respects_max_sag() {
        let config = WiggleWireConfig::default().with_max_sag(10.0);
        let target =
            WireSimulator::calculate_target_offset(Vec2::ZERO, Vec2::new(300.0, 0.0), &config);
        assert!(target.length() <= 10.0 + 1.0e-4);
    }

    #[test]
    fn test_short_wires_sag_less() {
        assert!(sag_at(20.0) < sag_at(60.0));
        assert!(sag_at(60.0) < sag_at(300.0));
    }

    #[test]
    fn test_tension_reduces_sag() {
        let relaxed = sag_at(300.0);
        let mut previous = relaxed;
        for distance in [400.0, 500.0, 600.0] {
            let sag = sag_at(distance);
            assert!(sag <= previous, "sag grew at {distance}");
            previous = sag;
        }
        for distance in [600.0, 800.0, 1000.0, 1500.0] {
            assert!(sag_at(distance) <= relaxed);
        }
    }

    #[test]
    fn test_endpoint_jump_activates_and_kicks() {
        let config = WiggleWireConfig::default();
        let mut sim = WireSimulator::new();
        let end = Vec2::new(1000.0, 0.0);
        for _ in 0..300 {
            sim.update(Vec2::ZERO, end, &config, FRAME);
        }
        assert!(!sim.is_active());

        sim.update(Vec2::new(500.0, 0.0), end, &config, FRAME);

        assert!(sim.is_active());
        assert!(!sim.velocity().is_nearly_zero(1.0));
        assert!(sim.endpoint_velocity().x > 0.0);
        assert_eq!(sim.time_since_interaction(), 0.0);
    }

    #[test]
    fn test_small_jitter_is_not_an_interaction() {
        let config = WiggleWireConfig::default();
        let mut sim = WireSimulator::new();
        let end = Vec2::new(300.0, 0.0);
        for _ in 0..180 {
            sim.update(Vec2::ZERO, end, &config, FRAME);
        }
        assert!(!sim.is_active());

        sim.update(Vec2::new(0.5, -0.5), end, &config, FRAME);
        assert!(!sim.is_active());
    }

    #[test]
    fn test_dragged_wire_never_rises_above_chord() {
        let config = WiggleWireConfig::default();
        let mut sim = WireSimulator::new();
        let end = Vec2::new(400.0, 50.0);
        for frame in 0..240 {
            let t = frame as f32 * FRAME;
            let start = Vec2::new((t * 7.0).sin() * 150.0, (t * 5.0).cos() * 120.0);
            let offset = sim.update(start, end, &config, FRAME);
            assert!(offset.y >= 0.0);

            let center = sim.visual_center(start, end);
            assert!(center.y >= start.midpoint(end).y);
        }
    }

    #[test]
    fn test_large_delta_time_is_clamped() {
        let config = WiggleWireConfig::default();
        let mut sim = WireSimulator::new();
        let offset = sim.update(Vec2::ZERO, Vec2::new(300.0, 0.0), &config, 10.0);
        assert!(offset.x.is_finite() && offset.y.is_finite());
        assert!(offset.y <= 200.0);
        assert_eq!(sim.elapsed(), 10.0);
    }

    #[test]
    fn test_zero_delta_time_keeps_offset() {
        let config = WiggleWireConfig::default();
        let mut sim = WireSimulator::new();
        run(&mut sim, Vec2::ZERO, Vec2::new(300.0, 0.0), 10);
        let before = sim.offset();
        sim.update(Vec2::ZERO, Vec2::new(300.0, 0.0), &config, 0.0);
        assert_eq!(sim.offset(), before);
    }

    #[test]
    fn test_activate_resets_idle_time() {
        let mut sim = WireSimulator::new();
        run(&mut sim, Vec2::ZERO, Vec2::new(300.0, 0.0), 120);
        assert!(sim.time_since_interaction() > 1.0);

        sim.activate();
        assert!(sim.is_active());
        assert_eq!(sim.time_since_interaction(), 0.0);
    }

    #[test]
    fn test_visual_center_of_resting_wire() {
        let sim = WireSimulator::new();
        let center = sim.visual_center(Vec2::new(0.0, 10.0), Vec2::new(100.0, 30.0));
        assert_eq!(center, Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_adaptive_damping_ramp() {
        let config = WiggleWireConfig::default();
        assert_eq!(adaptive_damping(&config, 0.0), config.damping_ratio);
        let full = adaptive_damping(&config, config.inactivity_threshold * 4.0);
        assert!((full - (config.damping_ratio + MAX_EXTRA_DAMPING)).abs() < 1.0e-6);
        let half = adaptive_damping(&config, config.inactivity_threshold * 0.5);
        assert!((half - (config.damping_ratio + 0.5)).abs() < 1.0e-6);
    }

    #[test]
    fn test_adaptive_damping_without_threshold_is_fully_damped() {
        let config = WiggleWireConfig {
            inactivity_threshold: 0.0,
            ..WiggleWireConfig::default()
        };
        assert_eq!(adaptive_damping(&config, 0.0), config.damping_ratio);
        let damping = adaptive_damping(&config, 0.1);
        assert!((damping - (config.damping_ratio + MAX_EXTRA_DAMPING)).abs() < 1.0e-6);
    }

    #[test]
    fn test_settled_wire_stays_inactive() {
        let mut sim = WireSimulator::new();
        run(&mut sim, Vec2::ZERO, Vec2::new(300.0, 0.0), 120);
        assert!(!sim.is_active());

        let offset = sim.offset();
        run(&mut sim, Vec2::ZERO, Vec2::new(300.0, 0.0), 30);
        assert!(!sim.is_active());
        assert!(sim.offset().equals(offset, SETTLE_POSITION_TOLERANCE));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let mut a = WireSimulator::new();
        let mut b = WireSimulator::new();
        let config = WiggleWireConfig::default();
        for frame in 0..90 {
            let start = Vec2::new(frame as f32 * 3.0, 0.0);
            let end = Vec2::new(350.0, 40.0);
            a.update(start, end, &config, FRAME);
            b.update(start, end, &config, FRAME);
        }
        assert_eq!(a, b);
    }
}
