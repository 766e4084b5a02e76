//! Closed-form damped spring
//!
//! Each axis is integrated with the analytic solution of
//! `x'' + 2*zeta*omega*x' + omega^2*x = 0` for unit mass, so the step is exact
//! for any `delta_time` and cannot blow up the way explicit Euler would.

use joint_core::{SMALL_NUMBER, Vec2};

/// Damping ratios this close to 1 take the critically damped branch. The
/// other two branches divide by values that vanish at exactly 1.
const CRITICAL_DAMPING_TOLERANCE: f32 = 1.0e-4;

/// Share of the wrong-way component removed by the preferred-direction nudge
const PREFERRED_DIRECTION_CORRECTION: f32 = 0.5;

/// Advance `current` and `velocity` toward `target` by `delta_time` seconds
///
/// Does nothing when `delta_time` is effectively zero or `stiffness` is not
/// positive. Negative damping is clamped to zero. When `preferred_direction`
/// is non-zero and the displacement from the target points against it, half
/// of that component is pushed back toward the preferred side.
pub fn spring_interp(
    current: &mut Vec2,
    velocity: &mut Vec2,
    target: Vec2,
    delta_time: f32,
    stiffness: f32,
    damping_ratio: f32,
    preferred_direction: Vec2,
) {
    if delta_time < SMALL_NUMBER || stiffness <= 0.0 {
        return;
    }

    let damping_ratio = damping_ratio.max(0.0);
    let omega = stiffness.sqrt();

    let (x, vx) = step_axis(current.x - target.x, velocity.x, delta_time, omega, damping_ratio);
    let (y, vy) = step_axis(current.y - target.y, velocity.y, delta_time, omega, damping_ratio);

    *current = Vec2::new(target.x + x, target.y + y);
    *velocity = Vec2::new(vx, vy);

    if !preferred_direction.is_nearly_zero(SMALL_NUMBER) {
        let displacement = *current - target;
        let along = displacement.dot(preferred_direction);
        if along < 0.0 {
            *current += preferred_direction.safe_normal() * (-along * PREFERRED_DIRECTION_CORRECTION);
        }
    }
}

/// One axis of the spring; returns the new displacement and velocity
fn step_axis(delta: f32, velocity: f32, dt: f32, omega: f32, zeta: f32) -> (f32, f32) {
    if (zeta - 1.0).abs() <= CRITICAL_DAMPING_TOLERANCE {
        let decay = (-omega * dt).exp();
        let c1 = delta;
        let c2 = velocity + omega * delta;
        let x = (c1 + c2 * dt) * decay;
        let v = (c2 - omega * (c1 + c2 * dt)) * decay;
        (x, v)
    } else if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega * dt).exp();
        let (sin, cos) = (omega_d * dt).sin_cos();
        let c1 = delta;
        let c2 = (velocity + zeta * omega * delta) / omega_d;
        let x = decay * (c1 * cos + c2 * sin);
        let v = decay
            * ((c2 * omega_d - c1 * zeta * omega) * cos - (c1 * omega_d + c2 * zeta * omega) * sin);
        (x, v)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega * (zeta - root);
        let r2 = -omega * (zeta + root);
        let c2 = (velocity - r1 * delta) / (r2 - r1);
        let c1 = delta - c2;
        let e1 = (r1 * dt).exp();
        let e2 = (r2 * dt).exp();
        (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
    }
}
