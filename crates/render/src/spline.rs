//! Spline math for connection curves
//!
//! Connections are cubic Hermite splines: two endpoints and a tangent at
//! each. Hit testing walks the curve as a polyline, and decorations are
//! spaced by arc length through a small reparameterization table.

use joint_core::Vec2;

// ============================================================================
// Constants
// ============================================================================

/// Polyline segments used when searching for the point nearest the mouse
pub const HIT_TEST_STEPS: usize = 16;

/// Samples taken along the curve when measuring arc length
pub const REPARAM_STEPS: usize = 10;

/// Largest contribution of a Hermite tangent to the curve's position,
/// reached at alpha 1/3 for the start tangent and 2/3 for the end tangent
pub const MAX_TANGENT_CONTRIBUTION: f32 = 4.0 / 27.0;

// ============================================================================
// Hermite Evaluation
// ============================================================================

/// Evaluate a cubic Hermite spline at `alpha` in [0, 1]
pub fn cubic_interp(p0: Vec2, t0: Vec2, p1: Vec2, t1: Vec2, alpha: f32) -> Vec2 {
    let a2 = alpha * alpha;
    let a3 = a2 * alpha;

    p0 * (2.0 * a3 - 3.0 * a2 + 1.0)
        + t0 * (a3 - 2.0 * a2 + alpha)
        + t1 * (a3 - a2)
        + p1 * (-2.0 * a3 + 3.0 * a2)
}

/// The endpoints and tangents of one connection curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HermiteSpline {
    pub p0: Vec2,
    pub t0: Vec2,
    pub p1: Vec2,
    pub t1: Vec2,
}

impl HermiteSpline {
    pub fn new(p0: Vec2, t0: Vec2, p1: Vec2, t1: Vec2) -> Self {
        Self { p0, t0, p1, t1 }
    }

    pub fn eval(&self, alpha: f32) -> Vec2 {
        cubic_interp(self.p0, self.t0, self.p1, self.t1, alpha)
    }

    /// Closest polyline point to `point`, sampled with `steps` segments
    pub fn closest_point(&self, point: Vec2, steps: usize) -> (Vec2, f32) {
        sample_closest_point(point, self.p0, self.t0, self.p1, self.t1, steps)
    }

    /// Arc-length table for this curve
    pub fn reparam_table(&self) -> ReparamTable {
        ReparamTable::build(self.p0, self.t0, self.p1, self.t1)
    }

    /// Approximate direction of travel at `alpha`
    pub fn slope_at(&self, alpha: f32, epsilon: f32) -> Vec2 {
        self.eval(alpha + epsilon) - self.eval(alpha - epsilon)
    }
}

// ============================================================================
// Closest Point
// ============================================================================

/// Point on segment `a`-`b` closest to `point`
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let segment = b - a;
    let length_sq = segment.length_squared();
    if length_sq <= 0.0 {
        return a;
    }
    let t = ((point - a).dot(segment) / length_sq).clamp(0.0, 1.0);
    a + segment * t
}

/// Walk the spline as `steps` straight segments and return the closest
/// point to `point` along with its squared distance
///
/// Ties keep the earlier segment.
pub fn sample_closest_point(
    point: Vec2,
    p0: Vec2,
    t0: Vec2,
    p1: Vec2,
    t1: Vec2,
    steps: usize,
) -> (Vec2, f32) {
    let steps = steps.max(1);
    let mut previous = cubic_interp(p0, t0, p1, t1, 0.0);
    let mut closest = previous;
    let mut closest_distance_sq = f32::MAX;

    for step in 1..=steps {
        let alpha = step as f32 / steps as f32;
        let next = cubic_interp(p0, t0, p1, t1, alpha);
        let candidate = closest_point_on_segment(point, previous, next);
        let distance_sq = point.distance_squared_to(candidate);
        if distance_sq < closest_distance_sq {
            closest_distance_sq = distance_sq;
            closest = candidate;
        }
        previous = next;
    }

    (closest, closest_distance_sq)
}

// ============================================================================
// Arc-Length Reparameterization
// ============================================================================

/// Maps distance along a spline to the spline parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ReparamTable {
    /// (distance, alpha) keys with non-decreasing distance
    keys: Vec<(f32, f32)>,
}

impl ReparamTable {
    /// Sample the spline at [`REPARAM_STEPS`] evenly spaced parameters
    pub fn build(p0: Vec2, t0: Vec2, p1: Vec2, t1: Vec2) -> Self {
        let mut keys = Vec::with_capacity(REPARAM_STEPS);
        keys.push((0.0, 0.0));

        let step_size = 1.0 / (REPARAM_STEPS - 1) as f32;
        let mut previous = p0;
        let mut total = 0.0;
        for step in 1..REPARAM_STEPS {
            let alpha = step as f32 * step_size;
            let position = cubic_interp(p0, t0, p1, t1, alpha);
            total += position.distance_to(previous);
            previous = position;
            keys.push((total, alpha));
        }

        Self { keys }
    }

    /// Approximate arc length of the spline
    pub fn length(&self) -> f32 {
        self.keys.last().map_or(0.0, |&(distance, _)| distance)
    }

    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    /// Spline parameter at `distance` along the curve, clamped to the ends
    pub fn eval(&self, distance: f32) -> f32 {
        let Some(&(first_distance, first_alpha)) = self.keys.first() else {
            return 0.0;
        };
        if distance <= first_distance {
            return first_alpha;
        }

        for window in self.keys.windows(2) {
            let (d0, a0) = window[0];
            let (d1, a1) = window[1];
            if distance < d1 {
                let span = d1 - d0;
                if span <= 0.0 {
                    return a0;
                }
                return a0 + (a1 - a0) * ((distance - d0) / span);
            }
        }

        self.keys.last().map_or(0.0, |&(_, alpha)| alpha)
    }
}
