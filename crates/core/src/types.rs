//! Core types used throughout Joint wires
//!
//! Geometry primitives in screen (Slate-style) space: +X is right and +Y is
//! down, so "gravity" points along +Y.

use serde::{Deserialize, Serialize};

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Type alias for graph unique identifiers
pub type GraphId = uuid::Uuid;

/// Type alias for node unique identifiers
pub type NodeId = uuid::Uuid;

/// Type alias for pin unique identifiers
pub type PinId = uuid::Uuid;

// ============================================================================
// Tolerances
// ============================================================================

/// Tolerance for "nearly zero" checks on vectors and lengths
pub const KINDA_SMALL_NUMBER: f32 = 1.0e-4;

/// Tolerance below which a squared length is treated as zero
pub const SMALL_NUMBER: f32 = 1.0e-8;

// ============================================================================
// Geometry Types
// ============================================================================

/// 2D vector, used both for points on the canvas and for offsets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// The zero vector
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Unit vector pointing down the screen
    pub const DOWN: Vec2 = Vec2 { x: 0.0, y: 1.0 };

    /// Create a new vector
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a vector at the origin (0, 0)
    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Vector with both components set to `v`
    pub fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Calculate the Euclidean distance to another point
    pub fn distance_to(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    pub fn distance_squared_to(self, other: Vec2) -> f32 {
        (self - other).length_squared()
    }

    /// Unit vector in the same direction, or zero if the vector is too short
    pub fn safe_normal(self) -> Vec2 {
        let len_sq = self.length_squared();
        if len_sq > SMALL_NUMBER {
            self * (1.0 / len_sq.sqrt())
        } else {
            Vec2::ZERO
        }
    }

    /// The vector rotated a quarter turn: `(-y, x)`
    pub fn perpendicular(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Both components are within `tolerance` of zero
    pub fn is_nearly_zero(self, tolerance: f32) -> bool {
        self.x.abs() <= tolerance && self.y.abs() <= tolerance
    }

    /// Component-wise equality within `tolerance`
    pub fn equals(self, other: Vec2, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    /// Linear interpolation between two vectors
    pub fn lerp(self, other: Vec2, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Midpoint between two points
    pub fn midpoint(self, other: Vec2) -> Vec2 {
        (self + other) * 0.5
    }

    /// Angle of the vector in radians, measured from +X towards +Y
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Add an offset to this vector
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl std::ops::Mul<Vec2> for f32 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Size of an element on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a zero size
    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// Default size for a pin widget
    pub fn default_pin() -> Self {
        Self {
            width: 16.0,
            height: 16.0,
        }
    }

    /// Default size for a graph node
    pub fn default_node() -> Self {
        Self {
            width: 180.0,
            height: 96.0,
        }
    }

    /// Scale both dimensions
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Half extents as a vector
    pub fn half(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Both dimensions are larger than `tolerance`
    pub fn is_visible(&self, tolerance: f32) -> bool {
        self.width > tolerance && self.height > tolerance
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::default_pin()
    }
}

/// Axis-aligned rectangle, used for widget geometry and curve bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub position: Vec2,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(position: Vec2, size: Size) -> Self {
        Self { position, size }
    }

    /// Create a rectangle from coordinates and dimensions
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Smallest rectangle containing every point; `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Self {
            position: min,
            size: Size::new(max.x - min.x, max.y - min.y),
        })
    }

    pub fn min(&self) -> Vec2 {
        self.position
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(
            self.position.x + self.size.width,
            self.position.y + self.size.height,
        )
    }

    /// Check if a point is contained within this rectangle
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.size.width
            && point.y >= self.position.y
            && point.y <= self.position.y + self.size.height
    }

    /// Check if this rectangle intersects with another
    pub fn intersects(&self, other: &Rect) -> bool {
        self.position.x < other.position.x + other.size.width
            && self.position.x + self.size.width > other.position.x
            && self.position.y < other.position.y + other.size.height
            && self.position.y + self.size.height > other.position.y
    }

    /// Get the center point of the rectangle
    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.position.x + self.size.width / 2.0,
            y: self.position.y + self.size.height / 2.0,
        }
    }

    /// Midpoint of the left edge
    pub fn vertical_middle_left(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y + self.size.height / 2.0)
    }

    /// Midpoint of the right edge
    pub fn vertical_middle_right(&self) -> Vec2 {
        Vec2::new(
            self.position.x + self.size.width,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// Expand the rectangle by a uniform amount
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            position: Vec2::new(self.position.x - amount, self.position.y - amount),
            size: Size::new(
                self.size.width + amount * 2.0,
                self.size.height + amount * 2.0,
            ),
        }
    }

    /// Squared distance from a point to the rectangle; zero when inside
    pub fn squared_distance_to_point(&self, point: Vec2) -> f32 {
        let min = self.min();
        let max = self.max();
        let dx = if point.x < min.x {
            min.x - point.x
        } else if point.x > max.x {
            point.x - max.x
        } else {
            0.0
        };
        let dy = if point.y < min.y {
            min.y - point.y
        } else if point.y > max.y {
            point.y - max.y
        } else {
            0.0
        };
        dx * dx + dy * dy
    }

    /// Get the union of two rectangles (bounding box containing both)
    pub fn union(&self, other: &Rect) -> Self {
        let min_x = self.position.x.min(other.position.x);
        let min_y = self.position.y.min(other.position.y);
        let max_x = (self.position.x + self.size.width).max(other.position.x + other.size.width);
        let max_y = (self.position.y + self.size.height).max(other.position.y + other.size.height);

        Self {
            position: Vec2::new(min_x, min_y),
            size: Size::new(max_x - min_x, max_y - min_y),
        }
    }
}

// ============================================================================
// Colors
// ============================================================================

/// Linear-space RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LinearColor {
    pub const WHITE: LinearColor = LinearColor::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise linear interpolation, alpha included
    pub fn lerp(self, other: LinearColor, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl Default for LinearColor {
    fn default() -> Self {
        Self::WHITE
    }
}

// ============================================================================
// Scalar Helpers
// ============================================================================

/// Hermite smooth step of `x` between `a` and `b`, clamped to [0, 1]
pub fn smooth_step(a: f32, b: f32, x: f32) -> f32 {
    if x < a {
        return 0.0;
    }
    if x >= b {
        return 1.0;
    }
    let t = (x - a) / (b - a);
    t * t * (3.0 - 2.0 * t)
}

/// Scalar linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ============================================================================
// Tests
// ============================================================================
