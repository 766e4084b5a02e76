//! Draw surface abstraction
//!
//! The drawing policy never talks to a renderer directly. It emits splines
//! and image boxes through `DrawSurface`; `DrawList` is the recording
//! implementation used by tests and the command-line tool.

use joint_core::{LinearColor, Size, Vec2};
use serde::{Deserialize, Serialize};

// ============================================================================
// Image Brushes
// ============================================================================

/// A named image with its natural size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBrush {
    pub name: String,
    pub size: Size,
}

impl ImageBrush {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            size: Size::new(width, height),
        }
    }

    /// The moving dots drawn along a wire
    pub fn bubble() -> Self {
        Self::new("Graph.ExecutionBubble", 8.0, 8.0)
    }

    /// Arrow head drawn at a wire's input end
    pub fn arrow() -> Self {
        Self::new("Graph.Arrow", 16.0, 16.0)
    }
}

// ============================================================================
// DrawSurface
// ============================================================================

/// Target for connection draw calls
pub trait DrawSurface {
    /// A cubic Hermite spline from `p0` to `p1`
    #[allow(clippy::too_many_arguments)]
    fn draw_spline(
        &mut self,
        layer: i32,
        p0: Vec2,
        t0: Vec2,
        p1: Vec2,
        t1: Vec2,
        thickness: f32,
        color: LinearColor,
    );

    /// An axis-aligned image with its top-left corner at `position`
    fn draw_box(
        &mut self,
        layer: i32,
        position: Vec2,
        size: Vec2,
        brush: &ImageBrush,
        color: LinearColor,
    );

    /// An image rotated by `angle` radians about its center
    #[allow(clippy::too_many_arguments)]
    fn draw_rotated_box(
        &mut self,
        layer: i32,
        position: Vec2,
        size: Vec2,
        brush: &ImageBrush,
        angle: f32,
        color: LinearColor,
    );
}

// ============================================================================
// DrawList
// ============================================================================

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawElement {
    Spline {
        layer: i32,
        p0: Vec2,
        t0: Vec2,
        p1: Vec2,
        t1: Vec2,
        thickness: f32,
        color: LinearColor,
    },
    Box {
        layer: i32,
        position: Vec2,
        size: Vec2,
        brush: String,
        color: LinearColor,
    },
    RotatedBox {
        layer: i32,
        position: Vec2,
        size: Vec2,
        brush: String,
        angle: f32,
        color: LinearColor,
    },
}

impl DrawElement {
    pub fn layer(&self) -> i32 {
        match self {
            DrawElement::Spline { layer, .. }
            | DrawElement::Box { layer, .. }
            | DrawElement::RotatedBox { layer, .. } => *layer,
        }
    }

    pub fn color(&self) -> LinearColor {
        match self {
            DrawElement::Spline { color, .. }
            | DrawElement::Box { color, .. }
            | DrawElement::RotatedBox { color, .. } => *color,
        }
    }
}

/// Element totals for a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawCounts {
    pub splines: usize,
    pub boxes: usize,
    pub rotated_boxes: usize,
}

/// A `DrawSurface` that records every call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    elements: Vec<DrawElement>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[DrawElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Recorded splines, in draw order
    pub fn splines(&self) -> impl Iterator<Item = &DrawElement> {
        self.elements
            .iter()
            .filter(|e| matches!(e, DrawElement::Spline { .. }))
    }

    pub fn counts(&self) -> DrawCounts {
        let mut counts = DrawCounts::default();
        for element in &self.elements {
            match element {
                DrawElement::Spline { .. } => counts.splines += 1,
                DrawElement::Box { .. } => counts.boxes += 1,
                DrawElement::RotatedBox { .. } => counts.rotated_boxes += 1,
            }
        }
        counts
    }
}

impl DrawSurface for DrawList {
    fn draw_spline(
        &mut self,
        layer: i32,
        p0: Vec2,
        t0: Vec2,
        p1: Vec2,
        t1: Vec2,
        thickness: f32,
        color: LinearColor,
    ) {
        self.elements.push(DrawElement::Spline {
            layer,
            p0,
            t0,
            p1,
            t1,
            thickness,
            color,
        });
    }

    fn draw_box(
        &mut self,
        layer: i32,
        position: Vec2,
        size: Vec2,
        brush: &ImageBrush,
        color: LinearColor,
    ) {
        self.elements.push(DrawElement::Box {
            layer,
            position,
            size,
            brush: brush.name.clone(),
            color,
        });
    }

    fn draw_rotated_box(
        &mut self,
        layer: i32,
        position: Vec2,
        size: Vec2,
        brush: &ImageBrush,
        angle: f32,
        color: LinearColor,
    ) {
        self.elements.push(DrawElement::RotatedBox {
            layer,
            position,
            size,
            brush: brush.name.clone(),
            angle,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        let brush = ImageBrush::arrow();
        list.draw_spline(
            1,
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 0.0),
            2.0,
            LinearColor::WHITE,
        );
        list.draw_box(2, Vec2::ZERO, Vec2::splat(4.0), &brush, LinearColor::WHITE);
        list.draw_rotated_box(3, Vec2::ZERO, Vec2::splat(4.0), &brush, 0.5, LinearColor::WHITE);

        assert_eq!(list.len(), 3);
        assert_eq!(list.elements()[1].layer(), 2);
        assert_eq!(
            list.counts(),
            DrawCounts {
                splines: 1,
                boxes: 1,
                rotated_boxes: 1
            }
        );
        assert_eq!(list.splines().count(), 1);
    }

    #[test]
    fn test_draw_element_json_is_tagged() {
        let element = DrawElement::Box {
            layer: 0,
            position: Vec2::ZERO,
            size: Vec2::splat(1.0),
            brush: "Graph.Arrow".to_string(),
            color: LinearColor::WHITE,
        };
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["kind"], "box");
        assert_eq!(json["brush"], "Graph.Arrow");
    }
}
