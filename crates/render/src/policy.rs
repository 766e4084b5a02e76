//! Connection drawing policy
//!
//! Decides how every connection in a graph is drawn for one frame. Each link
//! is classified, styled, and handed to either the simulated wiggle renderer
//! or the static tangent renderer. Both renderers hit test the mouse and
//! record the nearest wire in a [`SplineOverlapResult`].
//!
//! A policy lives for a single frame. The simulators it drives are owned by
//! the caller's [`GraphWires`] and outlive it.

use crate::canvas::{DrawSurface, ImageBrush};
use crate::hit_test::{HoverThresholds, SplineOverlapResult};
use crate::identity::WireId;
use crate::registry::GraphWires;
use crate::settings::WireSettings;
use crate::spline::{HIT_TEST_STEPS, HermiteSpline, MAX_TANGENT_CONTRIBUTION, ReparamTable};
use joint_core::{
    JointError, JointResult, KINDA_SMALL_NUMBER, LinearColor, PinId, Rect, Vec2, smooth_step,
};
use joint_graph::{ConnectionCategory, EdGraph, HierarchyMap, PinDirection, PinGeometries};
use joint_wire::WiggleWireConfig;
use std::collections::HashSet;

// ============================================================================
// Constants
// ============================================================================

/// Horizontal nudge applied to a wire's start anchor, scaled by zoom
pub const START_FUDGE_X: f32 = -5.0;

/// Horizontal nudge applied to a wire's end anchor, scaled by zoom
pub const END_FUDGE_X: f32 = 1.5;

/// Distance between bubbles along a wire at zoom 1
pub const BUBBLE_SPACING: f32 = 64.0;

/// Bubble travel speed in units per second at zoom 1
pub const BUBBLE_SPEED: f32 = 192.0;

/// Bubble size per unit of wire thickness, relative to the bubble image
const BUBBLE_SIZE_SCALE: f32 = 0.2;

/// Alpha of connections in a category that is switched off
const HIDDEN_CONNECTION_ALPHA: f32 = 0.1;

const WIGGLE_CONTROL_POINT_FRACTION: f32 = 1.0 / 3.0;

// ============================================================================
// Frame Inputs
// ============================================================================

/// Per-frame input from the host editor
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    /// Seconds since the previous frame
    pub delta_time: f32,

    /// Seconds since the application started
    pub app_time: f64,

    /// Mouse position in the same space as pin geometry
    pub mouse: Vec2,

    pub zoom: f32,

    /// Display scale of the application window
    pub app_scale: f32,

    /// Pins under or attached to the hovered element
    pub hovered_pins: HashSet<PinId>,

    /// `app_time` of the last hover change
    pub last_hover_time: f64,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            delta_time: 1.0 / 60.0,
            app_time: 0.0,
            mouse: Vec2::ZERO,
            zoom: 1.0,
            app_scale: 1.0,
            hovered_pins: HashSet::new(),
            last_hover_time: 0.0,
        }
    }
}

impl FrameContext {
    pub fn new(delta_time: f32, app_time: f64) -> Self {
        Self {
            delta_time,
            app_time,
            ..Self::default()
        }
    }

    pub fn with_mouse(mut self, mouse: Vec2) -> Self {
        self.mouse = mouse;
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Hover `pins`, starting at `since`
    pub fn with_hover(mut self, pins: impl IntoIterator<Item = PinId>, since: f64) -> Self {
        self.hovered_pins = pins.into_iter().collect();
        self.last_hover_time = since;
        self
    }
}

/// Style and identity of one connection being drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionParams {
    pub output_pin: Option<PinId>,
    pub input_pin: Option<PinId>,
    pub category: ConnectionCategory,
    pub color: LinearColor,
    pub thickness: f32,
    pub draw_bubbles: bool,
    pub start_direction: PinDirection,
    pub end_direction: PinDirection,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            output_pin: None,
            input_pin: None,
            category: ConnectionCategory::Preview,
            color: LinearColor::WHITE,
            thickness: 1.0,
            draw_bubbles: false,
            start_direction: PinDirection::Output,
            end_direction: PinDirection::Input,
        }
    }
}

impl ConnectionParams {
    pub fn wire_id(&self) -> WireId {
        WireId::new(self.output_pin, self.input_pin)
    }
}

/// Images drawn on top of connections; a missing image is skipped
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationImages {
    pub arrow: Option<ImageBrush>,
    pub bubble: Option<ImageBrush>,
    pub midpoint: Option<ImageBrush>,
}

impl Default for DecorationImages {
    fn default() -> Self {
        Self {
            arrow: Some(ImageBrush::arrow()),
            bubble: Some(ImageBrush::bubble()),
            midpoint: None,
        }
    }
}

// ============================================================================
// ConnectionDrawingPolicy
// ============================================================================

/// Draws the connections of one graph for one frame
pub struct ConnectionDrawingPolicy<'a, S: DrawSurface> {
    settings: &'a WireSettings,
    wires: &'a mut GraphWires,
    surface: &'a mut S,
    frame: FrameContext,
    wire_layer: i32,
    arrow_layer: i32,
    images: DecorationImages,
    hierarchy: HierarchyMap,
    overlap: SplineOverlapResult,
}

impl<'a, S: DrawSurface> ConnectionDrawingPolicy<'a, S> {
    pub fn new(
        settings: &'a WireSettings,
        wires: &'a mut GraphWires,
        surface: &'a mut S,
        frame: FrameContext,
    ) -> Self {
        Self {
            settings,
            wires,
            surface,
            frame,
            wire_layer: 0,
            arrow_layer: 1,
            images: DecorationImages::default(),
            hierarchy: HierarchyMap::default(),
            overlap: SplineOverlapResult::default(),
        }
    }

    /// Layers for wires and arrow heads; bubbles on wiggle wires go one above
    /// the wire layer
    pub fn with_layers(mut self, wire_layer: i32, arrow_layer: i32) -> Self {
        self.wire_layer = wire_layer;
        self.arrow_layer = arrow_layer;
        self
    }

    pub fn with_images(mut self, images: DecorationImages) -> Self {
        self.images = images;
        self
    }

    pub fn frame(&self) -> &FrameContext {
        &self.frame
    }

    /// Nearest wire under the mouse so far this frame
    pub fn overlap_result(&self) -> &SplineOverlapResult {
        &self.overlap
    }

    pub fn into_overlap_result(self) -> SplineOverlapResult {
        self.overlap
    }

    /// Wake every simulator after the view was panned or zoomed
    pub fn notify_view_changed(&mut self) {
        self.wires.notify_view_changed();
    }

    fn arrow_radius(&self) -> Vec2 {
        image_radius(self.images.arrow.as_ref(), self.frame.zoom)
    }

    fn midpoint_radius(&self) -> Vec2 {
        image_radius(self.images.midpoint.as_ref(), self.frame.zoom)
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Draw every link of `graph` whose pins both have geometry
    ///
    /// Prunes dead simulators and rebuilds the hierarchy first. Returns the
    /// number of links drawn.
    pub fn draw(&mut self, graph: &EdGraph, pin_geometries: &PinGeometries) -> usize {
        self.wires
            .prune_dead_simulators(self.frame.delta_time, graph);
        self.hierarchy = graph.hierarchy();

        let mut drawn = 0;
        for link in graph.links() {
            let (Some(start), Some(end)) =
                (pin_geometries.get(&link.from), pin_geometries.get(&link.to))
            else {
                continue;
            };
            let params = self.determine_wiring_style(graph, Some(link.from), Some(link.to));
            self.draw_spline_with_arrow(*start, *end, &params);
            drawn += 1;
        }
        drawn
    }

    // ========================================================================
    // Styling
    // ========================================================================

    /// Colour and thickness for the connection between two pins
    pub fn determine_wiring_style(
        &self,
        graph: &EdGraph,
        output: Option<PinId>,
        input: Option<PinId>,
    ) -> ConnectionParams {
        let settings = self.settings;
        let category = graph.classify(&self.hierarchy, output, input);
        let reachable = output
            .and_then(|pin| graph.owning_node(pin))
            .is_some_and(|node| self.hierarchy.contains(node.id));

        let mut color = settings.color(category);
        match category {
            ConnectionCategory::Normal | ConnectionCategory::Recursive => {
                if !settings.draws_category(category) {
                    color.a = HIDDEN_CONNECTION_ALPHA;
                } else if !reachable {
                    color.a = settings.not_reachable_route_connection_opacity;
                }
            }
            ConnectionCategory::SelfLink => {
                if !reachable {
                    color.a = settings.not_reachable_route_connection_opacity;
                }
            }
            ConnectionCategory::Preview => {}
        }

        let mut params = ConnectionParams {
            output_pin: output,
            input_pin: input,
            category,
            color,
            thickness: settings.pin_connection_thickness,
            ..ConnectionParams::default()
        };

        // Hover fading misbehaves on wires that follow the mouse
        if category != ConnectionCategory::Preview && !self.frame.hovered_pins.is_empty() {
            self.apply_hover_deemphasis(&mut params);
        }
        params
    }

    /// Fade towards the highlight when the wire is hovered, away from it when
    /// something else is
    pub fn apply_hover_deemphasis(&self, params: &mut ConnectionParams) {
        let settings = self.settings;
        let since_hover = (self.frame.app_time - self.frame.last_hover_time) as f32
            - settings.connection_highlight_fade_bias;
        let t = smooth_step(0.0, settings.connection_highlighted_fade_in_period, since_hover);

        let hovered = |pin: Option<PinId>| pin.is_some_and(|p| self.frame.hovered_pins.contains(&p));
        let emphasize = (hovered(params.output_pin) && hovered(params.input_pin))
            || (hovered(params.output_pin) && params.input_pin.is_none());

        if emphasize {
            params.thickness = joint_core::lerp(
                settings.pin_connection_thickness,
                settings.highlighted_pin_connection_thickness,
                t,
            );
            params.color = params
                .color
                .lerp(settings.highlighted_connection_color, t);
        } else {
            let target = params
                .color
                .with_alpha(settings.not_highlighted_connection_opacity);
            params.color = params.color.lerp(target, t);
        }
    }

    // ========================================================================
    // Anchors and Arrows
    // ========================================================================

    /// Draw a connection between two pin widgets, with an arrow at the input
    pub fn draw_spline_with_arrow(
        &mut self,
        start_geometry: Rect,
        end_geometry: Rect,
        params: &ConnectionParams,
    ) {
        let zoom = self.frame.zoom;
        let start = start_geometry.vertical_middle_left() - Vec2::new(START_FUDGE_X * zoom, 0.0);
        let end = end_geometry.vertical_middle_right()
            - Vec2::new(self.arrow_radius().x - END_FUDGE_X * zoom, 0.0);
        self.draw_spline_with_arrow_points(start, end, params);
    }

    /// Draw a connection between two anchor points, with an arrow at `end`
    pub fn draw_spline_with_arrow_points(
        &mut self,
        start: Vec2,
        end: Vec2,
        params: &ConnectionParams,
    ) {
        self.draw_connection(self.wire_layer, start, end, params);

        let Some(arrow) = self.images.arrow.clone() else {
            return;
        };
        let delta = end - start;
        let angle = delta.y.atan2(delta.x);
        let position = end - self.arrow_radius();
        let size = arrow.size.as_vec2() * self.frame.zoom;
        self.surface
            .draw_rotated_box(self.arrow_layer, position, size, &arrow, angle, params.color);
    }

    /// Draw the wire being dragged out of `pin`
    ///
    /// From an output pin the wire runs to `end_point`; from an input pin it
    /// runs back from `start_point`.
    pub fn draw_preview_connector(
        &mut self,
        graph: &EdGraph,
        pin: PinId,
        pin_geometry: Rect,
        start_point: Vec2,
        end_point: Vec2,
    ) -> JointResult<()> {
        let direction = graph
            .get_pin(pin)
            .map(|p| p.direction)
            .ok_or_else(|| JointError::PinNotFound(pin.to_string()))?;

        let mut params = self.determine_wiring_style(graph, None, Some(pin));
        params.draw_bubbles = true;

        let zoom = self.frame.zoom;
        let (start, end) = match direction {
            PinDirection::Output => (
                pin_geometry.vertical_middle_left() - Vec2::new(START_FUDGE_X * zoom, 0.0),
                end_point,
            ),
            PinDirection::Input => (
                pin_geometry.vertical_middle_right()
                    - Vec2::new(self.arrow_radius().x + END_FUDGE_X * zoom, 0.0),
                start_point,
            ),
        };
        self.draw_connection(self.wire_layer, start, end, &params);
        Ok(())
    }

    // ========================================================================
    // Renderers
    // ========================================================================

    /// Pick the wiggle or tangent renderer for the connection's category
    pub fn draw_connection(&mut self, layer: i32, start: Vec2, end: Vec2, params: &ConnectionParams) {
        if self.settings.use_wiggle(params.category) {
            let config = *self.settings.config(params.category);
            self.draw_wiggle_connection(layer, start, end, params, &config);
        } else {
            self.draw_tangent_connection(layer, start, end, params);
        }
    }

    /// Static tangent for a connection, from the forward, backward or self
    /// spline settings
    pub fn compute_spline_tangent(&self, start: Vec2, end: Vec2, params: &ConnectionParams) -> Vec2 {
        let delta = end - start;
        let spline = if params.category == ConnectionCategory::SelfLink {
            &self.settings.self_spline
        } else if delta.x >= 0.0 {
            &self.settings.forward_spline
        } else {
            &self.settings.backward_spline
        };

        // Forward and backward curves clamp both axes by the horizontal range
        let vertical_range = if params.category == ConnectionCategory::SelfLink {
            spline.vertical_delta_range
        } else {
            spline.horizontal_delta_range
        };
        let tension_x = delta.x.abs().min(spline.horizontal_delta_range);
        let tension_y = delta.y.abs().min(vertical_range);
        spline.tangent(tension_x, tension_y)
    }

    /// Draw a connection whose shape comes from fixed tangent settings
    pub fn draw_tangent_connection(
        &mut self,
        layer: i32,
        start: Vec2,
        end: Vec2,
        params: &ConnectionParams,
    ) {
        let tangent = self.compute_spline_tangent(start, end, params);
        let p0_tangent = match params.start_direction {
            PinDirection::Output => tangent,
            PinDirection::Input => -tangent,
        };
        let p1_tangent = match params.end_direction {
            PinDirection::Input => tangent,
            PinDirection::Output => -tangent,
        };
        let spline = HermiteSpline::new(start, p0_tangent, end, p1_tangent);

        if self.settings.treat_splines_like_pins {
            let thresholds = HoverThresholds::new(
                self.settings.spline_hover_tolerance,
                self.settings.spline_close_tolerance,
                params.thickness,
            );
            let bounds = Rect::from_points([
                start,
                start + p0_tangent * MAX_TANGENT_CONTRIBUTION,
                end,
                end - p1_tangent * MAX_TANGENT_CONTRIBUTION,
            ]);
            let near = bounds.is_some_and(|b| {
                b.squared_distance_to_point(self.frame.mouse) < thresholds.trigger_squared
            });

            if near {
                let (closest, distance_sq) = spline.closest_point(self.frame.mouse, HIT_TEST_STEPS);
                if distance_sq < thresholds.trigger_squared {
                    self.record_overlap(params, &spline, closest, distance_sq, false);
                }
            }
        }

        self.surface.draw_spline(
            layer,
            start,
            p0_tangent,
            end,
            p1_tangent,
            params.thickness,
            params.color,
        );

        let has_bubbles = params.draw_bubbles && self.images.bubble.is_some();
        if !has_bubbles && self.images.midpoint.is_none() {
            return;
        }
        let table = spline.reparam_table();
        let zoom = self.frame.zoom;

        if has_bubbles {
            if let Some(bubble) = self.images.bubble.clone() {
                let size = bubble.size.as_vec2() * (zoom * BUBBLE_SIZE_SCALE * params.thickness);
                self.draw_bubbles(
                    layer,
                    &spline,
                    &table,
                    &bubble,
                    size,
                    BUBBLE_SPACING * zoom,
                    BUBBLE_SPEED * zoom,
                    params.color,
                );
            }
        }

        if let Some(midpoint_image) = self.images.midpoint.clone() {
            let alpha = table.eval(table.length() * 0.5);
            let midpoint = spline.eval(alpha);
            let slope = spline.slope_at(alpha, KINDA_SMALL_NUMBER);
            let angle = if slope.is_nearly_zero(KINDA_SMALL_NUMBER) {
                0.0
            } else {
                slope.y.atan2(slope.x)
            };
            let position = midpoint - self.midpoint_radius();
            let size = midpoint_image.size.as_vec2() * zoom;
            self.surface
                .draw_rotated_box(layer, position, size, &midpoint_image, angle, params.color);
        }
    }

    /// Draw a connection whose sag comes from its spring simulator
    ///
    /// Falls back to the tangent renderer when no simulator can be had.
    pub fn draw_wiggle_connection(
        &mut self,
        layer: i32,
        start: Vec2,
        end: Vec2,
        params: &ConnectionParams,
        config: &WiggleWireConfig,
    ) {
        let id = params.wire_id();
        let delta_time = self.frame.delta_time;
        let center = match self.wires.get_or_add_simulator(id) {
            Some(simulator) => {
                simulator.update(start, end, config, delta_time);
                simulator.visual_center(start, end)
            }
            None => {
                tracing::error!(
                    wire = %id,
                    limit = self.wires.capacity_limit(),
                    "No wire simulator available, drawing a static connection"
                );
                self.draw_tangent_connection(layer, start, end, params);
                return;
            }
        };

        let p0_tangent = (center - start) * config.tangent_factor;
        let p1_tangent = (end - center) * config.tangent_factor;
        let spline = HermiteSpline::new(start, p0_tangent, end, p1_tangent);

        let thresholds = HoverThresholds::new(
            self.settings.spline_hover_tolerance,
            self.settings.spline_close_tolerance,
            params.thickness,
        );
        let bounds = Rect::from_points([
            start,
            start + p0_tangent * WIGGLE_CONTROL_POINT_FRACTION,
            end,
            end - p1_tangent * WIGGLE_CONTROL_POINT_FRACTION,
        ]);
        let near = bounds.is_some_and(|b| {
            b.squared_distance_to_point(self.frame.mouse) < thresholds.close_squared
        });
        if near {
            let (closest, distance_sq) = spline.closest_point(self.frame.mouse, HIT_TEST_STEPS);
            if distance_sq < thresholds.trigger_squared {
                self.record_overlap(params, &spline, closest, distance_sq, true);
            } else if distance_sq < thresholds.close_squared {
                self.overlap.set_close_to_spline(true);
            }
        }

        self.surface.draw_spline(
            layer,
            start,
            p0_tangent,
            end,
            p1_tangent,
            params.thickness,
            params.color,
        );

        if !params.draw_bubbles {
            return;
        }
        let Some(bubble) = self.images.bubble.clone() else {
            return;
        };
        let scale = self.frame.zoom * self.frame.app_scale;
        let size = bubble.size.as_vec2() * (scale * BUBBLE_SIZE_SCALE * params.thickness);
        if size.x <= KINDA_SMALL_NUMBER || size.y <= KINDA_SMALL_NUMBER {
            return;
        }
        let table = spline.reparam_table();
        if table.length() <= 1.0 {
            return;
        }
        self.draw_bubbles(
            layer + 1,
            &spline,
            &table,
            &bubble,
            size,
            BUBBLE_SPACING * scale,
            BUBBLE_SPEED * scale,
            params.color,
        );
    }

    fn record_overlap(
        &mut self,
        params: &ConnectionParams,
        spline: &HermiteSpline,
        closest: Vec2,
        distance_sq: f32,
        close_to_spline: bool,
    ) {
        let to_pin1 = match params.output_pin {
            Some(_) => spline.p0.distance_squared_to(closest),
            None => f32::MAX,
        };
        let to_pin2 = match params.input_pin {
            Some(_) => spline.p1.distance_squared_to(closest),
            None => f32::MAX,
        };
        self.overlap.offer(SplineOverlapResult::new(
            params.output_pin,
            params.input_pin,
            distance_sq,
            to_pin1,
            to_pin2,
            close_to_spline,
        ));
    }

    /// Bubbles spaced evenly by arc length, scrolling along the wire over time
    #[allow(clippy::too_many_arguments)]
    fn draw_bubbles(
        &mut self,
        layer: i32,
        spline: &HermiteSpline,
        table: &ReparamTable,
        brush: &ImageBrush,
        size: Vec2,
        spacing: f32,
        speed: f32,
        color: LinearColor,
    ) {
        if spacing <= 0.0 {
            return;
        }
        let length = table.length();
        let offset = (self.frame.app_time * f64::from(speed)).rem_euclid(f64::from(spacing)) as f32;
        let count = (length / spacing).ceil() as usize;

        for i in 0..count {
            let distance = i as f32 * spacing + offset;
            if distance >= length {
                continue;
            }
            let position = spline.eval(table.eval(distance)) - size * 0.5;
            self.surface.draw_box(layer, position, size, brush, color);
        }
    }
}

fn image_radius(image: Option<&ImageBrush>, zoom: f32) -> Vec2 {
    image.map_or(Vec2::ZERO, |brush| brush.size.as_vec2() * zoom * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawElement, DrawList};
    use joint_graph::{GraphNode, Pin};
    use pretty_assertions::assert_eq;

    /// Manager -> Line -> Line2, plus a self link on Line and an orphan node
    struct Fixture {
        graph: EdGraph,
        root_out: PinId,
        line_in: PinId,
        line_out: PinId,
        line2_in: PinId,
        orphan_out: PinId,
    }

    fn fixture() -> Fixture {
        let mut graph = EdGraph::new("Test");
        let root = graph.add_node(GraphNode::manager("Root").at(0.0, 0.0));
        let line = graph.add_node(GraphNode::fragment("Line").at(300.0, 0.0));
        let line2 = graph.add_node(GraphNode::fragment("Line2").at(600.0, 0.0));
        let orphan = graph.add_node(GraphNode::fragment("Orphan").at(0.0, 300.0));

        let root_out = graph.add_pin(Pin::output(root, "Out")).unwrap();
        let line_in = graph.add_pin(Pin::input(line, "In")).unwrap();
        let line_out = graph.add_pin(Pin::output(line, "Out")).unwrap();
        let line2_in = graph.add_pin(Pin::input(line2, "In")).unwrap();
        let orphan_out = graph.add_pin(Pin::output(orphan, "Out")).unwrap();

        graph.link(root_out, line_in).unwrap();
        graph.link(line_out, line2_in).unwrap();
        graph.link(line_out, line_in).unwrap();
        graph.link(orphan_out, line2_in).unwrap();

        Fixture {
            graph,
            root_out,
            line_in,
            line_out,
            line2_in,
            orphan_out,
        }
    }

    fn style(
        settings: &WireSettings,
        frame: FrameContext,
        f: &Fixture,
        output: Option<PinId>,
        input: Option<PinId>,
    ) -> ConnectionParams {
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();
        let mut policy = ConnectionDrawingPolicy::new(settings, &mut wires, &mut list, frame);
        policy.hierarchy = f.graph.hierarchy();
        policy.determine_wiring_style(&f.graph, output, input)
    }

    fn straight_params(output: PinId, input: PinId, thickness: f32) -> ConnectionParams {
        ConnectionParams {
            output_pin: Some(output),
            input_pin: Some(input),
            category: ConnectionCategory::Normal,
            thickness,
            ..ConnectionParams::default()
        }
    }

    #[test]
    fn test_style_per_category() {
        let f = fixture();
        let settings = WireSettings::default();
        let frame = FrameContext::default();

        let normal = style(&settings, frame.clone(), &f, Some(f.root_out), Some(f.line_in));
        assert_eq!(normal.category, ConnectionCategory::Normal);
        assert_eq!(normal.color, settings.normal_connection_color);
        assert_eq!(normal.thickness, settings.pin_connection_thickness);

        let self_link = style(&settings, frame.clone(), &f, Some(f.line_out), Some(f.line_in));
        assert_eq!(self_link.category, ConnectionCategory::SelfLink);
        assert_eq!(self_link.color, settings.self_connection_color);

        let preview = style(&settings, frame, &f, None, Some(f.line_in));
        assert_eq!(preview.category, ConnectionCategory::Preview);
        assert_eq!(preview.color, settings.preview_connection_color);
    }

    #[test]
    fn test_unreachable_and_hidden_opacity() {
        let f = fixture();
        let mut settings = WireSettings::default();
        settings.not_reachable_route_connection_opacity = 0.3;

        let orphan = style(&settings, FrameContext::default(), &f, Some(f.orphan_out), Some(f.line2_in));
        assert_eq!(orphan.color.a, 0.3);

        settings.draw_normal_connection = false;
        let hidden = style(&settings, FrameContext::default(), &f, Some(f.orphan_out), Some(f.line2_in));
        assert_eq!(hidden.color.a, HIDDEN_CONNECTION_ALPHA);
    }

    #[test]
    fn test_hover_emphasis_and_deemphasis() {
        let f = fixture();
        let settings = WireSettings::default();
        // Long after the hover started, the fade is complete
        let frame = FrameContext::new(1.0 / 60.0, 10.0).with_hover([f.root_out, f.line_in], 0.0);

        let hovered = style(&settings, frame.clone(), &f, Some(f.root_out), Some(f.line_in));
        let target = settings.highlighted_connection_color;
        assert_eq!(hovered.thickness, settings.highlighted_pin_connection_thickness);
        assert!((hovered.color.r - target.r).abs() < 1.0e-6);
        assert!((hovered.color.g - target.g).abs() < 1.0e-6);
        assert!((hovered.color.b - target.b).abs() < 1.0e-6);

        let other = style(&settings, frame.clone(), &f, Some(f.line_out), Some(f.line2_in));
        assert_eq!(other.thickness, settings.pin_connection_thickness);
        assert!((other.color.a - settings.not_highlighted_connection_opacity).abs() < 1.0e-6);

        let preview = style(&settings, frame, &f, None, Some(f.line2_in));
        assert_eq!(preview.color, settings.preview_connection_color);
    }

    #[test]
    fn test_hover_fade_waits_for_bias() {
        let f = fixture();
        let settings = WireSettings::default();
        let frame = FrameContext::new(1.0 / 60.0, 0.1).with_hover([f.root_out], 0.0);

        let other = style(&settings, frame, &f, Some(f.line_out), Some(f.line2_in));
        assert_eq!(other.color, settings.normal_connection_color);
    }

    #[test]
    fn test_spline_tangent_selection() {
        let settings = WireSettings::default();
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();
        let policy =
            ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, FrameContext::default());
        let params = ConnectionParams::default();

        let forward = policy.compute_spline_tangent(Vec2::ZERO, Vec2::new(300.0, 50.0), &params);
        assert_eq!(forward, Vec2::new(600.0, 0.0));

        let backward = policy.compute_spline_tangent(Vec2::ZERO, Vec2::new(-300.0, 50.0), &params);
        assert_eq!(backward, Vec2::new(400.0, 0.0));

        let self_params = ConnectionParams {
            category: ConnectionCategory::SelfLink,
            ..params
        };
        let looped = policy.compute_spline_tangent(Vec2::ZERO, Vec2::new(-50.0, 20.0), &self_params);
        assert_eq!(looped, Vec2::new(200.0, 280.0));
    }

    #[test]
    fn test_draw_emits_spline_and_arrow_per_link() {
        let f = fixture();
        let settings = WireSettings::default();
        let geometries = f.graph.pin_geometries();
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();

        let drawn = {
            let mut policy =
                ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, FrameContext::default());
            policy.draw(&f.graph, &geometries)
        };

        assert_eq!(drawn, 4);
        let counts = list.counts();
        assert_eq!(counts.splines, 4);
        assert_eq!(counts.rotated_boxes, 4);
        assert_eq!(counts.boxes, 0);
        // Links only use static curves by default
        assert!(wires.is_empty());
    }

    #[test]
    fn test_draw_anchors_use_fudge() {
        let f = fixture();
        let settings = WireSettings::default();
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();
        let start_geometry = Rect::from_xywh(100.0, 100.0, 16.0, 16.0);
        let end_geometry = Rect::from_xywh(400.0, 100.0, 16.0, 16.0);

        {
            let mut policy =
                ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, FrameContext::default());
            let params = straight_params(f.root_out, f.line_in, 5.0);
            policy.draw_spline_with_arrow(start_geometry, end_geometry, &params);
        }

        let DrawElement::Spline { p0, p1, .. } = list.elements()[0].clone() else {
            panic!("expected a spline first");
        };
        assert_eq!(p0, Vec2::new(105.0, 108.0));
        assert_eq!(p1, Vec2::new(416.0 - 6.5, 108.0));

        let DrawElement::RotatedBox { layer, position, angle, .. } = list.elements()[1].clone()
        else {
            panic!("expected an arrow");
        };
        assert_eq!(layer, 1);
        assert_eq!(position, p1 - Vec2::splat(8.0));
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_hover_nearest_wins_in_any_order() {
        let f = fixture();
        let settings = WireSettings::default();
        let frame = FrameContext::default().with_mouse(Vec2::new(100.0, 2.5));
        let low = straight_params(f.root_out, f.line_in, 5.0);
        let high = straight_params(f.line_out, f.line2_in, 5.0);

        for order in [[low, high], [high, low]] {
            let mut wires = GraphWires::new();
            let mut list = DrawList::new();
            let mut policy =
                ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, frame.clone());
            for params in &order {
                let y = if params.output_pin == Some(f.root_out) { 0.0 } else { 3.0 };
                policy.draw_tangent_connection(0, Vec2::new(0.0, y), Vec2::new(200.0, y), params);
            }

            let result = policy.into_overlap_result();
            assert!(result.is_valid());
            assert_eq!(result.pin1, Some(f.line_out));
            assert_eq!(result.pin2, Some(f.line2_in));
            assert!(!result.close_to_spline);
            assert!(result.distance_squared < 0.5);
        }
    }

    #[test]
    fn test_tangent_hit_test_can_be_disabled() {
        let f = fixture();
        let mut settings = WireSettings::default();
        settings.treat_splines_like_pins = false;
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();
        let frame = FrameContext::default().with_mouse(Vec2::new(100.0, 0.0));
        let mut policy = ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, frame);

        let params = straight_params(f.root_out, f.line_in, 5.0);
        policy.draw_tangent_connection(0, Vec2::ZERO, Vec2::new(200.0, 0.0), &params);
        assert!(!policy.overlap_result().is_valid());
    }

    #[test]
    fn test_wiggle_reuses_simulator() {
        let f = fixture();
        let settings = WireSettings::default().with_wiggle_everywhere(true);
        let geometries = f.graph.pin_geometries();
        let mut wires = GraphWires::new();

        for frame in 0..3 {
            let mut list = DrawList::new();
            let context = FrameContext::new(1.0 / 60.0, frame as f64 / 60.0);
            let mut policy = ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, context);
            assert_eq!(policy.draw(&f.graph, &geometries), 4);
        }
        assert_eq!(wires.len(), 4);
        assert!(wires.contains(&WireId::linked(f.root_out, f.line_in)));
    }

    #[test]
    fn test_wiggle_falls_back_when_capacity_exhausted() {
        let f = fixture();
        let settings = WireSettings::default().with_wiggle_everywhere(true);
        let mut wires = GraphWires::with_capacity_limit(0);
        let mut list = DrawList::new();

        {
            let mut policy =
                ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, FrameContext::default());
            let params = straight_params(f.root_out, f.line_in, 5.0);
            policy.draw_connection(0, Vec2::ZERO, Vec2::new(200.0, 0.0), &params);
        }

        assert!(wires.is_empty());
        assert_eq!(list.counts().splines, 1);
        // Static tangent, not one derived from a simulated center
        let DrawElement::Spline { t0, .. } = list.elements()[0].clone() else {
            panic!("expected a spline");
        };
        assert_eq!(t0, Vec2::new(400.0, 0.0));
    }

    #[test]
    fn test_wiggle_marks_close_to_spline() {
        let f = fixture();
        let settings = WireSettings::default().with_wiggle_everywhere(true);
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();
        // No time passes, so the wire stays a straight line on its chord
        let frame = FrameContext::new(0.0, 0.0).with_mouse(Vec2::new(100.0, -10.0));
        let mut policy = ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, frame);

        let params = straight_params(f.root_out, f.line_in, 5.0);
        let config = *settings.config(ConnectionCategory::Normal);
        policy.draw_wiggle_connection(0, Vec2::ZERO, Vec2::new(200.0, 0.0), &params, &config);

        let result = *policy.overlap_result();
        assert!(result.close_to_spline);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_wiggle_hit_records_close_flag() {
        let f = fixture();
        let settings = WireSettings::default().with_wiggle_everywhere(true);
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();
        let frame = FrameContext::new(0.0, 0.0).with_mouse(Vec2::new(50.0, 1.0));
        let mut policy = ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, frame);

        let params = straight_params(f.root_out, f.line_in, 5.0);
        let config = *settings.config(ConnectionCategory::Normal);
        policy.draw_wiggle_connection(0, Vec2::ZERO, Vec2::new(200.0, 0.0), &params, &config);

        let result = *policy.overlap_result();
        assert!(result.is_valid());
        assert!(result.close_to_spline);
        assert_eq!(result.best_pin(), Some(f.root_out));
    }

    #[test]
    fn test_preview_connector_draws_bubbles_above_wire() {
        let f = fixture();
        let settings = WireSettings::default();
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();
        let pin_geometry = f.graph.pin_geometry(f.root_out).unwrap();

        {
            let mut policy =
                ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, FrameContext::default());
            policy
                .draw_preview_connector(
                    &f.graph,
                    f.root_out,
                    pin_geometry,
                    Vec2::ZERO,
                    Vec2::new(400.0, 200.0),
                )
                .unwrap();
        }

        assert_eq!(list.counts().splines, 1);
        assert!(list.counts().boxes > 0);
        assert!(list
            .elements()
            .iter()
            .filter(|e| matches!(e, DrawElement::Box { .. }))
            .all(|e| e.layer() == 1));
        assert!(wires.contains(&WireId::new(None, Some(f.root_out))));
    }

    #[test]
    fn test_preview_connector_unknown_pin() {
        let f = fixture();
        let settings = WireSettings::default();
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();
        let mut policy =
            ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, FrameContext::default());

        let err = policy
            .draw_preview_connector(
                &f.graph,
                uuid::Uuid::new_v4(),
                Rect::from_xywh(0.0, 0.0, 16.0, 16.0),
                Vec2::ZERO,
                Vec2::ZERO,
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_midpoint_image_is_rotated_to_slope() {
        let f = fixture();
        let settings = WireSettings::default();
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();

        {
            let images = DecorationImages {
                midpoint: Some(ImageBrush::new("Graph.Midpoint", 10.0, 10.0)),
                ..DecorationImages::default()
            };
            let mut policy =
                ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, FrameContext::default())
                    .with_images(images);
            let params = straight_params(f.root_out, f.line_in, 5.0);
            policy.draw_tangent_connection(0, Vec2::ZERO, Vec2::new(200.0, 0.0), &params);
        }

        let DrawElement::RotatedBox { position, angle, brush, .. } = list.elements()[1].clone()
        else {
            panic!("expected the midpoint image");
        };
        assert_eq!(brush, "Graph.Midpoint");
        assert!(angle.abs() < 1.0e-4);
        assert!((position.x - 95.0).abs() < 1.0);
        assert!((position.y + 5.0).abs() < 1.0e-3);
    }

    #[test]
    fn test_bubbles_stay_on_the_wire() {
        let f = fixture();
        let settings = WireSettings::default();
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();
        let frame = FrameContext::new(1.0 / 60.0, 0.25);

        {
            let mut policy = ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, frame);
            let params = ConnectionParams {
                draw_bubbles: true,
                ..straight_params(f.root_out, f.line_in, 5.0)
            };
            policy.draw_tangent_connection(0, Vec2::ZERO, Vec2::new(200.0, 0.0), &params);
        }

        // Four slots at 64 spacing, scrolled by 0.25 s * 192 = 48, so the
        // last one lands past the end of the wire
        assert_eq!(list.counts().boxes, 3);
        for element in list.elements() {
            if let DrawElement::Box { position, size, .. } = element {
                assert!(size.equals(Vec2::splat(8.0), 1.0e-4));
                let center = *position + *size * 0.5;
                assert!(center.x >= 0.0 && center.x <= 200.0);
                assert!(center.y.abs() < 1.0e-3);
            }
        }
    }

    fn draw_wiggle_with_bubbles(
        images: DecorationImages,
        start: Vec2,
        end: Vec2,
    ) -> crate::canvas::DrawCounts {
        let f = fixture();
        let settings = WireSettings::default().with_wiggle_everywhere(true);
        let mut wires = GraphWires::new();
        let mut list = DrawList::new();

        {
            let mut policy =
                ConnectionDrawingPolicy::new(&settings, &mut wires, &mut list, FrameContext::default())
                    .with_images(images);
            let params = ConnectionParams {
                draw_bubbles: true,
                ..straight_params(f.root_out, f.line_in, 5.0)
            };
            let config = *settings.config(ConnectionCategory::Normal);
            policy.draw_wiggle_connection(0, start, end, &params, &config);
        }
        list.counts()
    }

    #[test]
    fn test_wiggle_bubbles_drawn_with_default_images() {
        let counts =
            draw_wiggle_with_bubbles(DecorationImages::default(), Vec2::ZERO, Vec2::new(200.0, 0.0));
        assert_eq!(counts.splines, 1);
        assert!(counts.boxes > 0);
    }

    #[test]
    fn test_wiggle_skips_zero_size_bubbles() {
        let images = DecorationImages {
            bubble: Some(ImageBrush::new("Graph.ExecutionBubble", 0.0, 0.0)),
            ..DecorationImages::default()
        };
        let counts = draw_wiggle_with_bubbles(images, Vec2::ZERO, Vec2::new(200.0, 0.0));
        assert_eq!(counts.splines, 1);
        assert_eq!(counts.boxes, 0);
    }

    #[test]
    fn test_wiggle_skips_missing_bubble_image() {
        let images = DecorationImages {
            bubble: None,
            ..DecorationImages::default()
        };
        let counts = draw_wiggle_with_bubbles(images, Vec2::ZERO, Vec2::new(200.0, 0.0));
        assert_eq!(counts.splines, 1);
        assert_eq!(counts.boxes, 0);
    }

    #[test]
    fn test_wiggle_skips_bubbles_on_zero_length_wire() {
        let point = Vec2::new(50.0, 50.0);
        let counts = draw_wiggle_with_bubbles(DecorationImages::default(), point, point);
        assert_eq!(counts.splines, 1);
        assert_eq!(counts.boxes, 0);
    }

    #[test]
    fn test_draw_prunes_unlinked_simulators() {
        let mut f = fixture();
        let settings = WireSettings::default().with_wiggle_everywhere(true);
        let mut wires = GraphWires::new();

        let draw_frame = |graph: &EdGraph, wires: &mut GraphWires, delta_time: f32| {
            let geometries = graph.pin_geometries();
            let mut list = DrawList::new();
            let mut policy = ConnectionDrawingPolicy::new(
                &settings,
                wires,
                &mut list,
                FrameContext::new(delta_time, 0.0),
            );
            policy.draw(graph, &geometries)
        };

        draw_frame(&f.graph, &mut wires, 1.0 / 60.0);
        assert_eq!(wires.len(), 4);

        assert!(f.graph.unlink(f.orphan_out, f.line2_in));
        draw_frame(&f.graph, &mut wires, crate::registry::PRUNE_INTERVAL);
        assert_eq!(wires.len(), 3);
        assert!(!wires.contains(&WireId::linked(f.orphan_out, f.line2_in)));
    }
}
