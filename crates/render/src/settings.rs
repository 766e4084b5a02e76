//! Editor wire settings
//!
//! Everything the drawing policy reads about how connections look: colours,
//! thickness, highlight fading, static spline tangents, and which categories
//! use the simulated renderer. Settings files are TOML or JSON, chosen by
//! extension.

use joint_core::{
    JointError, JointResult, LinearColor, Persistable, ResultExt, Validatable, Vec2,
};
use joint_graph::ConnectionCategory;
use joint_wire::WiggleWireConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Spline Tangent Parameters
// ============================================================================

/// How a static connection derives its tangent from the endpoint delta
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplineTangentParams {
    /// Horizontal delta is clamped to this before scaling
    pub horizontal_delta_range: f32,

    /// Vertical delta is clamped to this before scaling
    pub vertical_delta_range: f32,

    /// Tangent per unit of clamped horizontal delta
    pub tangent_from_horizontal_delta: Vec2,

    /// Tangent per unit of clamped vertical delta
    pub tangent_from_vertical_delta: Vec2,
}

impl SplineTangentParams {
    pub fn new(
        horizontal_delta_range: f32,
        vertical_delta_range: f32,
        tangent_from_horizontal_delta: Vec2,
        tangent_from_vertical_delta: Vec2,
    ) -> Self {
        Self {
            horizontal_delta_range,
            vertical_delta_range,
            tangent_from_horizontal_delta,
            tangent_from_vertical_delta,
        }
    }

    /// Connections whose end lies to the right of their start
    pub fn forward() -> Self {
        Self::new(1000.0, 1000.0, Vec2::new(2.0, 0.0), Vec2::ZERO)
    }

    /// Connections that loop back to the left
    pub fn backward() -> Self {
        Self::new(200.0, 200.0, Vec2::new(2.0, 0.0), Vec2::ZERO)
    }

    /// Connections from a node to itself
    pub fn self_link() -> Self {
        Self::new(200.0, 200.0, Vec2::new(4.0, 4.0), Vec2::new(0.0, 4.0))
    }

    /// Tangent for clamped horizontal and vertical tension
    pub fn tangent(&self, tension_x: f32, tension_y: f32) -> Vec2 {
        self.tangent_from_horizontal_delta * tension_x
            + self.tangent_from_vertical_delta * tension_y
    }

    fn validate_named(&self, name: &str) -> JointResult<()> {
        if !(self.horizontal_delta_range.is_finite() && self.horizontal_delta_range >= 0.0) {
            return Err(JointError::validation(format!(
                "{} spline horizontal delta range must be non-negative",
                name
            )));
        }
        if !(self.vertical_delta_range.is_finite() && self.vertical_delta_range >= 0.0) {
            return Err(JointError::validation(format!(
                "{} spline vertical delta range must be non-negative",
                name
            )));
        }
        Ok(())
    }
}

// ============================================================================
// WireSettings
// ============================================================================

/// Connection appearance settings for the graph editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireSettings {
    // Colours
    pub normal_connection_color: LinearColor,
    pub recursive_connection_color: LinearColor,
    pub highlighted_connection_color: LinearColor,
    pub self_connection_color: LinearColor,
    pub preview_connection_color: LinearColor,

    /// Alpha of connections pushed back by a hover elsewhere
    pub not_highlighted_connection_opacity: f32,

    /// Alpha of connections leaving nodes no root can reach
    pub not_reachable_route_connection_opacity: f32,

    // Thickness and highlight fading
    pub pin_connection_thickness: f32,
    pub highlighted_pin_connection_thickness: f32,
    pub connection_highlight_fade_bias: f32,
    pub connection_highlighted_fade_in_period: f32,

    pub draw_normal_connection: bool,
    pub draw_recursive_connection: bool,

    // Static spline tangents
    pub forward_spline: SplineTangentParams,
    pub backward_spline: SplineTangentParams,
    pub self_spline: SplineTangentParams,

    // Simulated wires
    pub use_wiggle_wire_for_normal_connection: bool,
    pub use_wiggle_wire_for_recursive_connection: bool,
    pub use_wiggle_wire_for_self_connection: bool,
    pub use_wiggle_wire_for_preview_connection: bool,
    pub normal_connection_wiggle_config: WiggleWireConfig,
    pub recursive_connection_wiggle_config: WiggleWireConfig,
    pub self_connection_wiggle_config: WiggleWireConfig,
    pub preview_connection_wiggle_config: WiggleWireConfig,

    // Hover
    pub spline_hover_tolerance: f32,
    pub spline_close_tolerance: f32,

    /// Hit test connections as if they were pins
    pub treat_splines_like_pins: bool,
}

const HIGHLIGHTED_CONNECTION_COLOR: LinearColor = LinearColor::new(0.65, 0.1, 0.25, 1.0);

impl Default for WireSettings {
    fn default() -> Self {
        let wiggle = WiggleWireConfig::editor_preset();
        Self {
            normal_connection_color: LinearColor::new(0.15, 0.15, 0.20, 1.0),
            recursive_connection_color: LinearColor::new(0.4, 0.25, 0.09, 1.0),
            highlighted_connection_color: HIGHLIGHTED_CONNECTION_COLOR,
            self_connection_color: HIGHLIGHTED_CONNECTION_COLOR,
            preview_connection_color: HIGHLIGHTED_CONNECTION_COLOR,
            not_highlighted_connection_opacity: 0.2,
            not_reachable_route_connection_opacity: 0.2,
            pin_connection_thickness: 5.0,
            highlighted_pin_connection_thickness: 7.0,
            connection_highlight_fade_bias: 0.35,
            connection_highlighted_fade_in_period: 0.75,
            draw_normal_connection: true,
            draw_recursive_connection: true,
            forward_spline: SplineTangentParams::forward(),
            backward_spline: SplineTangentParams::backward(),
            self_spline: SplineTangentParams::self_link(),
            use_wiggle_wire_for_normal_connection: false,
            use_wiggle_wire_for_recursive_connection: false,
            use_wiggle_wire_for_self_connection: false,
            use_wiggle_wire_for_preview_connection: true,
            normal_connection_wiggle_config: wiggle,
            recursive_connection_wiggle_config: wiggle,
            self_connection_wiggle_config: wiggle,
            preview_connection_wiggle_config: wiggle,
            spline_hover_tolerance: 2.0,
            spline_close_tolerance: 15.0,
            treat_splines_like_pins: true,
        }
    }
}

impl WireSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn the simulated renderer on or off for every category
    pub fn with_wiggle_everywhere(mut self, enabled: bool) -> Self {
        for category in ConnectionCategory::ALL {
            self.set_use_wiggle(category, enabled);
        }
        self
    }

    /// Use the same simulation config for every category
    pub fn with_wiggle_config(mut self, config: WiggleWireConfig) -> Self {
        for category in ConnectionCategory::ALL {
            *self.config_mut(category) = config;
        }
        self
    }

    /// Whether `category` is drawn with a simulated wire
    pub fn use_wiggle(&self, category: ConnectionCategory) -> bool {
        match category {
            ConnectionCategory::Normal => self.use_wiggle_wire_for_normal_connection,
            ConnectionCategory::Recursive => self.use_wiggle_wire_for_recursive_connection,
            ConnectionCategory::SelfLink => self.use_wiggle_wire_for_self_connection,
            ConnectionCategory::Preview => self.use_wiggle_wire_for_preview_connection,
        }
    }

    pub fn set_use_wiggle(&mut self, category: ConnectionCategory, enabled: bool) {
        match category {
            ConnectionCategory::Normal => self.use_wiggle_wire_for_normal_connection = enabled,
            ConnectionCategory::Recursive => {
                self.use_wiggle_wire_for_recursive_connection = enabled
            }
            ConnectionCategory::SelfLink => self.use_wiggle_wire_for_self_connection = enabled,
            ConnectionCategory::Preview => self.use_wiggle_wire_for_preview_connection = enabled,
        }
    }

    /// Simulation config for `category`
    pub fn config(&self, category: ConnectionCategory) -> &WiggleWireConfig {
        match category {
            ConnectionCategory::Normal => &self.normal_connection_wiggle_config,
            ConnectionCategory::Recursive => &self.recursive_connection_wiggle_config,
            ConnectionCategory::SelfLink => &self.self_connection_wiggle_config,
            ConnectionCategory::Preview => &self.preview_connection_wiggle_config,
        }
    }

    pub fn config_mut(&mut self, category: ConnectionCategory) -> &mut WiggleWireConfig {
        match category {
            ConnectionCategory::Normal => &mut self.normal_connection_wiggle_config,
            ConnectionCategory::Recursive => &mut self.recursive_connection_wiggle_config,
            ConnectionCategory::SelfLink => &mut self.self_connection_wiggle_config,
            ConnectionCategory::Preview => &mut self.preview_connection_wiggle_config,
        }
    }

    /// Base colour for `category`, before reachability and hover
    pub fn color(&self, category: ConnectionCategory) -> LinearColor {
        match category {
            ConnectionCategory::Normal => self.normal_connection_color,
            ConnectionCategory::Recursive => self.recursive_connection_color,
            ConnectionCategory::SelfLink => self.self_connection_color,
            ConnectionCategory::Preview => self.preview_connection_color,
        }
    }

    /// Normal and recursive connections can be hidden
    pub fn draws_category(&self, category: ConnectionCategory) -> bool {
        match category {
            ConnectionCategory::Normal => self.draw_normal_connection,
            ConnectionCategory::Recursive => self.draw_recursive_connection,
            ConnectionCategory::SelfLink | ConnectionCategory::Preview => true,
        }
    }
}

fn unit_interval(name: &str, value: f32) -> JointResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(JointError::validation(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}

fn non_negative(name: &str, value: f32) -> JointResult<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(JointError::validation(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

impl Validatable for WireSettings {
    fn validate(&self) -> JointResult<()> {
        unit_interval(
            "not_highlighted_connection_opacity",
            self.not_highlighted_connection_opacity,
        )?;
        unit_interval(
            "not_reachable_route_connection_opacity",
            self.not_reachable_route_connection_opacity,
        )?;
        non_negative("pin_connection_thickness", self.pin_connection_thickness)?;
        non_negative(
            "highlighted_pin_connection_thickness",
            self.highlighted_pin_connection_thickness,
        )?;
        non_negative(
            "connection_highlighted_fade_in_period",
            self.connection_highlighted_fade_in_period,
        )?;
        non_negative("spline_hover_tolerance", self.spline_hover_tolerance)?;
        non_negative("spline_close_tolerance", self.spline_close_tolerance)?;

        self.forward_spline.validate_named("forward")?;
        self.backward_spline.validate_named("backward")?;
        self.self_spline.validate_named("self")?;

        for category in ConnectionCategory::ALL {
            self.config(category)
                .validate()
                .with_context(format!("{} connection", category.display_name()))?;
        }
        Ok(())
    }
}

impl Persistable for WireSettings {
    fn file_extension() -> &'static str {
        "json"
    }
}

// ============================================================================
// Settings Files
// ============================================================================

enum SettingsFormat {
    Toml,
    Json,
}

fn settings_format(path: &Path) -> JointResult<SettingsFormat> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("toml") => Ok(SettingsFormat::Toml),
        Some("json") => Ok(SettingsFormat::Json),
        _ => Err(JointError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Parse settings from TOML; missing keys take their defaults
pub fn load_settings_from_str(toml_text: &str) -> JointResult<WireSettings> {
    let settings: WireSettings = toml::from_str(toml_text)?;
    Ok(settings)
}

/// Serialize settings to TOML
pub fn settings_to_toml(settings: &WireSettings) -> JointResult<String> {
    Ok(toml::to_string_pretty(settings)?)
}

/// Load a `.toml` or `.json` settings file
///
/// Validation problems are logged rather than returned, so a hand-edited file
/// with one bad value still opens.
pub fn load_settings(path: impl AsRef<Path>) -> JointResult<WireSettings> {
    let path = path.as_ref();
    let format = settings_format(path)?;
    if !path.exists() {
        return Err(JointError::SettingsNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|e| JointError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let settings = match format {
        SettingsFormat::Toml => load_settings_from_str(&text),
        SettingsFormat::Json => WireSettings::from_json(&text),
    }
    .map_err(|e| JointError::FileRead {
        path: path.to_path_buf(),
        message: format!("Invalid settings file format: {}", e),
    })?;

    for problem in settings.validation_errors() {
        tracing::warn!(path = %path.display(), %problem, "Wire settings problem");
    }
    tracing::debug!(path = %path.display(), "Loaded wire settings");
    Ok(settings)
}

/// Write settings as `.toml` or `.json`, creating parent directories
pub fn save_settings(settings: &WireSettings, path: impl AsRef<Path>) -> JointResult<()> {
    let path = path.as_ref();
    let text = match settings_format(path)? {
        SettingsFormat::Toml => settings_to_toml(settings)?,
        SettingsFormat::Json => settings.to_json()?,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| JointError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, text).map_err(|e| JointError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), "Saved wire settings");
    Ok(())
}
