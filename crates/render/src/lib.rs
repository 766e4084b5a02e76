//! # Joint Render
//!
//! Connection drawing for Joint graphs.
//!
//! Each frame the host builds a [`ConnectionDrawingPolicy`] over its settings,
//! the graph's [`GraphWires`] and a [`DrawSurface`], then calls `draw`. Links
//! are classified, styled and drawn either as static tangent curves or as
//! spring-simulated wiggle wires. The nearest wire under the mouse comes back
//! as a [`SplineOverlapResult`].
//!
//! ## Modules
//!
//! - **spline**: Hermite evaluation, closest-point search, arc-length tables
//! - **identity**: `WireId`, the ordered pin pair naming a wire
//! - **registry**: per-graph simulator storage and pruning
//! - **hit_test**: hover thresholds and the overlap result
//! - **canvas**: the `DrawSurface` trait and the recording `DrawList`
//! - **settings**: editor wire settings and their TOML/JSON files
//! - **policy**: the per-frame connection drawing policy
//! - **playback**: frame-by-frame scene replay through the policy
//!

pub mod canvas;
pub mod identity;
pub mod playback;
pub mod policy;
pub mod registry;
pub mod settings;
pub mod spline;

pub use canvas::{DrawCounts, DrawElement, DrawList, DrawSurface, ImageBrush};
pub use hit_test::{HoverThresholds, SplineOverlapResult};
pub use identity::WireId;
pub use playback::{FrameOutcome, ScenePlayer};
pub use policy::{ConnectionDrawingPolicy, ConnectionParams, DecorationImages, FrameContext};
pub use registry::{DEFAULT_SIMULATOR_CAPACITY, GraphWires, PRUNE_INTERVAL, WireRegistry};
pub use settings::{
    SplineTangentParams, WireSettings, load_settings, load_settings_from_str, save_settings,
    settings_to_toml,
};
pub use spline::{HermiteSpline, ReparamTable, cubic_interp, sample_closest_point};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
