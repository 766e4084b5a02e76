//! # Joint Core
//!
//! Core types, traits, and error handling for Joint wires.
//!
//! This crate provides the foundational building blocks shared by the
//! simulation, graph and rendering crates:
//!
//! - **Types**: screen-space geometry (`Vec2`, `Size`, `Rect`), colors, ids
//! - **Traits**: `Validatable`, `Persistable`, `LinkQuery`, `Positioned`
//! - **Errors**: unified error handling with `JointError` and `JointResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{JointError, JointResult, ResultExt};
pub use traits::{LinkQuery, Persistable, Positioned, Validatable};
pub use types::{
    GraphId, KINDA_SMALL_NUMBER, LinearColor, NodeId, PinId, Rect, SMALL_NUMBER, Size, Vec2,
    lerp, smooth_step,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
