//! Core traits for Joint wires
//!
//! These traits are the seams between the simulation core and its host:
//! configuration validation, file persistence, and the "are these pins still
//! linked?" question asked by the simulator prune pass.

use crate::error::JointResult;
use crate::types::{PinId, Vec2};
use serde::{Serialize, de::DeserializeOwned};

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use joint_core::{Validatable, JointResult, JointError};
///
/// struct Spring {
///     stiffness: f32,
/// }
///
/// impl Validatable for Spring {
///     fn validate(&self) -> JointResult<()> {
///         if self.stiffness < 1.0 {
///             return Err(JointError::config("stiffness", "must be >= 1.0"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or a `JointError` describing the problem.
    fn validate(&self) -> JointResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Trait for types that can be serialized to and deserialized from JSON files
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Get the file extension for this type (without the dot)
    fn file_extension() -> &'static str;

    /// Get the schema version for migration purposes
    fn schema_version() -> u32 {
        1
    }

    /// Save to a JSON string
    fn to_json(&self) -> JointResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Load from a JSON string
    fn from_json(json: &str) -> JointResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Save to a file
    fn save_to_file(&self, path: &std::path::Path) -> JointResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| crate::error::JointError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from a file
    fn load_from_file(path: &std::path::Path) -> JointResult<Self> {
        let json =
            std::fs::read_to_string(path).map_err(|e| crate::error::JointError::FileRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_json(&json)
    }
}

// ============================================================================
// LinkQuery Trait
// ============================================================================

/// Answers whether two pins are currently connected
///
/// The wire registry holds no graph data of its own; the prune pass asks
/// the host through this trait whether each tracked wire still exists.
pub trait LinkQuery {
    /// True if `start` lists `end` among its linked pins
    fn is_linked(&self, start: PinId, end: PinId) -> bool;
}

impl LinkQuery for std::collections::HashSet<(PinId, PinId)> {
    fn is_linked(&self, start: PinId, end: PinId) -> bool {
        self.contains(&(start, end))
    }
}

// ============================================================================
// Positioned Trait
// ============================================================================

/// Trait for types that have a position on the canvas
pub trait Positioned {
    /// Get the current position
    fn position(&self) -> Vec2;

    /// Set the position
    fn set_position(&mut self, position: Vec2);

    /// Move by a relative offset
    fn translate(&mut self, dx: f32, dy: f32) {
        let pos = self.position();
        self.set_position(Vec2::new(pos.x + dx, pos.y + dy));
    }
}

// ============================================================================
// Tests
// ============================================================================
