//! Error types for Joint wires
//!
//! The simulation core itself never fails. These errors cover the layers
//! around it: graph editing, settings and scene files, and configuration
//! validation.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Joint wires
#[derive(Debug, Error)]
pub enum JointError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A simulation config field is outside its allowed range
    #[error("Invalid wiggle wire config '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// A link between two pins was rejected
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Pin not found
    #[error("Pin not found: {0}")]
    PinNotFound(String),

    /// Settings file not found
    #[error("Settings file not found at path: {0}")]
    SettingsNotFound(PathBuf),

    /// Scene file not found
    #[error("Scene file not found at path: {0}")]
    SceneNotFound(PathBuf),

    // ========================================================================
    // Duplicate Errors
    // ========================================================================
    /// The two pins are already linked
    #[error("Duplicate link between pins '{from}' and '{to}'")]
    DuplicateLink { from: String, to: String },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// File extension is neither `.toml` nor `.json`
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl JointError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        JointError::Validation(msg.into())
    }

    /// Create a config validation error for a single field
    pub fn config(field: impl Into<String>, msg: impl Into<String>) -> Self {
        JointError::ConfigValidation {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create an invalid link error
    pub fn invalid_link(msg: impl Into<String>) -> Self {
        JointError::InvalidLink(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        JointError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            JointError::Validation(_)
                | JointError::ConfigValidation { .. }
                | JointError::InvalidLink(_)
                | JointError::DuplicateLink { .. }
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            JointError::NodeNotFound(_)
                | JointError::PinNotFound(_)
                | JointError::SettingsNotFound(_)
                | JointError::SceneNotFound(_)
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            JointError::Io(_)
                | JointError::FileRead { .. }
                | JointError::FileWrite { .. }
                | JointError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using JointError
pub type JointResult<T> = Result<T, JointError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> JointResult<T>;
}

impl<T, E: Into<JointError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> JointResult<T> {
        self.map_err(|e| {
            let err: JointError = e.into();
            JointError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
