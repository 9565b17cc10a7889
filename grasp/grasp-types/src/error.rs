//! Error types for grasp construction and configuration.

use thiserror::Error;

/// Result type for grasp construction.
pub type GraspResult<T> = Result<T, GraspError>;

/// Result type for configuration parsing and validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised when a grasp value would violate its invariants.
#[derive(Debug, Error, PartialEq)]
pub enum GraspError {
    /// The grasp axis has zero (or non-finite) length.
    #[error("grasp axis is degenerate")]
    DegenerateAxis,

    /// The opening width is not strictly positive.
    #[error("invalid grasp width: {0}")]
    InvalidWidth(f64),

    /// A contact normal has zero (or non-finite) length.
    #[error("contact normal is degenerate")]
    DegenerateNormal,

    /// Gripper width limits are inconsistent.
    #[error("invalid gripper widths: min {min}, max {max}")]
    InvalidGripper {
        /// Minimum opening width.
        min: f64,
        /// Maximum opening width.
        max: f64,
    },
}

/// Errors raised while building a sampler configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be deserialized (includes missing keys).
    #[error("failed to parse sampler config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required key is absent.
    #[error("missing required config key `{0}`")]
    MissingKey(&'static str),

    /// A key is present but its value is out of range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Configuration key.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`].
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
