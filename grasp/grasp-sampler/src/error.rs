//! Error types for sampler construction.

use grasp_types::{ConfigError, GraspError};
use thiserror::Error;

/// Result type for sampler construction.
pub type SamplerResult<T> = Result<T, SamplerError>;

/// Errors raised when building a sampler.
///
/// Sampling itself never fails: geometric dead ends drop the current trial
/// and exhausted budgets return a short result.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// The sampler configuration is invalid.
    #[error("invalid sampler configuration: {0}")]
    Config(#[from] ConfigError),

    /// The gripper limits are invalid.
    #[error("invalid gripper: {0}")]
    Gripper(#[from] GraspError),
}
