//! Parallel-jaw gripper limits.

use serde::{Deserialize, Serialize};

use crate::error::{GraspError, GraspResult};

/// Opening limits of a parallel-jaw gripper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GripperParams {
    /// Narrowest opening the jaws can hold an object at.
    pub min_width: f64,
    /// Widest opening of the jaws.
    pub max_width: f64,
}

impl GripperParams {
    /// Create validated gripper limits.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::InvalidGripper`] unless
    /// `0 ≤ min_width < max_width` and both are finite.
    pub fn new(min_width: f64, max_width: f64) -> GraspResult<Self> {
        let params = Self {
            min_width,
            max_width,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the width limits.
    pub fn validate(&self) -> GraspResult<()> {
        let valid = self.min_width.is_finite()
            && self.max_width.is_finite()
            && self.min_width >= 0.0
            && self.max_width > self.min_width;
        if valid {
            Ok(())
        } else {
            Err(GraspError::InvalidGripper {
                min: self.min_width,
                max: self.max_width,
            })
        }
    }

    /// Opening width for a fraction of the maximum.
    #[must_use]
    pub fn width_at_ratio(&self, ratio: f64) -> f64 {
        ratio * self.max_width
    }
}
