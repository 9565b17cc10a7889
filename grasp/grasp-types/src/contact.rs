//! Surface contacts.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{GraspError, GraspResult};

/// A point contact between a finger and the object surface.
///
/// `normal` is the unit outward surface normal. `in_direction`, when present,
/// is the unit direction in which the finger was moving when it reached the
/// surface; friction-cone construction uses it to test for slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    point: Point3<f64>,
    normal: Vector3<f64>,
    in_direction: Option<Vector3<f64>>,
}

impl Contact {
    /// Create a contact with a (not necessarily unit) outward normal.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::DegenerateNormal`] if the normal cannot be
    /// normalized.
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> GraspResult<Self> {
        let normal = normal
            .try_normalize(f64::EPSILON)
            .filter(|n| n.iter().all(|c| c.is_finite()))
            .ok_or(GraspError::DegenerateNormal)?;
        Ok(Self {
            point,
            normal,
            in_direction: None,
        })
    }

    /// Attach the finger approach direction. Zero directions are ignored.
    #[must_use]
    pub fn with_in_direction(mut self, direction: Vector3<f64>) -> Self {
        self.in_direction = direction.try_normalize(f64::EPSILON);
        self
    }

    /// Contact location.
    #[must_use]
    pub fn point(&self) -> Point3<f64> {
        self.point
    }

    /// Unit outward surface normal.
    #[must_use]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Unit inward surface normal.
    #[must_use]
    pub fn in_normal(&self) -> Vector3<f64> {
        -self.normal
    }

    /// Finger approach direction, if known.
    #[must_use]
    pub fn in_direction(&self) -> Option<Vector3<f64>> {
        self.in_direction
    }

    /// Distance between two contacts.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (other.point - self.point).norm()
    }
}
