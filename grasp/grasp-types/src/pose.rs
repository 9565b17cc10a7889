//! Stable resting poses.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// A stable resting pose of an object on a planar table.
///
/// `rotation` maps object-frame vectors into the table frame, whose +Z axis
/// is the table normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StablePose {
    /// Identifier used to group grasps per pose.
    pub id: String,
    /// Object-to-table rotation.
    pub rotation: Matrix3<f64>,
    /// Probability of the object coming to rest in this pose.
    pub probability: f64,
}

impl StablePose {
    /// Create a stable pose.
    #[must_use]
    pub fn new(id: impl Into<String>, rotation: Matrix3<f64>, probability: f64) -> Self {
        Self {
            id: id.into(),
            rotation,
            probability,
        }
    }

    /// Table normal expressed in the object frame (third row of `rotation`).
    #[must_use]
    pub fn table_normal(&self) -> Vector3<f64> {
        self.rotation.row(2).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_normal_is_third_row() {
        let rotation = Matrix3::new(1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0);
        let pose = StablePose::new("side", rotation, 0.25);
        assert_eq!(pose.table_normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(pose.id, "side");
    }
}
