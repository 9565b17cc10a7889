//! Parallel-jaw grasp representation.

use std::f64::consts::PI;

use nalgebra::{Point3, Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{GraspError, GraspResult};
use crate::pose::StablePose;

/// A parallel-jaw point grasp.
///
/// The jaws close along `axis` through `center`; `max_width` is the opening
/// of the jaws before closing. The approach direction lies in the plane
/// orthogonal to `axis` and is parameterized by `approach_angle`, a roll
/// about the jaw axis measured from [`unrotated_approach_axis`].
///
/// `axis` is always unit length and `max_width` is always strictly positive.
///
/// # Example
///
/// ```
/// use grasp_types::ParallelJawGrasp;
/// use nalgebra::{Point3, Vector3};
///
/// let grasp = ParallelJawGrasp::new(
///     Point3::origin(),
///     Vector3::new(0.0, 0.0, 2.0),
///     0.08,
/// ).unwrap();
///
/// assert!((grasp.axis().norm() - 1.0).abs() < 1e-12);
/// let (g1, g2) = grasp.endpoints();
/// assert!((g2 - g1).norm() - 0.08 < 1e-12);
/// ```
///
/// [`unrotated_approach_axis`]: ParallelJawGrasp::unrotated_approach_axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelJawGrasp {
    center: Point3<f64>,
    axis: Vector3<f64>,
    max_width: f64,
    approach_angle: f64,
}

impl ParallelJawGrasp {
    /// Create a grasp with zero approach angle.
    ///
    /// The axis is normalized.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::DegenerateAxis`] for a zero or non-finite axis and
    /// [`GraspError::InvalidWidth`] if `max_width` is not strictly positive.
    pub fn new(center: Point3<f64>, axis: Vector3<f64>, max_width: f64) -> GraspResult<Self> {
        let axis = normalize_axis(axis)?;
        check_width(max_width)?;
        Ok(Self {
            center,
            axis,
            max_width,
            approach_angle: 0.0,
        })
    }

    /// Create a grasp whose jaws meet at the two given endpoints.
    ///
    /// # Errors
    ///
    /// Fails if the endpoints coincide or `max_width` is not positive.
    pub fn from_endpoints(
        p1: Point3<f64>,
        p2: Point3<f64>,
        max_width: f64,
    ) -> GraspResult<Self> {
        let axis = Self::axis_from_endpoints(p1, p2).ok_or(GraspError::DegenerateAxis)?;
        Self::new(Self::center_from_endpoints(p1, p2), axis, max_width)
    }

    /// Set the approach angle (radians).
    #[must_use]
    pub fn with_approach_angle(mut self, angle: f64) -> Self {
        self.approach_angle = angle;
        self
    }

    /// Midpoint of two jaw endpoints.
    #[must_use]
    pub fn center_from_endpoints(p1: Point3<f64>, p2: Point3<f64>) -> Point3<f64> {
        nalgebra::center(&p1, &p2)
    }

    /// Unit direction from `p1` to `p2`, or `None` if they coincide.
    #[must_use]
    pub fn axis_from_endpoints(p1: Point3<f64>, p2: Point3<f64>) -> Option<Vector3<f64>> {
        (p2 - p1).try_normalize(f64::EPSILON)
    }

    /// Grasp center.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Unit jaw axis.
    #[must_use]
    pub fn axis(&self) -> Vector3<f64> {
        self.axis
    }

    /// Maximum opening width.
    #[must_use]
    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    /// Approach roll angle about the jaw axis (radians).
    #[must_use]
    pub fn approach_angle(&self) -> f64 {
        self.approach_angle
    }

    /// Move the grasp center.
    pub fn set_center(&mut self, center: Point3<f64>) {
        self.center = center;
    }

    /// Change the opening width.
    ///
    /// # Errors
    ///
    /// Returns [`GraspError::InvalidWidth`] if `max_width` is not strictly
    /// positive; the grasp is left unchanged.
    pub fn set_max_width(&mut self, max_width: f64) -> GraspResult<()> {
        check_width(max_width)?;
        self.max_width = max_width;
        Ok(())
    }

    /// Jaw endpoints `center ∓ (max_width / 2) · axis`.
    #[must_use]
    pub fn endpoints(&self) -> (Point3<f64>, Point3<f64>) {
        let half = self.axis * (self.max_width / 2.0);
        (self.center - half, self.center + half)
    }

    /// Approach direction at zero roll.
    ///
    /// Chosen as the horizontal direction `(a_y, −a_x, 0)` orthogonal to the
    /// jaw axis, or +X when the axis is vertical.
    #[must_use]
    pub fn unrotated_approach_axis(&self) -> Vector3<f64> {
        Vector3::new(self.axis.y, -self.axis.x, 0.0)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::x)
    }

    /// Approach direction after rolling by `approach_angle` about the jaw axis.
    #[must_use]
    pub fn approach_axis(&self) -> Vector3<f64> {
        self.approach_axis_at(self.approach_angle)
    }

    fn approach_axis_at(&self, angle: f64) -> Vector3<f64> {
        let rotation = Rotation3::from_axis_angle(&Unit::new_unchecked(self.axis), angle);
        rotation * self.unrotated_approach_axis()
    }

    /// Copy of this grasp rolled so that it approaches the object from above
    /// when resting in `stable_pose`.
    ///
    /// Scans `num_rots` roll angles evenly spaced over `[−π, π]` and keeps the
    /// one whose approach direction points most strongly against the table
    /// normal. With `num_rots == 0` the grasp is returned unchanged.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn perpendicular_table(&self, stable_pose: &StablePose, num_rots: usize) -> Self {
        let table_normal = stable_pose.table_normal();
        let mut best_angle = self.approach_angle;
        let mut best_alignment = f64::NEG_INFINITY;

        for i in 0..num_rots {
            let angle = if num_rots == 1 {
                -PI
            } else {
                -PI + 2.0 * PI * i as f64 / (num_rots - 1) as f64
            };
            let alignment = -self.approach_axis_at(angle).dot(&table_normal);
            if alignment > best_alignment {
                best_alignment = alignment;
                best_angle = angle;
            }
        }

        self.clone().with_approach_angle(best_angle)
    }
}

fn normalize_axis(axis: Vector3<f64>) -> GraspResult<Vector3<f64>> {
    if !axis.iter().all(|c| c.is_finite()) {
        return Err(GraspError::DegenerateAxis);
    }
    axis.try_normalize(f64::EPSILON)
        .ok_or(GraspError::DegenerateAxis)
}

fn check_width(width: f64) -> GraspResult<()> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(GraspError::InvalidWidth(width))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Matrix3;

    fn x_grasp() -> ParallelJawGrasp {
        ParallelJawGrasp::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(3.0, 0.0, 0.0), 0.1)
            .expect("valid grasp")
    }

    #[test]
    fn axis_is_normalized() {
        let grasp = x_grasp();
        assert_relative_eq!(grasp.axis(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn rejects_degenerate_axis() {
        let result = ParallelJawGrasp::new(Point3::origin(), Vector3::zeros(), 0.1);
        assert_eq!(result, Err(GraspError::DegenerateAxis));

        let result = ParallelJawGrasp::new(Point3::origin(), Vector3::new(f64::NAN, 0.0, 1.0), 0.1);
        assert_eq!(result, Err(GraspError::DegenerateAxis));
    }

    #[test]
    fn rejects_non_positive_width() {
        assert!(ParallelJawGrasp::new(Point3::origin(), Vector3::z(), 0.0).is_err());
        assert!(ParallelJawGrasp::new(Point3::origin(), Vector3::z(), -1.0).is_err());

        let mut grasp = x_grasp();
        assert!(grasp.set_max_width(0.0).is_err());
        assert_relative_eq!(grasp.max_width(), 0.1);
    }

    #[test]
    fn endpoints_round_trip() {
        let p1 = Point3::new(0.0, 0.0, 0.0);
        let p2 = Point3::new(0.0, 0.04, 0.0);
        let grasp = ParallelJawGrasp::from_endpoints(p1, p2, 0.04).unwrap();

        assert_relative_eq!(grasp.center(), Point3::new(0.0, 0.02, 0.0), epsilon = 1e-12);
        let (g1, g2) = grasp.endpoints();
        assert_relative_eq!(g1, p1, epsilon = 1e-12);
        assert_relative_eq!(g2, p2, epsilon = 1e-12);
    }

    #[test]
    fn coincident_endpoints_fail() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(ParallelJawGrasp::axis_from_endpoints(p, p).is_none());
        assert!(ParallelJawGrasp::from_endpoints(p, p, 0.1).is_err());
    }

    #[test]
    fn approach_axis_is_orthogonal_to_jaw_axis() {
        for angle in [0.0, 0.3, 1.7, -2.5] {
            let grasp = x_grasp().with_approach_angle(angle);
            let approach = grasp.approach_axis();
            assert_relative_eq!(approach.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(approach.dot(&grasp.axis()), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn vertical_axis_uses_x_reference() {
        let grasp = ParallelJawGrasp::new(Point3::origin(), Vector3::z(), 0.1).unwrap();
        assert_relative_eq!(grasp.unrotated_approach_axis(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn perpendicular_table_approaches_from_above() {
        // Identity pose: table normal is +Z in the object frame.
        let pose = StablePose::new("upright", Matrix3::identity(), 1.0);
        let aligned = x_grasp().perpendicular_table(&pose, 73);

        // Approach should point down, into the table.
        assert!(aligned.approach_axis().z < -0.99);
        assert_relative_eq!(aligned.center(), x_grasp().center());
        assert_relative_eq!(aligned.max_width(), x_grasp().max_width());
    }

    #[test]
    fn perpendicular_table_without_rotations_is_identity() {
        let pose = StablePose::new("upright", Matrix3::identity(), 1.0);
        let grasp = x_grasp().with_approach_angle(0.7);
        assert_eq!(grasp.perpendicular_table(&pose, 0), grasp);
    }
}
