//! Discretized friction cones.
//!
//! A Coulomb contact can push along any direction `f` satisfying
//!
//! ```text
//! |f_t| ≤ μ · f_n
//! ```
//!
//! i.e. within `arctan(μ)` of the inward surface normal. The cone is
//! approximated by a fan of `num_faces` support directions
//! `n_in + μ · (cos φ_j · t1 + sin φ_j · t2)` with `φ_j = 2πj / num_faces`.

use std::f64::consts::TAU;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A friction cone at a single contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionCone {
    mu: f64,
    normal: Vector3<f64>,
    tangents: (Vector3<f64>, Vector3<f64>),
    support: Vec<Vector3<f64>>,
}

impl FrictionCone {
    /// Build the discrete cone.
    ///
    /// `normal` is the unit *outward* normal and `(t1, t2)` an orthonormal
    /// tangent basis. Negative friction coefficients are clamped to zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        normal: Vector3<f64>,
        tangents: (Vector3<f64>, Vector3<f64>),
        mu: f64,
        num_faces: usize,
    ) -> Self {
        let mu = mu.max(0.0);
        let in_normal = -normal;
        let (t1, t2) = tangents;
        let support = (0..num_faces)
            .map(|j| {
                let phi = TAU * j as f64 / num_faces as f64;
                in_normal + (t1 * phi.cos() + t2 * phi.sin()) * mu
            })
            .collect();

        Self {
            mu,
            normal,
            tangents,
            support,
        }
    }

    /// Coulomb friction coefficient.
    #[must_use]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Cone half-angle in radians.
    #[must_use]
    pub fn half_angle(&self) -> f64 {
        self.mu.atan()
    }

    /// Unit outward normal.
    #[must_use]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Tangent basis used to build the fan.
    #[must_use]
    pub fn tangents(&self) -> (Vector3<f64>, Vector3<f64>) {
        self.tangents
    }

    /// Support directions of the fan (not normalized).
    #[must_use]
    pub fn support(&self) -> &[Vector3<f64>] {
        &self.support
    }

    /// Number of fan directions.
    #[must_use]
    pub fn num_faces(&self) -> usize {
        self.support.len()
    }

    /// Whether `v` lies inside the cone, with the angle between `v` and the
    /// inward normal.
    ///
    /// The sign of `v` is unknown to callers, so `v` is flipped when it points
    /// away from any support direction.
    #[must_use]
    pub fn within_cone(&self, v: &Vector3<f64>) -> (bool, f64) {
        let norm = v.norm();
        if norm < f64::EPSILON {
            return (false, std::f64::consts::PI);
        }
        let v = if self.support.iter().any(|s| v.dot(s) < 0.0) {
            -v
        } else {
            *v
        };
        let cos_alpha = (-self.normal).dot(&v) / norm;
        let alpha = cos_alpha.clamp(-1.0, 1.0).acos();
        (alpha <= self.half_angle(), alpha)
    }
}
