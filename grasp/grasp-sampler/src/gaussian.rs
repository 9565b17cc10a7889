//! Gaussian grasp sampling around the center of mass.

use std::f64::consts::TAU;

use grasp_contact::{GraspGeometry, LineOfActionGeometry};
use grasp_object::GraspableObject;
use grasp_types::{GripperParams, ParallelJawGrasp, SamplerConfig};
use nalgebra::{Point3, Vector3};
use rand::Rng;
use tracing::debug;

use crate::error::SamplerResult;
use crate::sampler::{BatchRequest, SampleGrasps};

/// Samples grasp centers from a Gaussian at the center of mass and grasp
/// axes uniformly over the sphere.
///
/// The standard deviation along each axis is `principal_dims / (2·sigma_scale)`,
/// so the object half-extent spans `sigma_scale` deviations.
#[derive(Debug, Clone)]
pub struct GaussianSampler<G = LineOfActionGeometry> {
    gripper: GripperParams,
    config: SamplerConfig,
    geometry: G,
}

impl GaussianSampler {
    /// Create a sampler with the default finger geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the gripper or configuration is invalid.
    pub fn new(gripper: GripperParams, config: SamplerConfig) -> SamplerResult<Self> {
        Self::with_geometry(gripper, config, LineOfActionGeometry::default())
    }
}

impl<G: GraspGeometry> GaussianSampler<G> {
    /// Create a sampler with a custom finger geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the gripper or configuration is invalid.
    pub fn with_geometry(
        gripper: GripperParams,
        config: SamplerConfig,
        geometry: G,
    ) -> SamplerResult<Self> {
        gripper.validate()?;
        config.validate()?;
        Ok(Self {
            gripper,
            config,
            geometry,
        })
    }

    /// Draw exactly `num_grasps` candidate `(center, axis)` pairs.
    pub fn sample_candidates<O, R>(
        &self,
        object: &O,
        num_grasps: usize,
        rng: &mut R,
    ) -> Vec<(Point3<f64>, Vector3<f64>)>
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        let mean = object.center_of_mass();
        let sigma = object.principal_dims() / (2.0 * self.config.sigma_scale);

        let centers: Vec<Point3<f64>> = (0..num_grasps)
            .map(|_| {
                let z = Vector3::new(
                    standard_normal(rng),
                    standard_normal(rng),
                    standard_normal(rng),
                );
                mean + sigma.component_mul(&z)
            })
            .collect();

        centers
            .into_iter()
            .map(|center| (center, uniform_direction(rng)))
            .collect()
    }

    /// Sample at most `num_grasps` grasps in a single pass.
    ///
    /// A candidate is kept if the fingers close on the object and the two
    /// contacts are farther apart than `min_contact_dist`.
    pub fn sample_grasps<O, R>(&self, object: &O, num_grasps: usize, rng: &mut R) -> Vec<ParallelJawGrasp>
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        let grasps: Vec<ParallelJawGrasp> = self
            .sample_candidates(object, num_grasps, rng)
            .into_iter()
            .filter_map(|(center, axis)| {
                let grasp = ParallelJawGrasp::new(center, axis, self.gripper.max_width).ok()?;
                let [c1, c2] = self.geometry.close_fingers(&grasp, object)?;
                (c1.distance_to(&c2) > self.config.min_contact_dist).then_some(grasp)
            })
            .collect();

        debug!("Gaussian sampler kept {} of {} candidates", grasps.len(), num_grasps);
        grasps
    }

    /// Configuration the sampler was built with.
    #[must_use]
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Gripper the sampler plans for.
    #[must_use]
    pub fn gripper(&self) -> &GripperParams {
        &self.gripper
    }
}

impl<G: GraspGeometry> SampleGrasps for GaussianSampler<G> {
    fn config(&self) -> &SamplerConfig {
        &self.config
    }

    fn gripper(&self) -> &GripperParams {
        &self.gripper
    }

    /// Draws `target_num_grasps_per_size` candidates; the opening ratio is
    /// not used.
    fn sample_batch<O, R>(
        &self,
        object: &O,
        _request: &BatchRequest<'_>,
        rng: &mut R,
    ) -> Vec<ParallelJawGrasp>
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        self.sample_grasps(object, self.config.target_num_grasps_per_size, rng)
    }
}

/// Standard normal draw via Box-Muller.
pub(crate) fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.r#gen::<f64>().max(1e-300);
    let u2: f64 = rng.r#gen();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Direction uniform over the unit sphere.
pub(crate) fn uniform_direction<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f64> {
    let theta = TAU * rng.r#gen::<f64>();
    let phi = (2.0 * rng.r#gen::<f64>() - 1.0).acos();
    Vector3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}
