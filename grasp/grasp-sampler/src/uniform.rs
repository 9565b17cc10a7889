//! Uniform surface point-pair sampling.

use grasp_contact::{GraspGeometry, LineOfActionGeometry};
use grasp_object::GraspableObject;
use grasp_types::{GripperParams, ParallelJawGrasp, SamplerConfig};
use nalgebra::Point3;
use rand::Rng;
use rand::seq::index;
use tracing::debug;

use crate::error::SamplerResult;
use crate::sampler::{BatchRequest, SampleGrasps};

/// Samples grasps from pairs of surface points drawn uniformly at random.
///
/// A pair is kept when its separation lies strictly between the gripper's
/// minimum and maximum widths and the fingers close on the object when the
/// grasp is opened to the maximum width.
#[derive(Debug, Clone)]
pub struct UniformSampler<G = LineOfActionGeometry> {
    gripper: GripperParams,
    config: SamplerConfig,
    geometry: G,
}

impl UniformSampler {
    /// Create a sampler with the default finger geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the gripper or configuration is invalid.
    pub fn new(gripper: GripperParams, config: SamplerConfig) -> SamplerResult<Self> {
        Self::with_geometry(gripper, config, LineOfActionGeometry::default())
    }
}

impl<G: GraspGeometry> UniformSampler<G> {
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

    /// Sample up to `num_grasps` grasps, drawing at most
    /// `max_num_samples` point pairs.
    pub fn sample_grasps<O, R>(&self, object: &O, num_grasps: usize, rng: &mut R) -> Vec<ParallelJawGrasp>
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        self.sample_counting_draws(object, num_grasps, rng).0
    }

    /// Sampling loop that also reports how many pairs were drawn.
    pub(crate) fn sample_counting_draws<O, R>(
        &self,
        object: &O,
        num_grasps: usize,
        rng: &mut R,
    ) -> (Vec<ParallelJawGrasp>, usize)
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        let surface_points = object.surface_points();
        let mut grasps = Vec::new();
        if surface_points.len() < 2 {
            debug!("Too few surface points for uniform sampling");
            return (grasps, 0);
        }

        let mut draws = 0;
        while grasps.len() < num_grasps && draws < self.config.max_num_samples {
            draws += 1;
            let pair = index::sample(rng, surface_points.len(), 2);
            let p0 = surface_points[pair.index(0)];
            let p1 = surface_points[pair.index(1)];
            if let Some(grasp) = self.accept_pair(object, p0, p1) {
                grasps.push(grasp);
            }
        }

        debug!("Uniform sampler kept {} grasps after {} draws", grasps.len(), draws);
        (grasps, draws)
    }

    /// Grasp through `p0` and `p1`, if their separation lies strictly
    /// inside the gripper's width range and the fingers close on `object`.
    pub(crate) fn accept_pair<O>(&self, object: &O, p0: Point3<f64>, p1: Point3<f64>) -> Option<ParallelJawGrasp>
    where
        O: GraspableObject + ?Sized,
    {
        let separation = (p1 - p0).norm();
        if separation <= self.gripper.min_width || separation >= self.gripper.max_width {
            return None;
        }

        let grasp = ParallelJawGrasp::from_endpoints(p0, p1, self.gripper.max_width).ok()?;
        self.geometry.close_fingers(&grasp, object).map(|_| grasp)
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

impl<G: GraspGeometry> SampleGrasps for UniformSampler<G> {
    fn config(&self) -> &SamplerConfig {
        &self.config
    }

    fn gripper(&self) -> &GripperParams {
        &self.gripper
    }

    /// Samples up to `target_num_grasps_per_size` grasps; the opening ratio
    /// is not used.
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
