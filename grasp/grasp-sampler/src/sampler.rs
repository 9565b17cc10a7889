//! The sampler interface and the closed set of sampling strategies.

use grasp_contact::{ContactModel, GraspGeometry, LineOfActionGeometry, PointContactModel};
use grasp_object::GraspableObject;
use grasp_types::{Contact, FrictionCone, GripperParams, ParallelJawGrasp, SamplerConfig};
use rand::Rng;

use crate::antipodal::AntipodalSampler;
use crate::gaussian::GaussianSampler;
use crate::uniform::UniformSampler;

/// Observer for intermediate sampling state, used for debugging plots.
///
/// Every method defaults to a no-op. Acceptance never depends on the
/// visualizer.
pub trait GraspVisualizer {
    /// A candidate first contact and its friction cone.
    fn candidate(&self, _contact: &Contact, _cone: &FrictionCone) {}

    /// A grasp that passed every test, with its closing contacts.
    fn accepted(&self, _grasp: &ParallelJawGrasp, _contacts: &[Contact; 2]) {}
}

/// Parameters of one sampling batch.
#[derive(Clone, Copy)]
pub struct BatchRequest<'a> {
    /// Index of the current opening ratio in `ratios`.
    pub ratio_index: usize,
    /// All opening ratios, ascending.
    pub ratios: &'a [f64],
    /// Optional debugging observer.
    pub visualizer: Option<&'a dyn GraspVisualizer>,
}

impl<'a> BatchRequest<'a> {
    /// Request a batch for `ratios[ratio_index]` without a visualizer.
    #[must_use]
    pub fn new(ratio_index: usize, ratios: &'a [f64]) -> Self {
        Self {
            ratio_index,
            ratios,
            visualizer: None,
        }
    }

    /// Attach a visualizer.
    #[must_use]
    pub fn with_visualizer(mut self, visualizer: &'a dyn GraspVisualizer) -> Self {
        self.visualizer = Some(visualizer);
        self
    }

    /// Opening ratio of this batch, if the index is valid.
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        self.ratios.get(self.ratio_index).copied()
    }
}

impl std::fmt::Debug for BatchRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRequest")
            .field("ratio_index", &self.ratio_index)
            .field("ratios", &self.ratios)
            .field("visualizer", &self.visualizer.is_some())
            .finish()
    }
}

/// A strategy that produces one batch of candidate grasps.
pub trait SampleGrasps {
    /// Configuration the sampler was built with.
    fn config(&self) -> &SamplerConfig;

    /// Gripper the sampler plans for.
    fn gripper(&self) -> &GripperParams;

    /// Produce one batch of grasps. May return fewer than requested, or none.
    fn sample_batch<O, R>(
        &self,
        object: &O,
        request: &BatchRequest<'_>,
        rng: &mut R,
    ) -> Vec<ParallelJawGrasp>
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized;
}

/// Any of the built-in sampling strategies.
#[derive(Debug, Clone)]
pub enum GraspSampler<C = PointContactModel, G = LineOfActionGeometry> {
    /// Random surface point pairs.
    Uniform(UniformSampler<G>),
    /// Gaussian centers around the center of mass with random axes.
    Gaussian(GaussianSampler<G>),
    /// Friction-cone rejection sampling.
    Antipodal(AntipodalSampler<C, G>),
}

impl<C, G> From<UniformSampler<G>> for GraspSampler<C, G> {
    fn from(sampler: UniformSampler<G>) -> Self {
        Self::Uniform(sampler)
    }
}

impl<C, G> From<GaussianSampler<G>> for GraspSampler<C, G> {
    fn from(sampler: GaussianSampler<G>) -> Self {
        Self::Gaussian(sampler)
    }
}

impl<C, G> From<AntipodalSampler<C, G>> for GraspSampler<C, G> {
    fn from(sampler: AntipodalSampler<C, G>) -> Self {
        Self::Antipodal(sampler)
    }
}

impl<C: ContactModel, G: GraspGeometry> SampleGrasps for GraspSampler<C, G> {
    fn config(&self) -> &SamplerConfig {
        match self {
            Self::Uniform(s) => s.config(),
            Self::Gaussian(s) => s.config(),
            Self::Antipodal(s) => s.config(),
        }
    }

    fn gripper(&self) -> &GripperParams {
        match self {
            Self::Uniform(s) => s.gripper(),
            Self::Gaussian(s) => s.gripper(),
            Self::Antipodal(s) => s.gripper(),
        }
    }

    fn sample_batch<O, R>(
        &self,
        object: &O,
        request: &BatchRequest<'_>,
        rng: &mut R,
    ) -> Vec<ParallelJawGrasp>
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            Self::Uniform(s) => s.sample_batch(object, request, rng),
            Self::Gaussian(s) => s.sample_batch(object, request, rng),
            Self::Antipodal(s) => s.sample_batch(object, request, rng),
        }
    }
}
