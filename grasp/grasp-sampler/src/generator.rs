//! Multi-ratio grasp generation.

use std::collections::BTreeMap;

use grasp_object::GraspableObject;
use grasp_types::{ParallelJawGrasp, StablePose};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use crate::diversity::DiversitySelector;
use crate::sampler::{BatchRequest, GraspVisualizer, SampleGrasps};

/// Default number of sampling rounds per opening ratio.
pub const DEFAULT_MAX_ITER: usize = 3;

/// Drives a sampler across opening ratios until each ratio has its target
/// number of grasps or the round budget runs out.
///
/// # Example
///
/// ```
/// use grasp_object::SdfObject;
/// use grasp_sampler::{AntipodalSampler, GraspGenerator};
/// use grasp_types::{GripperParams, SamplerConfig};
/// use nalgebra::Vector3;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let cube = SdfObject::cuboid(Vector3::new(0.05, 0.05, 0.05), 0.005, 6).unwrap();
/// let config = SamplerConfig::from_json_str(r#"{
///     "sampling_friction_coef": 1.0,
///     "num_cone_faces": 8,
///     "grasp_samples_per_surface_point": 1,
///     "target_num_grasps": 10,
///     "target_num_grasps_per_size": 5,
///     "openning_ratios": [0.75, 1.0],
///     "min_contact_dist": 0.01,
///     "num_grasp_rots": 8,
///     "max_num_surface_points": 20
/// }"#).unwrap();
///
/// let sampler = AntipodalSampler::new(GripperParams::new(0.0, 0.1).unwrap(), config).unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let grasps = GraspGenerator::new().generate_grasps(&sampler, &cube, None, &mut rng);
/// assert!(grasps.len() <= 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraspGenerator {
    max_iter: usize,
}

impl Default for GraspGenerator {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl GraspGenerator {
    /// Create a generator with the default round budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sampling rounds per opening ratio.
    #[must_use]
    pub const fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sampling rounds per opening ratio.
    #[must_use]
    pub const fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Generate grasps for every opening ratio of the sampler's
    /// configuration.
    ///
    /// Each ratio collects at most `target_num_grasps_per_size` grasps, then
    /// is optionally down-selected for diversity. The combined set is
    /// shuffled. Short results are not padded.
    pub fn generate_grasps<S, O, R>(
        &self,
        sampler: &S,
        object: &O,
        visualizer: Option<&dyn GraspVisualizer>,
        rng: &mut R,
    ) -> Vec<ParallelJawGrasp>
    where
        S: SampleGrasps + ?Sized,
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        let config = sampler.config();
        let target = config.target_num_grasps_per_size;
        let ratios = config.opening_ratios.as_slice();
        let mut grasps = Vec::new();

        for (ratio_index, &ratio) in ratios.iter().enumerate() {
            let request = BatchRequest {
                ratio_index,
                ratios,
                visualizer,
            };

            let mut cur_grasps = Vec::new();
            for k in 1..=self.max_iter {
                if cur_grasps.len() >= target {
                    break;
                }
                cur_grasps.extend(sampler.sample_batch(object, &request, rng));
                info!(
                    "{}/{} grasps for opening ratio {:.1} found after iteration {}.",
                    cur_grasps.len(),
                    target,
                    ratio,
                    k
                );
            }

            cur_grasps.shuffle(rng);
            if cur_grasps.len() > target {
                info!("Truncating {} grasps to {}.", cur_grasps.len(), target);
                cur_grasps.truncate(target);
            }

            if let Some(params) = &config.diversity {
                cur_grasps = DiversitySelector::new(params.clone())
                    .with_dist_thresh_multiplier(config.grasp_dist_thresh)
                    .select(object, cur_grasps, rng);
            }

            grasps.extend(cur_grasps);
        }

        grasps.shuffle(rng);
        info!("Found {} grasps.", grasps.len());
        grasps
    }

    /// Generate grasps once, then align every grasp's approach direction to
    /// each stable pose.
    ///
    /// Returns the aligned grasps keyed by stable pose identifier.
    pub fn generate_grasps_stable_poses<S, O, R>(
        &self,
        sampler: &S,
        object: &O,
        stable_poses: &[StablePose],
        visualizer: Option<&dyn GraspVisualizer>,
        rng: &mut R,
    ) -> BTreeMap<String, Vec<ParallelJawGrasp>>
    where
        S: SampleGrasps + ?Sized,
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        let unaligned = self.generate_grasps(sampler, object, visualizer, rng);
        let num_rots = sampler.config().num_grasp_rots;

        stable_poses
            .iter()
            .map(|pose| {
                let aligned = unaligned
                    .iter()
                    .map(|grasp| grasp.perpendicular_table(pose, num_rots))
                    .collect();
                (pose.id.clone(), aligned)
            })
            .collect()
    }
}
