//! Parallel-jaw grasp sampling over voxelized objects.
//!
//! Three strategies implement [`SampleGrasps`]:
//!
//! - [`AntipodalSampler`] - Friction-cone rejection sampling from surface
//!   points, with force-closure filtering and opening-width minimization
//! - [`UniformSampler`] - Random surface point pairs
//! - [`GaussianSampler`] - Gaussian centers around the center of mass with
//!   uniformly random axes
//!
//! [`GraspGenerator`] runs a sampler across every opening ratio of a
//! [`SamplerConfig`](grasp_types::SamplerConfig), caps each ratio at its
//! target, optionally down-selects with a [`DiversitySelector`], and can
//! align the result to a set of stable poses.
//!
//! All randomness comes from a caller-supplied [`rand::Rng`], so runs are
//! reproducible with a seeded generator.
//!
//! # Example
//!
//! ```
//! use grasp_object::SdfObject;
//! use grasp_sampler::{GaussianSampler, GraspGenerator, GraspSampler};
//! use grasp_types::{GripperParams, SamplerConfig};
//! use nalgebra::Vector3;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let cube = SdfObject::cuboid(Vector3::new(0.04, 0.04, 0.04), 0.004, 4).unwrap();
//! let config = SamplerConfig::from_json_str(r#"{
//!     "sampling_friction_coef": 0.5,
//!     "num_cone_faces": 8,
//!     "grasp_samples_per_surface_point": 2,
//!     "target_num_grasps": 20,
//!     "target_num_grasps_per_size": 10,
//!     "openning_ratios": [1.0],
//!     "min_contact_dist": 0.005,
//!     "num_grasp_rots": 8
//! }"#).unwrap();
//!
//! let sampler: GraspSampler =
//!     GaussianSampler::new(GripperParams::new(0.0, 0.08).unwrap(), config).unwrap().into();
//! let mut rng = StdRng::seed_from_u64(3);
//! let grasps = GraspGenerator::new().generate_grasps(&sampler, &cube, None, &mut rng);
//! assert!(grasps.len() <= 10);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod antipodal;
mod diversity;
mod error;
mod gaussian;
mod generator;
mod sampler;
mod termination;
mod uniform;

pub use antipodal::AntipodalSampler;
pub use diversity::{DiversitySelector, FEATURE_DIM, GraspFeature, explained_variance_ratio};
pub use error::{SamplerError, SamplerResult};
pub use gaussian::GaussianSampler;
pub use generator::{DEFAULT_MAX_ITER, GraspGenerator};
pub use sampler::{BatchRequest, GraspSampler, GraspVisualizer, SampleGrasps};
pub use termination::{PredictiveModel, TerminationCondition, TerminationState};
pub use uniform::UniformSampler;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use grasp_object::SdfObject;
    use grasp_types::SamplerConfig;
    use nalgebra::Vector3;

    /// Edge length of the shared test cube.
    pub(crate) const CUBE_EDGE: f64 = 0.0625;

    /// Origin-centered cube voxelized at 1/128 with eight voxels of padding.
    pub(crate) fn small_cube() -> SdfObject {
        SdfObject::cuboid(Vector3::repeat(CUBE_EDGE), 0.007_812_5, 8).unwrap()
    }

    pub(crate) fn cube_config() -> SamplerConfig {
        SamplerConfig {
            friction_coef: 1.0,
            num_cone_faces: 8,
            num_samples: 2,
            target_num_grasps: 20,
            target_num_grasps_per_size: 10,
            opening_ratios: vec![0.5, 1.0],
            min_contact_dist: CUBE_EDGE / 4.0,
            num_grasp_rots: 8,
            max_num_surface_points: 30,
            grasp_dist_thresh: 0.0,
            max_num_samples: SamplerConfig::DEFAULT_MAX_NUM_SAMPLES,
            sigma_scale: SamplerConfig::DEFAULT_SIGMA_SCALE,
            diversity: None,
        }
    }
}
