//! Antipodal rejection sampling.
//!
//! For each retained surface point the sampler perturbs the point within a
//! voxel, draws a closing direction from the friction cone at that point,
//! searches for the opposite contact along it, and keeps the grasp only if
//! the re-closed contacts are far enough apart, admit friction cones and
//! are in force closure. Accepted grasps are then narrowed to the smallest
//! opening ratio at which the fingers still close.

use std::f64::consts::TAU;

use grasp_contact::{ContactModel, GraspGeometry, LineOfActionGeometry, PointContactModel};
use grasp_object::GraspableObject;
use grasp_types::{Contact, GripperParams, ParallelJawGrasp, SamplerConfig};
use nalgebra::{Point3, Vector3};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::error::SamplerResult;
use crate::sampler::{BatchRequest, GraspVisualizer, SampleGrasps};

/// Samples force-closure grasps by friction-cone rejection sampling.
///
/// # Example
///
/// ```
/// use grasp_object::SdfObject;
/// use grasp_sampler::{AntipodalSampler, BatchRequest, SampleGrasps};
/// use grasp_types::{GripperParams, SamplerConfig};
/// use nalgebra::Vector3;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let cube = SdfObject::cuboid(Vector3::new(0.05, 0.05, 0.05), 0.005, 6).unwrap();
/// let config = SamplerConfig::from_json_str(r#"{
///     "sampling_friction_coef": 1.0,
///     "num_cone_faces": 8,
///     "grasp_samples_per_surface_point": 2,
///     "target_num_grasps": 20,
///     "target_num_grasps_per_size": 10,
///     "openning_ratios": [1.0],
///     "min_contact_dist": 0.01,
///     "num_grasp_rots": 8,
///     "max_num_surface_points": 20
/// }"#).unwrap();
///
/// let sampler = AntipodalSampler::new(GripperParams::new(0.0, 0.08).unwrap(), config).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let ratios = [1.0];
/// let grasps = sampler.sample_batch(&cube, &BatchRequest::new(0, &ratios), &mut rng);
/// assert!(grasps.iter().all(|g| g.max_width() <= 0.08));
/// ```
#[derive(Debug, Clone)]
pub struct AntipodalSampler<C = PointContactModel, G = LineOfActionGeometry> {
    gripper: GripperParams,
    config: SamplerConfig,
    contact_model: C,
    geometry: G,
}

impl AntipodalSampler {
    /// Create a sampler with point contacts and line-of-action fingers.
    ///
    /// # Errors
    ///
    /// Returns an error if the gripper or configuration is invalid.
    pub fn new(gripper: GripperParams, config: SamplerConfig) -> SamplerResult<Self> {
        Self::with_models(
            gripper,
            config,
            PointContactModel,
            LineOfActionGeometry::default(),
        )
    }
}

impl<C: ContactModel, G: GraspGeometry> AntipodalSampler<C, G> {
    /// Create a sampler with custom contact and finger models.
    ///
    /// # Errors
    ///
    /// Returns an error if the gripper or configuration is invalid.
    pub fn with_models(
        gripper: GripperParams,
        config: SamplerConfig,
        contact_model: C,
        geometry: G,
    ) -> SamplerResult<Self> {
        gripper.validate()?;
        config.validate()?;
        Ok(Self {
            gripper,
            config,
            contact_model,
            geometry,
        })
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

    /// Run one batch of antipodal sampling for `ratios[ratio_index]`.
    ///
    /// Returns accepted grasps in discovery order. An out-of-range ratio
    /// index yields no grasps.
    pub fn sample_grasps<O, R>(
        &self,
        object: &O,
        ratio_index: usize,
        ratios: &[f64],
        visualizer: Option<&dyn GraspVisualizer>,
        rng: &mut R,
    ) -> Vec<ParallelJawGrasp>
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(&ratio) = ratios.get(ratio_index) else {
            debug!("Opening ratio index {} out of range", ratio_index);
            return Vec::new();
        };
        let width = self.gripper.width_at_ratio(ratio);

        let mut surface_points = object.surface_points();
        info!("Num surface: {}", surface_points.len());
        surface_points.shuffle(rng);
        surface_points.truncate(self.config.max_num_surface_points);

        let resolution = object.sdf_resolution();
        let mut grasps = Vec::new();

        for x_surf in &surface_points {
            for _ in 0..self.config.num_samples {
                let x1 = perturb_point(x_surf, resolution, rng);
                if let Some(grasp) =
                    self.try_trial(object, &x1, width, ratio_index, ratios, visualizer, rng)
                {
                    grasps.push(grasp);
                }
            }
        }

        debug!(
            "Antipodal sampler accepted {} grasps from {} surface points at ratio {:.2}",
            grasps.len(),
            surface_points.len(),
            ratio
        );
        grasps
    }

    /// One rejection-sampling trial from a perturbed surface point.
    #[allow(clippy::too_many_arguments)]
    fn try_trial<O, R>(
        &self,
        object: &O,
        x1: &Point3<f64>,
        width: f64,
        ratio_index: usize,
        ratios: &[f64],
        visualizer: Option<&dyn GraspVisualizer>,
        rng: &mut R,
    ) -> Option<ParallelJawGrasp>
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        let mu = self.config.friction_coef;
        let faces = self.config.num_cone_faces;

        let normal = object.surface_normal(x1)?;
        let first = Contact::new(*x1, normal).ok()?;
        let (_, tx, ty) = self.contact_model.tangents(&first);
        let cone = self.contact_model.friction_cone(&first, faces, mu)?;
        if let Some(vis) = visualizer {
            vis.candidate(&first, &cone);
        }

        let direction = sample_from_cone(&first.normal(), &tx, &ty, mu, rng)?;
        let approach_angle = TAU * rng.r#gen::<f64>();

        let (mut grasp, _, _) = self.geometry.grasp_from_contact_and_axis(
            object,
            x1,
            &direction,
            width,
            approach_angle,
            self.gripper.min_width,
        )?;

        let [c1, c2] = self.geometry.close_fingers(&grasp, object)?;
        if c1.distance_to(&c2) <= self.config.min_contact_dist {
            return None;
        }

        grasp.set_center(ParallelJawGrasp::center_from_endpoints(
            c1.point(),
            c2.point(),
        ));

        self.contact_model.friction_cone(&c1, faces, mu)?;
        self.contact_model.friction_cone(&c2, faces, mu)?;
        if !self.contact_model.force_closure(&c1, &c2, mu) {
            return None;
        }

        self.minimize_width(&mut grasp, object, ratio_index, ratios);

        if let Some(vis) = visualizer {
            vis.accepted(&grasp, &[c1, c2]);
        }
        Some(grasp)
    }

    /// Narrow `grasp` to the first smaller opening ratio at which the
    /// fingers still close, keeping the current width if none does.
    ///
    /// Ratios are expected in ascending order.
    fn minimize_width<O>(
        &self,
        grasp: &mut ParallelJawGrasp,
        object: &O,
        ratio_index: usize,
        ratios: &[f64],
    ) where
        O: GraspableObject + ?Sized,
    {
        let original = grasp.max_width();
        for &ratio in ratios.iter().take(ratio_index) {
            if grasp.set_max_width(self.gripper.width_at_ratio(ratio)).is_err() {
                continue;
            }
            if self.geometry.close_fingers(grasp, object).is_some() {
                return;
            }
        }
        // Restoring a width that was already valid cannot fail
        let _ = grasp.set_max_width(original);
    }
}

impl<C: ContactModel, G: GraspGeometry> SampleGrasps for AntipodalSampler<C, G> {
    fn config(&self) -> &SamplerConfig {
        &self.config
    }

    fn gripper(&self) -> &GripperParams {
        &self.gripper
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
        self.sample_grasps(
            object,
            request.ratio_index,
            request.ratios,
            request.visualizer,
            rng,
        )
    }
}

/// Uniform jitter of up to a quarter voxel along each axis.
pub(crate) fn perturb_point<R: Rng + ?Sized>(x: &Point3<f64>, resolution: f64, rng: &mut R) -> Point3<f64> {
    let jitter = Vector3::new(
        rng.r#gen::<f64>() - 0.5,
        rng.r#gen::<f64>() - 0.5,
        rng.r#gen::<f64>() - 0.5,
    );
    x + jitter * (resolution / 2.0)
}

/// Inward closing direction drawn from the friction cone at a contact.
///
/// The cone radius is drawn uniformly in `[0, mu)`, which concentrates
/// samples near the cone axis.
pub(crate) fn sample_from_cone<R: Rng + ?Sized>(
    normal: &Vector3<f64>,
    tx: &Vector3<f64>,
    ty: &Vector3<f64>,
    mu: f64,
    rng: &mut R,
) -> Option<Vector3<f64>> {
    let theta = TAU * rng.r#gen::<f64>();
    let r = mu * rng.r#gen::<f64>();
    let v = normal + tx * (r * theta.cos()) + ty * (r * theta.sin());
    v.try_normalize(f64::EPSILON).map(|v| -v)
}
