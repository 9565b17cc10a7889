//! Parallel-jaw finger geometry: lines of action and contact search.
//!
//! A finger is modelled as a point moving along a straight line of action.
//! The line is sampled at a fixed density per voxel of the object's distance
//! field, and the first sample at or below the zero level marks contact.

use grasp_object::GraspableObject;
use grasp_types::{Contact, ParallelJawGrasp};
use nalgebra::{Point3, Vector3};
use tracing::trace;

/// Minimum number of samples on any line of action.
const MIN_LINE_SAMPLES: usize = 3;

/// Finger-closing and partner-contact search for parallel-jaw grasps.
pub trait GraspGeometry {
    /// Close both fingers of `grasp` on `object`.
    ///
    /// The fingers start at the jaw endpoints and each travels half the
    /// opening toward the center. Returns the two contacts, or `None` if
    /// either finger misses the object or starts in collision.
    fn close_fingers<O>(&self, grasp: &ParallelJawGrasp, object: &O) -> Option<[Contact; 2]>
    where
        O: GraspableObject + ?Sized;

    /// Build a grasp from a surface point and a closing direction.
    ///
    /// The first finger backs off the surface and closes along `direction`
    /// to find `c1`. The second starts `width` beyond `c1` and closes back
    /// toward it, stopping `min_width` short. The grasp is centered between
    /// the two contacts and rolled by `approach_angle`.
    fn grasp_from_contact_and_axis<O>(
        &self,
        object: &O,
        point: &Point3<f64>,
        direction: &Vector3<f64>,
        width: f64,
        approach_angle: f64,
        min_width: f64,
    ) -> Option<(ParallelJawGrasp, Contact, Contact)>
    where
        O: GraspableObject + ?Sized;
}

/// Line-of-action finger model over a voxelized distance field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOfActionGeometry {
    samples_per_voxel: usize,
    backup_voxels: f64,
}

impl Default for LineOfActionGeometry {
    fn default() -> Self {
        Self {
            samples_per_voxel: 3,
            backup_voxels: 1.0,
        }
    }
}

impl LineOfActionGeometry {
    /// Create the default model (3 samples per voxel, 1 voxel backup).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling density along lines of action.
    #[must_use]
    pub fn with_samples_per_voxel(mut self, samples: usize) -> Self {
        self.samples_per_voxel = samples.max(1);
        self
    }

    /// Set how far, in voxels, the first finger backs off the surface point.
    #[must_use]
    pub fn with_backup_voxels(mut self, voxels: f64) -> Self {
        self.backup_voxels = voxels.max(0.0);
        self
    }

    /// Sample points from `start` along unit `direction` over `travel`.
    ///
    /// The first sample is `start` and the last is `start + travel·direction`.
    #[must_use]
    pub fn line_of_action(
        &self,
        start: &Point3<f64>,
        direction: &Vector3<f64>,
        travel: f64,
        resolution: f64,
    ) -> Vec<Point3<f64>> {
        let travel = travel.max(0.0);
        let voxels = if resolution > 0.0 {
            travel / resolution
        } else {
            0.0
        };
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let num = ((voxels * self.samples_per_voxel as f64).ceil() as usize).max(MIN_LINE_SAMPLES);

        #[allow(clippy::cast_precision_loss)]
        let step = travel / (num - 1) as f64;
        #[allow(clippy::cast_precision_loss)]
        (0..num)
            .map(|i| start + direction * (step * i as f64))
            .collect()
    }

    /// March along `line` and return the first surface contact.
    ///
    /// Samples outside the distance field count as free space. The contact
    /// lies at the interpolated zero crossing between the last free sample
    /// and the first sample at or below the surface. Returns `None` if the
    /// line starts deeper than the surface threshold or never reaches the
    /// surface.
    pub fn find_contact<O>(
        &self,
        object: &O,
        line: &[Point3<f64>],
        direction: &Vector3<f64>,
    ) -> Option<Contact>
    where
        O: GraspableObject + ?Sized,
    {
        let threshold = object.surface_threshold();
        let mut last_free: Option<(Point3<f64>, f64)> = None;

        for (idx, sample) in line.iter().enumerate() {
            let Some(dist) = object.signed_distance(sample) else {
                last_free = None;
                continue;
            };

            if idx == 0 && dist < -threshold {
                trace!(dist, "finger starts in collision");
                return None;
            }

            if dist <= 0.0 {
                let point = match last_free {
                    Some((free, free_dist)) if free_dist > 0.0 => {
                        let t = free_dist / (free_dist - dist);
                        free + (sample - free) * t
                    }
                    _ => *sample,
                };
                let normal = object
                    .surface_normal(&point)
                    .or_else(|| object.surface_normal(sample))?;
                return Contact::new(point, normal)
                    .ok()
                    .map(|c| c.with_in_direction(*direction));
            }

            last_free = Some((*sample, dist));
        }

        None
    }
}

impl GraspGeometry for LineOfActionGeometry {
    fn close_fingers<O>(&self, grasp: &ParallelJawGrasp, object: &O) -> Option<[Contact; 2]>
    where
        O: GraspableObject + ?Sized,
    {
        let axis = grasp.axis();
        let (g1, g2) = grasp.endpoints();
        let travel = grasp.max_width() / 2.0;
        let resolution = object.sdf_resolution();

        let line1 = self.line_of_action(&g1, &axis, travel, resolution);
        let c1 = self.find_contact(object, &line1, &axis)?;

        let line2 = self.line_of_action(&g2, &-axis, travel, resolution);
        let c2 = self.find_contact(object, &line2, &-axis)?;

        Some([c1, c2])
    }

    fn grasp_from_contact_and_axis<O>(
        &self,
        object: &O,
        point: &Point3<f64>,
        direction: &Vector3<f64>,
        width: f64,
        approach_angle: f64,
        min_width: f64,
    ) -> Option<(ParallelJawGrasp, Contact, Contact)>
    where
        O: GraspableObject + ?Sized,
    {
        let direction = direction.try_normalize(f64::EPSILON)?;
        let resolution = object.sdf_resolution();

        let start1 = point - direction * (self.backup_voxels * resolution);
        let line1 = self.line_of_action(&start1, &direction, width, resolution);
        let c1 = self.find_contact(object, &line1, &direction)?;

        let travel2 = width - min_width;
        if travel2 <= 0.0 {
            return None;
        }
        let start2 = c1.point() + direction * width;
        let line2 = self.line_of_action(&start2, &-direction, travel2, resolution);
        let c2 = self.find_contact(object, &line2, &-direction)?;

        let center = ParallelJawGrasp::center_from_endpoints(c1.point(), c2.point());
        let axis = ParallelJawGrasp::axis_from_endpoints(c1.point(), c2.point())?;
        let grasp = ParallelJawGrasp::new(center, axis, width)
            .ok()?
            .with_approach_angle(approach_angle);

        Some((grasp, c1, c2))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grasp_object::SdfObject;

    const L: f64 = 0.0625;
    const RES: f64 = 0.0078125;

    fn cube() -> SdfObject {
        SdfObject::cuboid(Vector3::new(L, L, L), RES, 8).unwrap()
    }

    #[test]
    fn line_of_action_spacing() {
        let geom = LineOfActionGeometry::new();
        let line = geom.line_of_action(&Point3::origin(), &Vector3::x(), 1.0, 0.25);
        assert_eq!(line.len(), 12);
        assert_relative_eq!(line[0], Point3::origin());
        assert_relative_eq!(line[11], Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);

        let short = geom.line_of_action(&Point3::origin(), &Vector3::x(), 0.0, 0.25);
        assert_eq!(short.len(), MIN_LINE_SAMPLES);
    }

    #[test]
    fn samples_per_voxel_sets_line_density() {
        let dense = LineOfActionGeometry::new().with_samples_per_voxel(5);
        let line = dense.line_of_action(&Point3::origin(), &Vector3::x(), 1.0, 0.25);
        assert_eq!(line.len(), 20);
        assert_relative_eq!(line[19], Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);

        // Zero is clamped to one sample per voxel
        let sparse = LineOfActionGeometry::new().with_samples_per_voxel(0);
        assert_eq!(sparse.line_of_action(&Point3::origin(), &Vector3::x(), 1.0, 0.25).len(), 4);
    }

    #[test]
    fn backup_distance_decides_where_the_first_finger_starts() {
        let obj = cube();
        // One and a half voxels below the +X face
        let point = Point3::new(L / 2.0 - 1.5 * RES, 0.0, 0.0);
        let grasp_with = |voxels: f64| {
            LineOfActionGeometry::new()
                .with_backup_voxels(voxels)
                .grasp_from_contact_and_axis(&obj, &point, &-Vector3::x(), 0.1, 0.0, 0.0)
        };

        // Without backup the finger starts deeper than the surface threshold
        assert!(grasp_with(0.0).is_none());
        assert!(grasp_with(-3.0).is_none());

        // One voxel leaves the finger inside the threshold, touching at its start
        let (_, c1, _) = grasp_with(1.0).unwrap();
        assert_relative_eq!(c1.point().x, L / 2.0 - 0.5 * RES, epsilon = 1e-12);

        // Two voxels start in free space and march onto the face
        let (grasp, c1, c2) = grasp_with(2.0).unwrap();
        assert_relative_eq!(c1.point().x, L / 2.0, epsilon = 1e-9);
        assert_relative_eq!(c2.point().x, -L / 2.0, epsilon = 1e-9);
        assert_relative_eq!(grasp.axis(), -Vector3::x(), epsilon = 1e-9);
    }

    #[test]
    fn find_contact_interpolates_zero_crossing() {
        let obj = cube();
        let geom = LineOfActionGeometry::new();
        let start = Point3::new(-0.06, 0.003, 0.0);
        let line = geom.line_of_action(&start, &Vector3::x(), 0.05, RES);
        let c = geom.find_contact(&obj, &line, &Vector3::x()).unwrap();

        assert_relative_eq!(c.point().x, -L / 2.0, epsilon = 1e-9);
        assert_relative_eq!(c.normal(), -Vector3::x(), epsilon = 1e-9);
        assert_relative_eq!(c.in_direction().unwrap(), Vector3::x());
    }

    #[test]
    fn find_contact_fails_in_collision_or_on_miss() {
        let obj = cube();
        let geom = LineOfActionGeometry::new();

        let inside = geom.line_of_action(&Point3::origin(), &Vector3::x(), 0.02, RES);
        assert!(geom.find_contact(&obj, &inside, &Vector3::x()).is_none());

        let miss_start = Point3::new(-0.06, 0.05, 0.0);
        let miss = geom.line_of_action(&miss_start, &Vector3::x(), 0.1, RES);
        assert!(geom.find_contact(&obj, &miss, &Vector3::x()).is_none());
    }

    #[test]
    fn out_of_bounds_samples_are_free_space() {
        let obj = cube();
        let geom = LineOfActionGeometry::new();
        // Starts far outside the grid and marches into the cube
        let start = Point3::new(-1.0, 0.0, 0.0);
        let line = geom.line_of_action(&start, &Vector3::x(), 1.0, RES);
        let c = geom.find_contact(&obj, &line, &Vector3::x()).unwrap();
        assert_relative_eq!(c.point().x, -L / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn close_fingers_on_cube() {
        let obj = cube();
        let geom = LineOfActionGeometry::new();
        let grasp = ParallelJawGrasp::new(Point3::new(0.0, 0.01, -0.005), Vector3::x(), 0.1).unwrap();
        let [c1, c2] = geom.close_fingers(&grasp, &obj).unwrap();

        assert_relative_eq!(c1.point().x, -L / 2.0, epsilon = 1e-9);
        assert_relative_eq!(c2.point().x, L / 2.0, epsilon = 1e-9);
        assert_relative_eq!(c1.distance_to(&c2), L, epsilon = 1e-9);
    }

    #[test]
    fn close_fingers_fails_when_too_narrow() {
        let obj = cube();
        let geom = LineOfActionGeometry::new();
        let grasp = ParallelJawGrasp::new(Point3::origin(), Vector3::x(), L / 2.0).unwrap();
        assert!(geom.close_fingers(&grasp, &obj).is_none());
    }

    #[test]
    fn grasp_from_surface_point() {
        let obj = cube();
        let geom = LineOfActionGeometry::new();
        let point = Point3::new(0.0, L / 2.0, 0.01);
        let (grasp, c1, c2) = geom
            .grasp_from_contact_and_axis(&obj, &point, &-Vector3::y(), 0.1, 0.3, 0.0)
            .unwrap();

        assert_relative_eq!(c1.point().y, L / 2.0, epsilon = 1e-9);
        assert_relative_eq!(c2.point().y, -L / 2.0, epsilon = 1e-9);
        assert_relative_eq!(grasp.axis(), -Vector3::y(), epsilon = 1e-9);
        assert_relative_eq!(grasp.center(), Point3::new(0.0, 0.0, 0.01), epsilon = 1e-9);
        assert_relative_eq!(grasp.max_width(), 0.1);
        assert_relative_eq!(grasp.approach_angle(), 0.3);
    }

    #[test]
    fn grasp_from_surface_point_respects_width() {
        let obj = cube();
        let geom = LineOfActionGeometry::new();
        let point = Point3::new(0.0, L / 2.0, 0.0);
        // Second finger would start inside the cube
        assert!(geom
            .grasp_from_contact_and_axis(&obj, &point, &-Vector3::y(), L / 2.0, 0.0, 0.0)
            .is_none());
        // No travel left for the second finger
        assert!(geom
            .grasp_from_contact_and_axis(&obj, &point, &-Vector3::y(), 0.1, 0.0, 0.1)
            .is_none());
    }
}
