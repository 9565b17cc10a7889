//! Graspable object capability.

use nalgebra::{Point3, Vector3};

use crate::error::ObjectResult;
use crate::mesh::ObjectMesh;
use crate::sdf::SdfGrid;

/// What grasp samplers need to know about an object.
///
/// All points and vectors are in the object frame.
pub trait GraspableObject {
    /// Points on the object boundary.
    fn surface_points(&self) -> Vec<Point3<f64>>;

    /// Edge length of one voxel of the distance field.
    fn sdf_resolution(&self) -> f64;

    /// Distance below which a point counts as lying on the surface.
    fn surface_threshold(&self) -> f64;

    /// Signed distance to the surface, negative inside. `None` outside the
    /// sampled region.
    fn signed_distance(&self, point: &Point3<f64>) -> Option<f64>;

    /// Outward unit normal at a surface point, or `None` if undefined.
    fn surface_normal(&self, point: &Point3<f64>) -> Option<Vector3<f64>>;

    /// Center of mass.
    fn center_of_mass(&self) -> Point3<f64>;

    /// Extents of the object along its principal axes.
    fn principal_dims(&self) -> Vector3<f64>;

    /// Convert an object-frame point to distance-field grid coordinates.
    fn transform_pt_obj_to_grid(&self, point: &Point3<f64>) -> Point3<f64>;

    /// Convert distance-field grid coordinates to an object-frame point.
    fn transform_pt_grid_to_obj(&self, grid_point: &Point3<f64>) -> Point3<f64>;
}

/// An object described by a voxelized distance field and its source mesh.
///
/// # Example
///
/// ```
/// use grasp_object::{GraspableObject, SdfObject};
/// use nalgebra::{Point3, Vector3};
///
/// let cube = SdfObject::cuboid(Vector3::new(0.05, 0.05, 0.05), 0.0025, 4).unwrap();
/// assert!(!cube.surface_points().is_empty());
///
/// let n = cube.surface_normal(&Point3::new(0.025, 0.0, 0.0)).unwrap();
/// assert!(n.x > 0.99);
/// ```
#[derive(Debug, Clone)]
pub struct SdfObject {
    sdf: SdfGrid,
    mesh: ObjectMesh,
}

impl SdfObject {
    /// Pair a distance field with the mesh it describes.
    #[must_use]
    pub fn new(sdf: SdfGrid, mesh: ObjectMesh) -> Self {
        Self { sdf, mesh }
    }

    /// Voxelize `mesh` at `resolution` with `padding` voxels of margin.
    ///
    /// # Errors
    ///
    /// See [`SdfGrid::from_mesh`].
    pub fn from_mesh(mesh: ObjectMesh, resolution: f64, padding: usize) -> ObjectResult<Self> {
        let sdf = SdfGrid::from_mesh(&mesh, resolution, padding)?;
        Ok(Self { sdf, mesh })
    }

    /// Box centered at the origin, sampled from its exact distance function.
    ///
    /// # Errors
    ///
    /// Returns an error if `resolution` is not positive.
    pub fn cuboid(extents: Vector3<f64>, resolution: f64, padding: usize) -> ObjectResult<Self> {
        let half = extents * 0.5;
        #[allow(clippy::cast_precision_loss)]
        let pad = padding as f64 * resolution;
        let origin = Point3::from(-half) - Vector3::repeat(pad);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let dims = [0, 1, 2].map(|axis| {
            (extents[axis] / resolution).ceil().max(0.0) as usize + 1 + 2 * padding
        });

        let sdf = SdfGrid::from_fn(origin, dims, resolution, |p| box_distance(&p, &half))?;
        Ok(Self {
            sdf,
            mesh: ObjectMesh::cuboid(extents),
        })
    }

    /// Underlying distance field.
    #[must_use]
    pub fn sdf(&self) -> &SdfGrid {
        &self.sdf
    }

    /// Underlying mesh.
    #[must_use]
    pub fn mesh(&self) -> &ObjectMesh {
        &self.mesh
    }
}

impl GraspableObject for SdfObject {
    fn surface_points(&self) -> Vec<Point3<f64>> {
        self.sdf.surface_points()
    }

    fn sdf_resolution(&self) -> f64 {
        self.sdf.resolution()
    }

    fn surface_threshold(&self) -> f64 {
        self.sdf.surface_threshold()
    }

    fn signed_distance(&self, point: &Point3<f64>) -> Option<f64> {
        self.sdf.signed_distance(point)
    }

    fn surface_normal(&self, point: &Point3<f64>) -> Option<Vector3<f64>> {
        self.sdf.gradient(point)?.try_normalize(f64::EPSILON)
    }

    fn center_of_mass(&self) -> Point3<f64> {
        self.mesh.center_of_mass()
    }

    fn principal_dims(&self) -> Vector3<f64> {
        self.mesh.principal_dims()
    }

    fn transform_pt_obj_to_grid(&self, point: &Point3<f64>) -> Point3<f64> {
        self.sdf.transform_pt_obj_to_grid(point)
    }

    fn transform_pt_grid_to_obj(&self, grid_point: &Point3<f64>) -> Point3<f64> {
        self.sdf.transform_pt_grid_to_obj(grid_point)
    }
}

/// Exact signed distance to an origin-centered box with half extents `half`.
fn box_distance(p: &Point3<f64>, half: &Vector3<f64>) -> f64 {
    let q = p.coords.abs() - half;
    let outside = q.sup(&Vector3::zeros()).norm();
    let inside = q.max().min(0.0);
    outside + inside
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_distance_cases() {
        let half = Vector3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(box_distance(&Point3::origin(), &half), -1.0);
        assert_relative_eq!(box_distance(&Point3::new(2.0, 0.0, 0.0), &half), 1.0);
        assert_relative_eq!(
            box_distance(&Point3::new(2.0, 3.0, 0.0), &half),
            2.0_f64.sqrt()
        );
    }

    #[test]
    fn cuboid_object_queries() {
        let obj = SdfObject::cuboid(Vector3::new(0.5, 0.5, 0.5), 0.0625, 2).unwrap();
        assert_eq!(obj.sdf().dims(), [13, 13, 13]);
        assert_relative_eq!(obj.sdf_resolution(), 0.0625);
        assert_relative_eq!(
            obj.surface_threshold(),
            0.0625 * std::f64::consts::SQRT_2 / 2.0
        );
        assert_relative_eq!(obj.center_of_mass(), Point3::origin(), epsilon = 1e-12);
        assert_relative_eq!(obj.principal_dims(), Vector3::new(0.5, 0.5, 0.5));

        let n = obj.surface_normal(&Point3::new(0.0, -0.25, 0.0)).unwrap();
        assert_relative_eq!(n, -Vector3::y(), epsilon = 1e-9);
        assert!(obj.surface_normal(&Point3::new(1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn surface_points_hug_the_faces() {
        let obj = SdfObject::cuboid(Vector3::new(0.5, 0.5, 0.5), 0.0625, 2).unwrap();
        let pts = obj.surface_points();
        assert!(!pts.is_empty());
        for p in &pts {
            let d = obj.signed_distance(p).unwrap();
            assert!(d.abs() < obj.surface_threshold());
        }
    }

    #[test]
    fn mesh_backed_object_agrees_with_analytic_box() {
        let extents = Vector3::new(0.5, 0.25, 0.5);
        let from_mesh =
            SdfObject::from_mesh(ObjectMesh::cuboid(extents), 0.0625, 2).unwrap();
        let analytic = SdfObject::cuboid(extents, 0.0625, 2).unwrap();
        assert_eq!(from_mesh.sdf().dims(), analytic.sdf().dims());
        for p in [
            Point3::new(0.1, 0.05, -0.2),
            Point3::new(0.3, 0.0, 0.0),
            Point3::new(-0.2, 0.1, 0.2),
        ] {
            assert_relative_eq!(
                from_mesh.signed_distance(&p).unwrap(),
                analytic.signed_distance(&p).unwrap(),
                epsilon = 1e-9
            );
        }
    }
}
