//! Voxelized signed distance fields.
//!
//! An [`SdfGrid`] samples the signed distance to an object's surface on a
//! regular lattice of nodes. Queries between nodes are trilinearly
//! interpolated; queries outside the lattice return `None`.
//!
//! Grid coordinates are continuous node indices: node `(i, j, k)` sits at
//! `origin + resolution * (i, j, k)` in the object frame.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::error::{ObjectError, ObjectResult};
use crate::mesh::ObjectMesh;
use crate::query::mesh_signed_distance;

/// Slack for treating points on the lattice boundary as inside it.
const BOUNDS_EPS: f64 = 1e-9;

/// A signed distance field sampled on a dense voxel grid.
///
/// Values are negative inside the object and positive outside.
///
/// # Example
///
/// ```
/// use grasp_object::SdfGrid;
/// use nalgebra::Point3;
///
/// // Sphere of radius 0.5 sampled on an 11^3 grid spanning [-1, 1]^3
/// let sdf = SdfGrid::from_fn(Point3::new(-1.0, -1.0, -1.0), [11, 11, 11], 0.2, |p| {
///     p.coords.norm() - 0.5
/// })
/// .unwrap();
///
/// let d = sdf.signed_distance(&Point3::origin()).unwrap();
/// assert!((d + 0.5).abs() < 1e-9);
/// assert!(sdf.signed_distance(&Point3::new(2.0, 0.0, 0.0)).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SdfGrid {
    origin: Point3<f64>,
    dims: [usize; 3],
    resolution: f64,
    surface_threshold: f64,
    /// Node values, x fastest: `i + nx * (j + ny * k)`.
    data: Vec<f64>,
}

impl SdfGrid {
    /// Build a grid from per-node values.
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is below 2, the resolution is not
    /// positive, or `data` does not hold one value per node.
    pub fn from_values(
        origin: Point3<f64>,
        dims: [usize; 3],
        resolution: f64,
        data: Vec<f64>,
    ) -> ObjectResult<Self> {
        if dims.iter().any(|&n| n < 2) {
            return Err(ObjectError::InvalidDimensions(format!(
                "{}x{}x{} (each axis needs at least 2 nodes)",
                dims[0], dims[1], dims[2]
            )));
        }
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(ObjectError::InvalidResolution(resolution));
        }
        let expected = dims[0] * dims[1] * dims[2];
        if data.len() != expected {
            return Err(ObjectError::DataLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            origin,
            dims,
            resolution,
            surface_threshold: resolution * std::f64::consts::SQRT_2 / 2.0,
            data,
        })
    }

    /// Build a grid by evaluating `f` at every node.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SdfGrid::from_values`].
    pub fn from_fn(
        origin: Point3<f64>,
        dims: [usize; 3],
        resolution: f64,
        mut f: impl FnMut(Point3<f64>) -> f64,
    ) -> ObjectResult<Self> {
        let [nx, ny, nz] = dims;
        let mut data = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    data.push(f(node_position(origin, resolution, i, j, k)));
                }
            }
        }
        Self::from_values(origin, dims, resolution, data)
    }

    /// Voxelize a closed, outward-wound mesh.
    ///
    /// The lattice covers the mesh bounding box plus `padding` voxels on
    /// every side.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is empty or has invalid face indices, or
    /// if the resolution is not positive.
    pub fn from_mesh(mesh: &ObjectMesh, resolution: f64, padding: usize) -> ObjectResult<Self> {
        if mesh.is_empty() {
            return Err(ObjectError::EmptyMesh);
        }
        mesh.validate()?;
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(ObjectError::InvalidResolution(resolution));
        }
        let (lo, hi) = mesh.bounding_box().ok_or(ObjectError::EmptyMesh)?;

        #[allow(clippy::cast_precision_loss)]
        let pad = padding as f64 * resolution;
        let origin = lo - Vector3::repeat(pad);
        let extent = hi - lo;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let dims = [0, 1, 2].map(|axis| {
            (extent[axis] / resolution).ceil() as usize + 1 + 2 * padding
        });

        debug!(
            nx = dims[0],
            ny = dims[1],
            nz = dims[2],
            resolution,
            faces = mesh.faces.len(),
            "voxelizing mesh"
        );

        let normals = mesh.face_normals();
        Self::from_fn(origin, dims, resolution, |p| {
            mesh_signed_distance(p, mesh, &normals)
        })
    }

    /// Replace the surface threshold (defaults to `resolution·√2/2`).
    #[must_use]
    pub fn with_surface_threshold(mut self, threshold: f64) -> Self {
        self.surface_threshold = threshold;
        self
    }

    /// Object-frame position of node `(0, 0, 0)`.
    #[must_use]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Node counts along each axis.
    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Edge length of one voxel.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Distance below which a node counts as lying on the surface.
    #[must_use]
    pub fn surface_threshold(&self) -> f64 {
        self.surface_threshold
    }

    /// Object-frame corners of the lattice as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        let max = node_position(
            self.origin,
            self.resolution,
            self.dims[0] - 1,
            self.dims[1] - 1,
            self.dims[2] - 1,
        );
        (self.origin, max)
    }

    /// Value stored at node `(i, j, k)`.
    #[must_use]
    pub fn value(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        let [nx, ny, nz] = self.dims;
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        self.data.get(i + nx * (j + ny * k)).copied()
    }

    /// Convert an object-frame point to continuous grid coordinates.
    #[must_use]
    pub fn transform_pt_obj_to_grid(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from((point - self.origin) / self.resolution)
    }

    /// Convert continuous grid coordinates to an object-frame point.
    #[must_use]
    pub fn transform_pt_grid_to_obj(&self, grid_point: &Point3<f64>) -> Point3<f64> {
        self.origin + grid_point.coords * self.resolution
    }

    /// Whether continuous grid coordinates fall outside the lattice.
    #[must_use]
    pub fn is_out_of_bounds(&self, grid_point: &Point3<f64>) -> bool {
        (0..3).any(|axis| {
            #[allow(clippy::cast_precision_loss)]
            let upper = (self.dims[axis] - 1) as f64;
            let g = grid_point[axis];
            !g.is_finite() || g < -BOUNDS_EPS || g > upper + BOUNDS_EPS
        })
    }

    /// Trilinearly interpolated signed distance at an object-frame point.
    ///
    /// Returns `None` outside the lattice.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> Option<f64> {
        let g = self.transform_pt_obj_to_grid(point);
        if self.is_out_of_bounds(&g) {
            return None;
        }

        let mut base = [0usize; 3];
        let mut frac = [0.0f64; 3];
        for axis in 0..3 {
            #[allow(clippy::cast_precision_loss)]
            let max_base = (self.dims[axis] - 2) as f64;
            let b = g[axis].floor().clamp(0.0, max_base);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                base[axis] = b as usize;
            }
            frac[axis] = (g[axis] - b).clamp(0.0, 1.0);
        }

        let [i, j, k] = base;
        let [tx, ty, tz] = frac;
        let v = |di: usize, dj: usize, dk: usize| self.value(i + di, j + dj, k + dk);

        let c00 = lerp(v(0, 0, 0)?, v(1, 0, 0)?, tx);
        let c10 = lerp(v(0, 1, 0)?, v(1, 1, 0)?, tx);
        let c01 = lerp(v(0, 0, 1)?, v(1, 0, 1)?, tx);
        let c11 = lerp(v(0, 1, 1)?, v(1, 1, 1)?, tx);
        let c0 = lerp(c00, c10, ty);
        let c1 = lerp(c01, c11, ty);
        Some(lerp(c0, c1, tz))
    }

    /// Finite-difference gradient of the field at an object-frame point.
    ///
    /// Uses central differences with a one-voxel step, falling back to a
    /// one-sided difference against the lattice boundary. Returns `None` if
    /// the point itself is outside the lattice.
    #[must_use]
    pub fn gradient(&self, point: &Point3<f64>) -> Option<Vector3<f64>> {
        let center = self.signed_distance(point)?;
        let h = self.resolution;
        let mut grad = Vector3::zeros();

        for axis in 0..3 {
            let mut offset = Vector3::zeros();
            offset[axis] = h;
            let fwd = self.signed_distance(&(point + offset));
            let bwd = self.signed_distance(&(point - offset));
            grad[axis] = match (fwd, bwd) {
                (Some(f), Some(b)) => (f - b) / (2.0 * h),
                (Some(f), None) => (f - center) / h,
                (None, Some(b)) => (center - b) / h,
                (None, None) => return None,
            };
        }

        Some(grad)
    }

    /// Object-frame positions of all nodes within the surface threshold.
    #[must_use]
    pub fn surface_points(&self) -> Vec<Point3<f64>> {
        let [nx, ny, _] = self.dims;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, d)| d.abs() < self.surface_threshold)
            .map(|(idx, _)| {
                let i = idx % nx;
                let j = (idx / nx) % ny;
                let k = idx / (nx * ny);
                node_position(self.origin, self.resolution, i, j, k)
            })
            .collect()
    }

    /// Whether a point lies within the surface threshold.
    ///
    /// Returns `None` outside the lattice.
    #[must_use]
    pub fn on_surface(&self, point: &Point3<f64>) -> Option<bool> {
        self.signed_distance(point)
            .map(|d| d.abs() < self.surface_threshold)
    }
}

#[allow(clippy::cast_precision_loss)]
fn node_position(origin: Point3<f64>, resolution: f64, i: usize, j: usize, k: usize) -> Point3<f64> {
    origin + Vector3::new(i as f64, j as f64, k as f64) * resolution
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}
