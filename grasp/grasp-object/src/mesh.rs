//! Triangle meshes of graspable objects.

use nalgebra::{Point3, Vector3};

use crate::error::{ObjectError, ObjectResult};

/// An indexed triangle mesh.
///
/// Faces are wound counter-clockwise when viewed from outside, so face
/// normals point out of the object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Triangles as vertex index triples.
    pub faces: Vec<[u32; 3]>,
}

impl ObjectMesh {
    /// Create an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and faces, checking face indices.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::InvalidFaceIndex`] if any face references a
    /// vertex that does not exist.
    pub fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> ObjectResult<Self> {
        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Axis-aligned box centered at the origin with the given edge lengths.
    ///
    /// # Example
    ///
    /// ```
    /// use grasp_object::ObjectMesh;
    /// use nalgebra::Vector3;
    ///
    /// let cube = ObjectMesh::cuboid(Vector3::new(1.0, 1.0, 1.0));
    /// assert_eq!(cube.vertices.len(), 8);
    /// assert_eq!(cube.faces.len(), 12);
    /// assert!((cube.signed_volume() - 1.0).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn cuboid(extents: Vector3<f64>) -> Self {
        let h = extents * 0.5;
        let vertices = vec![
            Point3::new(-h.x, -h.y, -h.z), // 0
            Point3::new(h.x, -h.y, -h.z),  // 1
            Point3::new(h.x, h.y, -h.z),   // 2
            Point3::new(-h.x, h.y, -h.z),  // 3
            Point3::new(-h.x, -h.y, h.z),  // 4
            Point3::new(h.x, -h.y, h.z),   // 5
            Point3::new(h.x, h.y, h.z),    // 6
            Point3::new(-h.x, h.y, h.z),   // 7
        ];

        let faces = vec![
            // -Z
            [0, 2, 1],
            [0, 3, 2],
            // +Z
            [4, 5, 6],
            [4, 6, 7],
            // -Y
            [0, 1, 5],
            [0, 5, 4],
            // +Y
            [3, 7, 6],
            [3, 6, 2],
            // -X
            [0, 4, 7],
            [0, 7, 3],
            // +X
            [1, 2, 6],
            [1, 6, 5],
        ];

        Self { vertices, faces }
    }

    /// Check that every face index refers to an existing vertex.
    pub fn validate(&self) -> ObjectResult<()> {
        let vertex_count = self.vertices.len();
        for (face_idx, face) in self.faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ObjectError::InvalidFaceIndex {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Whether the mesh has no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Iterate over triangles as vertex position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.faces.iter().map(|f| {
            [
                self.vertices[f[0] as usize],
                self.vertices[f[1] as usize],
                self.vertices[f[2] as usize],
            ]
        })
    }

    /// Outward unit normal of each face (`+Z` for degenerate faces).
    #[must_use]
    pub fn face_normals(&self) -> Vec<Vector3<f64>> {
        self.triangles()
            .map(|[v0, v1, v2]| {
                (v1 - v0)
                    .cross(&(v2 - v0))
                    .try_normalize(f64::EPSILON)
                    .unwrap_or_else(Vector3::z)
            })
            .collect()
    }

    /// Signed volume enclosed by the mesh (positive for outward winding).
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[v0, v1, v2]| v0.coords.dot(&v1.coords.cross(&v2.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` for a mesh with
    /// no vertices.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        Some(self.vertices.iter().fold((*first, *first), |(lo, hi), v| {
            (lo.inf(v), hi.sup(v))
        }))
    }

    /// Volumetric center of mass for uniform density.
    ///
    /// Sums signed tetrahedra spanned by the origin and each face. Falls back
    /// to the vertex mean when the enclosed volume vanishes, and to the origin
    /// for a mesh with no vertices.
    #[must_use]
    pub fn center_of_mass(&self) -> Point3<f64> {
        let (volume, moment) = self.triangles().fold(
            (0.0, Vector3::zeros()),
            |(volume, moment), [v0, v1, v2]| {
                let tet = v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0;
                let centroid = (v0.coords + v1.coords + v2.coords) / 4.0;
                (volume + tet, moment + centroid * tet)
            },
        );

        if volume.abs() > f64::EPSILON {
            return Point3::from(moment / volume);
        }

        if self.vertices.is_empty() {
            return Point3::origin();
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.vertices.len() as f64;
        Point3::from(
            self.vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.coords)
                / n,
        )
    }

    /// Edge lengths of the axis-aligned bounding box.
    #[must_use]
    pub fn principal_dims(&self) -> Vector3<f64> {
        self.bounding_box()
            .map_or_else(Vector3::zeros, |(lo, hi)| hi - lo)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cuboid_volume_and_dims() {
        let mesh = ObjectMesh::cuboid(Vector3::new(2.0, 3.0, 4.0));
        assert_relative_eq!(mesh.signed_volume(), 24.0, epsilon = 1e-10);
        assert_relative_eq!(mesh.principal_dims(), Vector3::new(2.0, 3.0, 4.0));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn cuboid_normals_point_outward() {
        let mesh = ObjectMesh::cuboid(Vector3::new(1.0, 1.0, 1.0));
        for ([v0, v1, v2], n) in mesh.triangles().zip(mesh.face_normals()) {
            let centroid = (v0.coords + v1.coords + v2.coords) / 3.0;
            assert!(centroid.dot(&n) > 0.0);
        }
    }

    #[test]
    fn center_of_mass_of_shifted_box() {
        let mut mesh = ObjectMesh::cuboid(Vector3::new(1.0, 2.0, 0.5));
        let shift = Vector3::new(0.3, -0.2, 1.0);
        for v in &mut mesh.vertices {
            *v += shift;
        }
        assert_relative_eq!(mesh.center_of_mass().coords, shift, epsilon = 1e-10);
    }

    #[test]
    fn degenerate_mesh_uses_vertex_mean() {
        let mesh = ObjectMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
                Point3::new(0.0, 3.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        assert_relative_eq!(
            mesh.center_of_mass(),
            Point3::new(1.0, 1.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn empty_mesh() {
        let mesh = ObjectMesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.bounding_box().is_none());
        assert_eq!(mesh.center_of_mass(), Point3::origin());
        assert_eq!(mesh.principal_dims(), Vector3::zeros());
    }

    #[test]
    fn rejects_bad_face_index() {
        let err = ObjectMesh::from_parts(vec![Point3::origin()], vec![[0, 1, 2]]).unwrap_err();
        assert!(matches!(err, ObjectError::InvalidFaceIndex { index: 1, .. }));
    }
}
