//! Point-to-mesh distance queries used when voxelizing a mesh.

use nalgebra::{Point3, Vector3};

use crate::mesh::ObjectMesh;

/// Closest point to `p` on triangle `(a, b, c)`.
///
/// The projection of `p` onto the triangle's plane is the answer when its
/// barycentric weights are all non-negative. Otherwise the nearest point
/// lies on the boundary and is the closest of the three edge points.
/// Degenerate triangles go straight to the edge search.
#[must_use]
pub fn closest_point_on_triangle(
    p: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> Point3<f64> {
    if let Some(inside) = project_into_triangle(p, a, b, c) {
        return inside;
    }

    let mut best = closest_point_on_segment(p, a, b);
    for candidate in [
        closest_point_on_segment(p, b, c),
        closest_point_on_segment(p, c, a),
    ] {
        if (candidate - p).norm_squared() < (best - p).norm_squared() {
            best = candidate;
        }
    }
    best
}

/// Plane projection of `p`, if it falls inside the triangle.
fn project_into_triangle(
    p: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> Option<Point3<f64>> {
    let ab = b - a;
    let ac = c - a;
    let n = ab.cross(&ac);
    let area_sq = n.norm_squared();
    if area_sq <= f64::EPSILON * ab.norm_squared() * ac.norm_squared() {
        return None;
    }

    let q = p - n * ((p - a).dot(&n) / area_sq);
    // Signed sub-triangle areas over the full area
    let wa = (c - b).cross(&(q - b)).dot(&n) / area_sq;
    let wb = (a - c).cross(&(q - c)).dot(&n) / area_sq;
    let wc = 1.0 - wa - wb;
    (wa >= 0.0 && wb >= 0.0 && wc >= 0.0).then_some(q)
}

fn closest_point_on_segment(p: Point3<f64>, start: Point3<f64>, end: Point3<f64>) -> Point3<f64> {
    let edge = end - start;
    let len_sq = edge.norm_squared();
    if len_sq <= f64::MIN_POSITIVE {
        return start;
    }
    let t = ((p - start).dot(&edge) / len_sq).clamp(0.0, 1.0);
    start + edge * t
}

/// Signed distance from `point` to a closed, outward-wound mesh.
///
/// The sign comes from the normal of the nearest face, which is exact for
/// convex meshes and a close approximation elsewhere. `normals` must hold
/// one entry per face, as returned by [`ObjectMesh::face_normals`].
#[must_use]
pub(crate) fn mesh_signed_distance(
    point: Point3<f64>,
    mesh: &ObjectMesh,
    normals: &[Vector3<f64>],
) -> f64 {
    let mut min_dist_sq = f64::MAX;
    let mut sign = 1.0;

    for ([v0, v1, v2], normal) in mesh.triangles().zip(normals) {
        let closest = closest_point_on_triangle(point, v0, v1, v2);
        let dist_sq = (closest - point).norm_squared();
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
            sign = if (point - v0).dot(normal) >= 0.0 { 1.0 } else { -1.0 };
        }
    }

    sign * min_dist_sq.sqrt()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn closest_point_regions() {
        let (a, b, c) = tri();
        // Face interior
        let p = closest_point_on_triangle(Point3::new(0.2, 0.2, 1.0), a, b, c);
        assert_relative_eq!(p, Point3::new(0.2, 0.2, 0.0));
        // Vertex region
        let p = closest_point_on_triangle(Point3::new(-1.0, -1.0, 0.0), a, b, c);
        assert_relative_eq!(p, a);
        // Edge region of BC
        let p = closest_point_on_triangle(Point3::new(1.0, 1.0, 0.0), a, b, c);
        assert_relative_eq!(p, Point3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn off_plane_points_outside_the_face() {
        let (a, b, c) = tri();
        // Above and beyond edge AB
        let p = closest_point_on_triangle(Point3::new(0.5, -2.0, 3.0), a, b, c);
        assert_relative_eq!(p, Point3::new(0.5, 0.0, 0.0));
        // Below and past vertex C
        let p = closest_point_on_triangle(Point3::new(-0.5, 3.0, -1.0), a, b, c);
        assert_relative_eq!(p, c);
        // On the face boundary the projection is kept
        let p = closest_point_on_triangle(Point3::new(0.0, 0.5, 2.0), a, b, c);
        assert_relative_eq!(p, Point3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn degenerate_triangles_use_their_edges() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(2.0, 0.0, 0.0);
        let p = closest_point_on_triangle(Point3::new(1.5, 1.0, 0.0), a, b, c);
        assert_relative_eq!(p, Point3::new(1.5, 0.0, 0.0));

        let p = closest_point_on_triangle(Point3::new(1.0, 1.0, 1.0), a, a, a);
        assert_relative_eq!(p, a);
    }

    #[test]
    fn signed_distance_to_box() {
        let mesh = ObjectMesh::cuboid(Vector3::new(2.0, 2.0, 2.0));
        let normals = mesh.face_normals();
        assert_relative_eq!(
            mesh_signed_distance(Point3::origin(), &mesh, &normals),
            -1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            mesh_signed_distance(Point3::new(3.0, 0.0, 0.0), &mesh, &normals),
            2.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            mesh_signed_distance(Point3::new(2.0, 2.0, 0.0), &mesh, &normals),
            2.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }
}
