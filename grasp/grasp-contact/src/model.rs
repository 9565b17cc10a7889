//! Contact models: tangent frames, friction cones and force closure.

use grasp_types::{Contact, FrictionCone};
use nalgebra::Vector3;

/// Contacts closer than this are treated as coincident.
const COINCIDENT_EPS: f64 = 1e-12;

/// Frictional behavior of a single finger contact.
pub trait ContactModel {
    /// Tangent frame at a contact as `(in_direction, tx, ty)`.
    ///
    /// `in_direction` points into the object and `tx × ty = in_direction`.
    fn tangents(&self, contact: &Contact) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>);

    /// Discretized friction cone at a contact, or `None` if the finger
    /// reaching it would slip.
    fn friction_cone(
        &self,
        contact: &Contact,
        num_cone_faces: usize,
        friction_coef: f64,
    ) -> Option<FrictionCone>;

    /// Whether two contacts together resist arbitrary external wrenches.
    fn force_closure(&self, c1: &Contact, c2: &Contact, friction_coef: f64) -> bool;
}

/// Hard point contact with Coulomb friction.
///
/// # Example
///
/// ```
/// use grasp_contact::{ContactModel, PointContactModel};
/// use grasp_types::Contact;
/// use nalgebra::{Point3, Vector3};
///
/// let model = PointContactModel;
/// let left = Contact::new(Point3::new(-0.02, 0.0, 0.0), -Vector3::x()).unwrap();
/// let right = Contact::new(Point3::new(0.02, 0.0, 0.0), Vector3::x()).unwrap();
///
/// assert!(model.force_closure(&left, &right, 0.5));
/// let cone = model.friction_cone(&left, 8, 0.5).unwrap();
/// assert_eq!(cone.num_faces(), 8);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointContactModel;

impl ContactModel for PointContactModel {
    fn tangents(&self, contact: &Contact) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let direction = contact.in_normal();

        let up = if direction.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let tx = direction.cross(&up).normalize();
        let ty = direction.cross(&tx).normalize();

        (direction, tx, ty)
    }

    fn friction_cone(
        &self,
        contact: &Contact,
        num_cone_faces: usize,
        friction_coef: f64,
    ) -> Option<FrictionCone> {
        let (direction, tx, ty) = self.tangents(contact);

        if let Some(approach) = contact.in_direction() {
            let normal_part = approach.dot(&direction);
            let tangential_part = (approach - direction * normal_part).norm();
            if normal_part <= 0.0 || tangential_part > friction_coef * normal_part {
                return None;
            }
        }

        Some(FrictionCone::new(
            contact.normal(),
            (tx, ty),
            friction_coef,
            num_cone_faces,
        ))
    }

    fn force_closure(&self, c1: &Contact, c2: &Contact, friction_coef: f64) -> bool {
        let Some(line) = (c2.point() - c1.point()).try_normalize(COINCIDENT_EPS) else {
            return false;
        };
        let half_angle = friction_coef.max(0.0).atan();

        // Each inward normal must point at the other contact, within the cone
        [(c1, line), (c2, -line)].iter().all(|(contact, toward_other)| {
            let proj = contact.in_normal().dot(toward_other);
            proj > 0.0 && proj.min(1.0).acos() <= half_angle
        })
    }
}
