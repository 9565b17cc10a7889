//! Property-based tests for the point contact model.
//!
//! Run with: cargo test -p grasp-contact -- proptest

use grasp_contact::{ContactModel, PointContactModel};
use grasp_types::Contact;
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-1.0..1.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

fn arb_unit() -> impl Strategy<Value = Vector3<f64>> {
    prop::array::uniform3(-1.0..1.0f64)
        .prop_map(|[x, y, z]| Vector3::new(x, y, z))
        .prop_filter("non-degenerate", |v| v.norm() > 1e-2)
        .prop_map(|v| v.normalize())
}

fn arb_contact() -> impl Strategy<Value = Contact> {
    (arb_point(), arb_unit()).prop_map(|(p, n)| Contact::new(p, n).unwrap())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_tangent_frame_is_orthonormal(c in arb_contact()) {
        let (dir, tx, ty) = PointContactModel.tangents(&c);
        prop_assert!((tx.norm() - 1.0).abs() < 1e-9);
        prop_assert!((ty.norm() - 1.0).abs() < 1e-9);
        prop_assert!(tx.dot(&dir).abs() < 1e-9);
        prop_assert!(ty.dot(&dir).abs() < 1e-9);
        prop_assert!(tx.dot(&ty).abs() < 1e-9);
    }

    #[test]
    fn proptest_force_closure_is_symmetric(
        a in arb_contact(),
        b in arb_contact(),
        mu in 0.0..2.0f64,
    ) {
        let model = PointContactModel;
        prop_assert_eq!(model.force_closure(&a, &b, mu), model.force_closure(&b, &a, mu));
    }

    #[test]
    fn proptest_more_friction_never_breaks_closure(
        a in arb_contact(),
        b in arb_contact(),
        mu in 0.0..2.0f64,
        extra in 0.0..2.0f64,
    ) {
        let model = PointContactModel;
        if model.force_closure(&a, &b, mu) {
            prop_assert!(model.force_closure(&a, &b, mu + extra));
        }
    }

    #[test]
    fn proptest_opposed_normals_close_without_friction(
        p in arb_point(),
        axis in arb_unit(),
        width in 0.01..1.0f64,
    ) {
        let c1 = Contact::new(p, -axis).unwrap();
        let c2 = Contact::new(p + axis * width, axis).unwrap();
        // Exactly collinear, so allow the rounding in acos
        prop_assert!(PointContactModel.force_closure(&c1, &c2, 1e-6));
    }
}
