//! Sampling a voxelized cube from configuration to final grasp set.

use grasp_contact::{ContactModel, GraspGeometry, LineOfActionGeometry, PointContactModel};
use grasp_object::SdfObject;
use grasp_sampler::{
    AntipodalSampler, BatchRequest, GaussianSampler, GraspGenerator, GraspSampler, SampleGrasps,
    UniformSampler,
};
use grasp_types::{GripperParams, SamplerConfig};
use nalgebra::Vector3;
use rand::SeedableRng;
use rand::rngs::StdRng;

const L: f64 = 0.0625;
const RES: f64 = 0.0078125;

fn cube() -> SdfObject {
    SdfObject::cuboid(Vector3::new(L, L, L), RES, 8).unwrap()
}

fn config() -> SamplerConfig {
    SamplerConfig::from_json_str(
        r#"{
            "sampling_friction_coef": 1.0,
            "num_cone_faces": 8,
            "grasp_samples_per_surface_point": 2,
            "target_num_grasps": 20,
            "target_num_grasps_per_size": 10,
            "openning_ratios": [0.5, 1.0],
            "min_contact_dist": 0.015625,
            "num_grasp_rots": 8,
            "max_num_surface_points": 30
        }"#,
    )
    .unwrap()
}

fn gripper() -> GripperParams {
    GripperParams::new(0.0, 2.0 * L).unwrap()
}

// =============================================================================
// Antipodal sampling
// =============================================================================

#[test]
fn antipodal_grasps_close_and_hold() {
    let cube = cube();
    let config = config();
    let sampler = AntipodalSampler::new(gripper(), config.clone()).unwrap();
    let geom = LineOfActionGeometry::new();
    let model = PointContactModel;
    let mut rng = StdRng::seed_from_u64(2024);

    let grasps = sampler.sample_grasps(&cube, 1, &config.opening_ratios, None, &mut rng);
    assert!(!grasps.is_empty());

    let mut full_width = 0;
    for g in &grasps {
        let [c1, c2] = geom.close_fingers(g, &cube).unwrap();
        let separation = c1.distance_to(&c2);
        assert!(separation > config.min_contact_dist);
        assert!(separation <= g.max_width());

        // Narrowed grasps may start the fingers on the surface, so only
        // full-width grasps reproduce the sampled contacts exactly
        if (g.max_width() - 2.0 * L).abs() < 1e-12 {
            full_width += 1;
            assert!(model.friction_cone(&c1, 8, 1.01).is_some());
            assert!(model.friction_cone(&c2, 8, 1.01).is_some());
            assert!(model.force_closure(&c1, &c2, 1.01));
        } else {
            assert!((g.max_width() - L).abs() < 1e-12);
        }
    }
    assert!(full_width > 0);
}

#[test]
fn narrow_cones_pick_opposite_faces() {
    let cube = cube();
    let mut config = config();
    // Cone half-angle atan(0.5) ≈ 26.6°, so both contact normals lie within
    // about 53° of each other's reverse
    config.friction_coef = 0.5;
    config.opening_ratios = vec![1.0];
    let sampler = AntipodalSampler::new(gripper(), config.clone()).unwrap();
    let geom = LineOfActionGeometry::new();
    let mut rng = StdRng::seed_from_u64(31);

    let grasps = sampler.sample_grasps(&cube, 0, &config.opening_ratios, None, &mut rng);
    assert!(!grasps.is_empty());

    for g in &grasps {
        let [c1, c2] = geom.close_fingers(g, &cube).unwrap();

        // Normals on adjacent faces never point against each other
        let alignment = c1.normal().dot(&c2.normal());
        assert!(alignment < -0.5, "contact normals too far from opposed: {alignment}");

        // Contacts sit within a voxel of a pair of opposite faces
        let spans_opposite_faces =
            (0..3).any(|axis| (c1.point()[axis] - c2.point()[axis]).abs() > L - RES);
        assert!(
            spans_opposite_faces,
            "contacts {:?} and {:?} are not on opposite faces",
            c1.point(),
            c2.point()
        );
    }
}

#[test]
fn antipodal_is_reproducible_with_a_seed() {
    let cube = cube();
    let config = config();
    let sampler = AntipodalSampler::new(gripper(), config.clone()).unwrap();
    let request = BatchRequest::new(1, &config.opening_ratios);

    let a = sampler.sample_batch(&cube, &request, &mut StdRng::seed_from_u64(5));
    let b = sampler.sample_batch(&cube, &request, &mut StdRng::seed_from_u64(5));
    assert_eq!(a, b);
}

// =============================================================================
// Generation across opening ratios
// =============================================================================

#[test]
fn generated_widths_come_from_the_ratio_ladder() {
    let cube = cube();
    let config = config();
    let sampler: GraspSampler = AntipodalSampler::new(gripper(), config.clone()).unwrap().into();
    let mut rng = StdRng::seed_from_u64(17);

    let grasps = GraspGenerator::new().generate_grasps(&sampler, &cube, None, &mut rng);
    assert!(!grasps.is_empty());
    assert!(grasps.len() <= config.opening_ratios.len() * config.target_num_grasps_per_size);

    for g in &grasps {
        let on_ladder = config
            .opening_ratios
            .iter()
            .any(|r| (g.max_width() - r * 2.0 * L).abs() < 1e-12);
        assert!(on_ladder, "width {} is not a configured opening", g.max_width());
    }
}

// =============================================================================
// Strategy enum
// =============================================================================

#[test]
fn enum_delegates_to_the_wrapped_strategy() {
    let cube = cube();
    let config = config();
    let request = BatchRequest::new(0, &config.opening_ratios);

    let uniform = UniformSampler::new(gripper(), config.clone()).unwrap();
    let direct = uniform.sample_batch(&cube, &request, &mut StdRng::seed_from_u64(9));
    let wrapped: GraspSampler = uniform.into();
    let via_enum = wrapped.sample_batch(&cube, &request, &mut StdRng::seed_from_u64(9));
    assert_eq!(direct, via_enum);
    assert_eq!(wrapped.config(), &config);

    let gaussian = GaussianSampler::new(gripper(), config.clone()).unwrap();
    let direct = gaussian.sample_batch(&cube, &request, &mut StdRng::seed_from_u64(9));
    let wrapped: GraspSampler = gaussian.into();
    let via_enum = wrapped.sample_batch(&cube, &request, &mut StdRng::seed_from_u64(9));
    assert_eq!(direct, via_enum);
    assert!(via_enum.len() <= config.target_num_grasps_per_size);
}
