//! Contact models and finger geometry for parallel-jaw grasping.
//!
//! This crate provides the two collaborators every grasp sampler leans on:
//!
//! - [`ContactModel`] / [`PointContactModel`] - Tangent frames, discretized
//!   friction cones and the two-contact force-closure test
//! - [`GraspGeometry`] / [`LineOfActionGeometry`] - Finger closing and
//!   partner-contact search over a voxelized distance field
//!
//! # Example
//!
//! ```
//! use grasp_contact::{ContactModel, GraspGeometry, LineOfActionGeometry, PointContactModel};
//! use grasp_object::SdfObject;
//! use grasp_types::ParallelJawGrasp;
//! use nalgebra::{Point3, Vector3};
//!
//! let cube = SdfObject::cuboid(Vector3::new(0.05, 0.05, 0.05), 0.0025, 8).unwrap();
//! let grasp = ParallelJawGrasp::new(Point3::origin(), Vector3::x(), 0.08).unwrap();
//!
//! let [c1, c2] = LineOfActionGeometry::new().close_fingers(&grasp, &cube).unwrap();
//! assert!(PointContactModel.force_closure(&c1, &c2, 0.5));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod geometry;
mod model;

pub use geometry::{GraspGeometry, LineOfActionGeometry};
pub use model::{ContactModel, PointContactModel};
