//! Object geometry for grasp planning.
//!
//! This crate provides:
//!
//! - [`ObjectMesh`] - Indexed triangle mesh with mass properties
//! - [`SdfGrid`] - Voxelized signed distance field with trilinear queries
//! - [`GraspableObject`] - The object capability grasp samplers consume
//! - [`SdfObject`] - A [`GraspableObject`] backed by an [`SdfGrid`]
//!
//! # Conventions
//!
//! Signed distances are negative inside the object. Surface normals point
//! outward. Grid coordinates are continuous node indices.
//!
//! # Example
//!
//! ```
//! use grasp_object::{GraspableObject, ObjectMesh, SdfObject};
//! use nalgebra::Vector3;
//!
//! let mesh = ObjectMesh::cuboid(Vector3::new(0.04, 0.04, 0.04));
//! let object = SdfObject::from_mesh(mesh, 0.004, 3).unwrap();
//!
//! assert!(object.surface_points().len() > 100);
//! assert!(object.signed_distance(&object.center_of_mass()).unwrap() < 0.0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod mesh;
mod object;
mod query;
mod sdf;

pub use error::{ObjectError, ObjectResult};
pub use mesh::ObjectMesh;
pub use object::{GraspableObject, SdfObject};
pub use query::closest_point_on_triangle;
pub use sdf::SdfGrid;
