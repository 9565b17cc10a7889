//! Core types for parallel-jaw grasp planning.
//!
//! This crate provides the data shared by the grasp crates:
//!
//! - [`ParallelJawGrasp`] - Jaw center, axis, opening width and approach roll
//! - [`Contact`] - Surface point with outward normal and finger direction
//! - [`FrictionCone`] - Discretized Coulomb friction cone at a contact
//! - [`GripperParams`] - Opening limits of the gripper
//! - [`StablePose`] - Resting pose used to align grasp approach directions
//! - [`SamplerConfig`] / [`DiversityParams`] - Sampler configuration
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. The types are pure
//! data plus invariant-preserving constructors; no sampling happens here.
//!
//! # Units
//!
//! Unit-agnostic. Widths, distances and coordinates share whatever length
//! unit the object geometry uses (typically meters).
//!
//! # Example
//!
//! ```
//! use grasp_types::{Contact, FrictionCone, ParallelJawGrasp};
//! use nalgebra::{Point3, Vector3};
//!
//! let c1 = Contact::new(Point3::new(-0.02, 0.0, 0.0), -Vector3::x()).unwrap();
//! let c2 = Contact::new(Point3::new(0.02, 0.0, 0.0), Vector3::x()).unwrap();
//!
//! let grasp = ParallelJawGrasp::from_endpoints(c1.point(), c2.point(), 0.085).unwrap();
//! assert!(grasp.axis().x > 0.99);
//!
//! let cone = FrictionCone::new(c1.normal(), (Vector3::y(), Vector3::z()), 0.5, 8);
//! assert!(cone.within_cone(&grasp.axis()).0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod cone;
mod config;
mod contact;
mod error;
mod grasp;
mod gripper;
mod pose;

pub use cone::FrictionCone;
pub use config::{DiversityParams, SamplerConfig};
pub use contact::Contact;
pub use error::{ConfigError, ConfigResult, GraspError, GraspResult};
pub use grasp::ParallelJawGrasp;
pub use gripper::GripperParams;
pub use pose::StablePose;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
