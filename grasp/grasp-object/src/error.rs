//! Error types for object geometry.

use thiserror::Error;

/// Result type for object geometry operations.
pub type ObjectResult<T> = Result<T, ObjectError>;

/// Errors that can occur while building object geometry.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// Mesh has no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidFaceIndex {
        /// Face index.
        face: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Grid dimensions are invalid.
    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(String),

    /// Voxel resolution must be positive and finite.
    #[error("resolution must be positive, got {0}")]
    InvalidResolution(f64),

    /// Number of values does not match the grid dimensions.
    #[error("expected {expected} grid values, got {actual}")]
    DataLength {
        /// Node count implied by the dimensions.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
}
