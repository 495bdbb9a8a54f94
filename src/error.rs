//! Error types for background suppression.

use std::path::PathBuf;
use thiserror::Error;

use crate::common::VolumeRole;

/// Main error type for loading, combining and saving volumes.
#[derive(Error, Debug)]
pub enum SuppressionError {
    /// A required volume was not supplied.
    #[error("input or output argument volume is invalid ({role})")]
    MissingArgument { role: VolumeRole },

    /// An input grid does not match the UNI grid.
    #[error("{role} shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        role: VolumeRole,
        expected: [usize; 3],
        actual: [usize; 3],
    },

    /// The suppression strategy failed.
    #[error("Suppression error: {0}")]
    Suppression(String),

    #[error("beta must be finite and non-negative, got {0}")]
    InvalidBeta(f64),

    #[error("{} must be 3D, found {ndim} dimensions", path.display())]
    NotThreeDimensional { path: PathBuf, ndim: usize },

    #[error("Output file {} already exists", .0.display())]
    OutputExists(PathBuf),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error(transparent)]
    Nifti(#[from] nifti::error::NiftiError),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for suppression operations.
pub type Result<T> = std::result::Result<T, SuppressionError>;

impl SuppressionError {
    /// Create a suppression error.
    pub fn suppression(msg: impl Into<String>) -> Self {
        Self::Suppression(msg.into())
    }

    /// Create a discovery error.
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }
}
