//! MP2RAGE background noise suppression for nifti volumes.
//!
//! The UNI image of an MP2RAGE acquisition has a noisy background because the UNI ratio is
//! undefined where there is no signal. Combining it with the two inversion images (INV1 and
//! INV2) and a regularisation strength `beta` gives an image with a dark background and the
//! same tissue contrast. [`combiner::VolumeCombiner`] does this for in-memory volumes and
//! [`nifti_io`] moves volumes to and from disk.

pub mod combiner;
pub mod common;
pub mod contrast;
pub mod error;
pub mod nifti_io;
pub mod parameters;

pub use combiner::VolumeCombiner;
pub use common::{OutputVolume, ScalarVolume, VolumeRole};
pub use contrast::{RobustCombination, Suppressor, DEFAULT_BETA};
pub use error::{Result, SuppressionError};
pub use parameters::ParameterNode;
