//! Combine UNI, INV1 and INV2 into a background-suppressed volume.
//!
//! [`VolumeCombiner::process`] validates the inputs, runs the configured [`Suppressor`],
//! stores the result as `i16` in the output volume and gives the output the UNI orientation.
//! Nothing in the output is touched until the suppressor has returned successfully.

use std::time::Instant;

use ndarray::Array3;
use tracing::{debug, info};

use crate::common::{OutputVolume, ScalarVolume, VolumeRole};
use crate::contrast::{RobustCombination, Suppressor, DEFAULT_BETA};
use crate::error::{Result, SuppressionError};

/// Runs one suppressor over co-registered MP2RAGE volumes.
pub struct VolumeCombiner<S = RobustCombination> {
    suppressor: S,
    beta: f64,
}

impl Default for VolumeCombiner<RobustCombination> {
    fn default() -> Self {
        Self::new(RobustCombination)
    }
}

impl<S: Suppressor> VolumeCombiner<S> {
    /// Create a combiner around `suppressor` with the default filter strength.
    ///
    /// # Arguments
    ///
    /// * `suppressor` - The background suppression strategy, e.g. [`RobustCombination`] or a
    ///   plain function with the [`Suppressor`] signature.
    pub fn new(suppressor: S) -> Self {
        Self {
            suppressor,
            beta: DEFAULT_BETA,
        }
    }

    /// Set the filter strength handed to the suppressor.
    pub fn with_beta(mut self, beta: f64) -> Result<Self> {
        if !beta.is_finite() || beta < 0.0 {
            return Err(SuppressionError::InvalidBeta(beta));
        }
        self.beta = beta;
        Ok(self)
    }

    /// The filter strength handed to the suppressor.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Suppress background noise and write the result into `output`.
    ///
    /// Fails with [`SuppressionError::MissingArgument`] if any volume is absent and with
    /// [`SuppressionError::ShapeMismatch`] if INV1 or INV2 differ in shape from UNI; in both
    /// cases `output` is left unchanged. Errors from the suppressor are passed through as is.
    ///
    /// `invert` is accepted for compatibility and currently has no effect.
    pub fn process(
        &self,
        uni: Option<&ScalarVolume<f64>>,
        inv1: Option<&ScalarVolume<f64>>,
        inv2: Option<&ScalarVolume<f64>>,
        output: Option<&mut OutputVolume>,
        invert: bool,
    ) -> Result<()> {
        for (role, volume) in [
            (VolumeRole::Uni, uni),
            (VolumeRole::Inv1, inv1),
            (VolumeRole::Inv2, inv2),
        ] {
            if let Some(volume) = volume {
                info!("{} image is {}", role, volume.name);
            }
        }
        let uni = uni.ok_or(SuppressionError::MissingArgument {
            role: VolumeRole::Uni,
        })?;
        let inv1 = inv1.ok_or(SuppressionError::MissingArgument {
            role: VolumeRole::Inv1,
        })?;
        let inv2 = inv2.ok_or(SuppressionError::MissingArgument {
            role: VolumeRole::Inv2,
        })?;
        let output = output.ok_or(SuppressionError::MissingArgument {
            role: VolumeRole::Output,
        })?;

        check_shape(uni, inv1, VolumeRole::Inv1)?;
        check_shape(uni, inv2, VolumeRole::Inv2)?;
        if invert {
            debug!("invert has no effect on background suppression");
        }

        let start = Instant::now();
        info!("Processing started");

        let combined = self
            .suppressor
            .suppress(inv1.data.view(), inv2.data.view(), uni.data.view(), self.beta)?;
        if combined.shape() != uni.data.shape() {
            return Err(SuppressionError::suppression(format!(
                "result shape {:?} does not match input shape {:?}",
                combined.shape(),
                uni.data.shape()
            )));
        }

        output.data = cast_to_i16(&combined);
        output.affine = uni.affine;

        info!(
            "Processing completed in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }
}

fn check_shape(
    uni: &ScalarVolume<f64>,
    other: &ScalarVolume<f64>,
    role: VolumeRole,
) -> Result<()> {
    if other.shape() != uni.shape() {
        return Err(SuppressionError::ShapeMismatch {
            role,
            expected: uni.shape(),
            actual: other.shape(),
        });
    }
    Ok(())
}

/// Truncate towards zero into `i16`; out of range values saturate and NaN becomes 0.
pub fn cast_to_i16(data: &Array3<f64>) -> Array3<i16> {
    data.mapv(|v| v as i16)
}
