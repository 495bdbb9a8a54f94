//! MP2RAGE contrast computation.
//!
//! The combiner does not care how the background-suppressed image is made: it hands the
//! three inputs and `beta` to a [`Suppressor`]. [`RobustCombination`] is the built-in one and
//! regularises the MP2RAGE ratio so that noise-only voxels are pushed towards the dark end of
//! the intensity range instead of the salt-and-pepper background of the plain UNI image.

use ndarray::{Array3, ArrayView3, Zip};

use crate::error::{Result, SuppressionError};

/// Filter strength used when none is given. Larger values suppress more background.
pub const DEFAULT_BETA: f64 = 10000.0;

/// Largest value of the scanner's unsigned 12 bit UNI range.
pub const SCANNER_MAX: f64 = 4095.0;

/// Strategy that turns magnitude INV1/INV2 images plus UNI into a combined image.
///
/// The result must have the same shape as the inputs.
pub trait Suppressor {
    fn suppress(
        &self,
        inv1: ArrayView3<f64>,
        inv2: ArrayView3<f64>,
        uni: ArrayView3<f64>,
        beta: f64,
    ) -> Result<Array3<f64>>;
}

impl<F> Suppressor for F
where
    F: Fn(ArrayView3<f64>, ArrayView3<f64>, ArrayView3<f64>, f64) -> Result<Array3<f64>>,
{
    fn suppress(
        &self,
        inv1: ArrayView3<f64>,
        inv2: ArrayView3<f64>,
        uni: ArrayView3<f64>,
        beta: f64,
    ) -> Result<Array3<f64>> {
        self(inv1, inv2, uni, beta)
    }
}

/// Regularised ("robust") MP2RAGE combination for unsigned inversion images.
///
/// INV1 is stored as a magnitude, so its polarity is recovered from UNI before the
/// regularised ratio `(inv1 * inv2 - beta) / (inv1² + inv2² + 2 beta)` is taken. The output
/// is in scanner units, `0..=4095`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RobustCombination;

impl Suppressor for RobustCombination {
    fn suppress(
        &self,
        inv1: ArrayView3<f64>,
        inv2: ArrayView3<f64>,
        uni: ArrayView3<f64>,
        beta: f64,
    ) -> Result<Array3<f64>> {
        if inv1.shape() != uni.shape() || inv2.shape() != uni.shape() {
            return Err(SuppressionError::suppression(format!(
                "inputs differ in shape: INV1 {:?}, INV2 {:?}, UNI {:?}",
                inv1.shape(),
                inv2.shape(),
                uni.shape()
            )));
        }
        let integer_uni = uni.iter().any(|&v| v > 1.0);
        let mut out = Array3::<f64>::zeros(uni.raw_dim());
        Zip::from(&mut out)
            .and(&inv1)
            .and(&inv2)
            .and(&uni)
            .for_each(|o, &i1, &i2, &u| {
                let u = if integer_uni { scale_uni(u) } else { u };
                let i1 = restore_polarity(i1, i2, u);
                *o = to_scanner_units(robust_ratio(i1, i2, beta));
            });
        Ok(out)
    }
}

/// Map a scanner UNI value onto `[-0.5, 0.5]`.
pub fn scale_uni(value: f64) -> f64 {
    value / SCANNER_MAX - 0.5
}

/// Map a ratio in `[-0.5, 0.5]` back onto the scanner range.
pub fn to_scanner_units(ratio: f64) -> f64 {
    (SCANNER_MAX * (ratio + 0.5)).round()
}

pub fn robust_ratio(inv1: f64, inv2: f64, beta: f64) -> f64 {
    let denominator = inv1 * inv1 + inv2 * inv2 + 2.0 * beta;
    if denominator == 0.0 {
        return 0.0;
    }
    (inv1 * inv2 - beta) / denominator
}

/// Pick the signed INV1 consistent with `uni`.
///
/// `uni = inv1 * inv2 / (inv1² + inv2²)` has two solutions for inv1 given inv2; the one
/// nearest the measured magnitude (carrying the sign of `uni`) wins, ties going to the
/// positive root.
pub fn restore_polarity(inv1: f64, inv2: f64, uni: f64) -> f64 {
    let signed = inv1.abs() * sign(uni);
    // -u x² + inv2 x - inv2² u = 0
    let a = -uni;
    let b = inv2;
    let c = -inv2 * inv2 * uni;
    if a == 0.0 {
        return if b == 0.0 { 0.0 } else { -c / b };
    }
    let root = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let pos = (-b + root) / (2.0 * a);
    let neg = (-b - root) / (2.0 * a);
    if (signed - pos).abs() <= (signed - neg).abs() {
        pos
    } else {
        neg
    }
}

// sign that maps 0 to 0
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
