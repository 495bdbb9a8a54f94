//! Synthetic MP2RAGE fixtures shared by the integration tests

use nalgebra::Matrix4;
use ndarray::Array3;

use suppressnii::contrast::to_scanner_units;
use suppressnii::ScalarVolume;

pub const SIZE: usize = 64;

/// Oblique-free but flipped orientation; every entry is exact in f32.
pub fn uni_affine() -> Matrix4<f64> {
    Matrix4::new(
        -1.0, 0.0, 0.0, 90.0, //
        0.0, 1.25, 0.0, -126.0, //
        0.0, 0.0, 1.5, -72.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// A bright sphere ("tissue") in a low-level noise-like background.
pub fn mp2rage_set() -> (ScalarVolume<f64>, ScalarVolume<f64>, ScalarVolume<f64>) {
    let centre = SIZE as f64 / 2.0;
    let inside = |i: usize, j: usize, k: usize| {
        let (x, y, z) = (i as f64 - centre, j as f64 - centre, k as f64 - centre);
        (x * x + y * y + z * z).sqrt() < SIZE as f64 / 3.0
    };
    let inv1 = Array3::from_shape_fn((SIZE, SIZE, SIZE), |(i, j, k)| {
        if inside(i, j, k) {
            200.0 + ((i * 7 + j * 3 + k) % 50) as f64
        } else {
            ((i * 13 + j * 5 + k * 3) % 9) as f64
        }
    });
    let inv2 = Array3::from_shape_fn((SIZE, SIZE, SIZE), |(i, j, k)| {
        if inside(i, j, k) {
            900.0 + ((i + j * 11 + k * 5) % 80) as f64
        } else {
            ((i * 3 + j * 7 + k * 11) % 11) as f64
        }
    });
    let uni = Array3::from_shape_fn((SIZE, SIZE, SIZE), |(i, j, k)| {
        // tissue INV1 is negative, background polarity flips with the voxel parity
        let sign = if inside(i, j, k) || (i + j + k) % 2 == 0 { -1.0 } else { 1.0 };
        let a = sign * inv1[[i, j, k]];
        let b = inv2[[i, j, k]];
        let denominator = a * a + b * b;
        let ratio = if denominator == 0.0 { 0.0 } else { a * b / denominator };
        to_scanner_units(ratio)
    });

    let mut inv1_affine = uni_affine();
    inv1_affine[(0, 3)] = 0.0;
    (
        ScalarVolume::new("UNI_Test", uni, uni_affine()),
        ScalarVolume::new("INV1_Test", inv1, inv1_affine),
        ScalarVolume::new("INV2_Test", inv2, Matrix4::identity()),
    )
}
