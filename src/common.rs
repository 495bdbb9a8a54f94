use nalgebra::Matrix4;
use ndarray::Array3;
use std::fmt;

// set up enums and structs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeRole {
    Uni,
    Inv1,
    Inv2,
    Output,
}

impl VolumeRole {
    pub fn all() -> [VolumeRole; 4] {
        [
            VolumeRole::Uni,
            VolumeRole::Inv1,
            VolumeRole::Inv2,
            VolumeRole::Output,
        ]
    }
}

impl fmt::Display for VolumeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeRole::Uni => write!(f, "UNI"),
            VolumeRole::Inv1 => write!(f, "INV1"),
            VolumeRole::Inv2 => write!(f, "INV2"),
            VolumeRole::Output => write!(f, "Output"),
        }
    }
}

/// A 3D scalar volume: voxel samples plus the IJK-to-RAS affine placing them in space.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarVolume<T> {
    pub name: String,
    pub data: Array3<T>,
    pub affine: Matrix4<f64>,
}

impl<T> ScalarVolume<T> {
    pub fn new(name: impl Into<String>, data: Array3<T>, affine: Matrix4<f64>) -> Self {
        Self {
            name: name.into(),
            data,
            affine,
        }
    }

    pub fn shape(&self) -> [usize; 3] {
        let dim = self.data.dim();
        [dim.0, dim.1, dim.2]
    }
}

impl<T: Clone + Default> ScalarVolume<T> {
    /// An empty volume with identity orientation, ready to receive results.
    pub fn zeros(name: impl Into<String>, shape: [usize; 3]) -> Self {
        Self::new(name, Array3::from_elem(shape, T::default()), Matrix4::identity())
    }
}

/// The volume type written by the combiner.
pub type OutputVolume = ScalarVolume<i16>;
