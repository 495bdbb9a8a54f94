//! Loading and saving volumes as nifti files.

use ndarray::Ix3;
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use std::path::Path;
use tracing::info;

use crate::common::{OutputVolume, ScalarVolume};
use crate::error::{Result, SuppressionError};

/// Read a 3D nifti file as `f64` samples, returning the volume and its header.
///
/// The volume is named after the file (without `.nii`/`.nii.gz`) and carries the header affine.
pub fn load_volume(path: &Path) -> Result<(ScalarVolume<f64>, NiftiHeader)> {
    let obj = ReaderOptions::new().read_file(path)?;
    let header = obj.header().clone();
    let img = obj.into_volume().into_ndarray::<f64>()?;
    if img.ndim() != 3 {
        return Err(SuppressionError::NotThreeDimensional {
            path: path.to_path_buf(),
            ndim: img.ndim(),
        });
    }
    let img = img.into_dimensionality::<Ix3>()?;
    let affine = header.affine::<f64>();
    info!("Loaded {} with shape {:?}", path.display(), img.shape());
    Ok((ScalarVolume::new(volume_name(path), img, affine), header))
}

/// Write `volume` as signed 16 bit data.
///
/// All header fields other than the orientation and intensity scaling are taken from
/// `reference`; the orientation comes from the volume itself.
pub fn save_volume(path: &Path, volume: &OutputVolume, reference: &NiftiHeader) -> Result<()> {
    let mut header = reference.clone();
    header.set_affine(&volume.affine);
    // stored values are final intensities
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&volume.data)?;
    info!("Saved {} to {}", volume.name, path.display());
    Ok(())
}

/// Refuse to replace an existing file unless asked to.
pub fn check_output(path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(SuppressionError::OutputExists(path.to_path_buf()));
    }
    Ok(())
}

/// File name with any `.nii` or `.nii.gz` extension removed.
pub fn volume_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    for ext in [".nii.gz", ".nii"] {
        if let Some(stem) = name.strip_suffix(ext) {
            return stem.to_string();
        }
    }
    name
}
