mod common;

use approx::assert_abs_diff_eq;
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, NiftiType, ReaderOptions};
use std::path::Path;
use tempfile::tempdir;

use suppressnii::nifti_io::{load_volume, save_volume};
use suppressnii::{OutputVolume, ParameterNode, ScalarVolume, SuppressionError, VolumeCombiner};

use common::{mp2rage_set, uni_affine, SIZE};

fn background_mean<T: Copy + Into<f64>>(data: &ndarray::Array3<T>) -> f64 {
    // the corners are well outside the sphere
    let corner = data.slice(ndarray::s![..8, ..8, ..8]);
    corner.iter().map(|&v| v.into()).sum::<f64>() / corner.len() as f64
}

#[test]
fn test_suppression_of_synthetic_volumes() {
    let (uni, inv1, inv2) = mp2rage_set();
    let mut output = OutputVolume::zeros("Test_Output", [3, 3, 3]);
    output.data.fill(-5);

    VolumeCombiner::default()
        .process(Some(&uni), Some(&inv1), Some(&inv2), Some(&mut output), false)
        .unwrap();

    let data: &ndarray::Array3<i16> = &output.data;
    assert_eq!(data.shape(), &[SIZE, SIZE, SIZE]);
    assert_eq!(output.affine, uni.affine);
    assert!(data.iter().all(|&v| (0..=4095).contains(&v)));

    // background is pushed to black, tissue keeps its UNI contrast
    assert!(background_mean(&output.data) < 100.0);
    assert!(background_mean(&uni.data) > 1000.0);
    let c = SIZE / 2;
    let tissue_out = f64::from(output.data[[c, c, c]]);
    let tissue_uni = uni.data[[c, c, c]];
    assert!((tissue_out - tissue_uni).abs() < 100.0);
}

#[test]
fn test_missing_uni_leaves_output_untouched() {
    let (_, inv1, inv2) = mp2rage_set();
    let mut output = OutputVolume::zeros("Test_Output", [2, 2, 2]);
    output.data.fill(42);
    let before = output.clone();

    let err = VolumeCombiner::default()
        .process(None, Some(&inv1), Some(&inv2), Some(&mut output), false)
        .unwrap_err();
    assert!(matches!(err, SuppressionError::MissingArgument { .. }));
    assert_eq!(output, before);
}

#[test]
fn test_repeated_processing_is_deterministic() {
    let (uni, inv1, inv2) = mp2rage_set();
    let combiner = VolumeCombiner::default().with_beta(2500.0).unwrap();
    let mut first = OutputVolume::zeros("first", [1, 1, 1]);
    let mut second = OutputVolume::zeros("second", [5, 5, 5]);
    combiner
        .process(Some(&uni), Some(&inv1), Some(&inv2), Some(&mut first), false)
        .unwrap();
    combiner
        .process(Some(&uni), Some(&inv1), Some(&inv2), Some(&mut second), true)
        .unwrap();
    assert_eq!(first.data, second.data);
    assert_eq!(first.affine, second.affine);
}

#[test]
fn test_stronger_beta_darkens_background() {
    let (uni, inv1, inv2) = mp2rage_set();
    let mut weak = OutputVolume::zeros("weak", [1, 1, 1]);
    let mut strong = OutputVolume::zeros("strong", [1, 1, 1]);
    VolumeCombiner::default()
        .with_beta(0.0)
        .unwrap()
        .process(Some(&uni), Some(&inv1), Some(&inv2), Some(&mut weak), false)
        .unwrap();
    VolumeCombiner::default()
        .process(Some(&uni), Some(&inv1), Some(&inv2), Some(&mut strong), false)
        .unwrap();
    assert!(background_mean(&strong.data) < background_mean(&weak.data));
}

fn write_fixture(path: &Path, volume: &ScalarVolume<f64>) {
    let mut header = NiftiHeader::default();
    header.set_affine(&volume.affine);
    header.sform_code = 2;
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&volume.data.mapv(|v| v as f32))
        .unwrap();
}

#[test]
fn test_nifti_round_trip() {
    let dir = tempdir().unwrap();
    let (uni, inv1, inv2) = mp2rage_set();
    for volume in [&uni, &inv1, &inv2] {
        write_fixture(&dir.path().join(format!("{}.nii", volume.name)), volume);
    }

    let mut params = ParameterNode {
        output: Some(dir.path().join("Test_Output.nii.gz")),
        ..Default::default()
    };
    params.discover(dir.path()).unwrap();
    assert!(params.can_apply());

    let (uni, uni_header) = load_volume(params.uni.as_deref().unwrap()).unwrap();
    let (inv1, _) = load_volume(params.inv1.as_deref().unwrap()).unwrap();
    let (inv2, _) = load_volume(params.inv2.as_deref().unwrap()).unwrap();
    assert_eq!(uni.name, "UNI_Test");
    assert_abs_diff_eq!(uni.affine, uni_affine(), epsilon = 1e-6);

    let mut output = OutputVolume::zeros("Test_Output", uni.shape());
    VolumeCombiner::default()
        .process(Some(&uni), Some(&inv1), Some(&inv2), Some(&mut output), false)
        .unwrap();
    let out_path = params.output.clone().unwrap();
    save_volume(&out_path, &output, &uni_header).unwrap();

    let obj = ReaderOptions::new().read_file(&out_path).unwrap();
    assert_eq!(obj.header().data_type().unwrap(), NiftiType::Int16);
    let stored = obj.into_volume().into_ndarray::<i16>().unwrap();
    assert_eq!(stored.shape(), &[SIZE, SIZE, SIZE]);
    assert_eq!(stored, output.data.clone().into_dyn());

    let (reloaded, _) = load_volume(&out_path).unwrap();
    assert_abs_diff_eq!(reloaded.affine, uni.affine, epsilon = 1e-6);
}
