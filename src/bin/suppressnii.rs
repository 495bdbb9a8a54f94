//! Quick commandline utility to suppress the background noise of an MP2RAGE UNI image.
//!
//! The UNI, INV1 and INV2 nifti files are either passed one by one or picked up from a
//! directory by name. The result is written as a 16 bit nifti file in the space of the UNI
//! image.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use suppressnii::common::{OutputVolume, VolumeRole};
use suppressnii::nifti_io::{check_output, load_volume, save_volume, volume_name};
use suppressnii::{ParameterNode, VolumeCombiner, DEFAULT_BETA};

// use clap to create commandline interface
#[derive(Parser, Debug)]
#[command(author, about, version, long_about)]
struct Args {
    /// the UNI nifti file
    #[arg(short, long)]
    uni: Option<PathBuf>,

    /// the first inversion (INV1) nifti file
    #[arg(long)]
    inv1: Option<PathBuf>,

    /// the second inversion (INV2) nifti file
    #[arg(long)]
    inv2: Option<PathBuf>,

    /// a directory to search for *UNI*, *INV1* and *INV2* nifti files
    /// that were not given explicitly
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// the name of the output nifti file
    #[arg(short, long)]
    output: PathBuf,

    /// filter strength; larger values suppress more background
    #[arg(short, long, default_value_t = DEFAULT_BETA)]
    beta: f64,

    /// reserved, currently has no effect
    #[arg(long)]
    invert: bool,

    /// replace the output file if it already exists
    #[arg(long)]
    overwrite: bool,
}

fn run(cli: Args) -> Result<()> {
    let mut params = ParameterNode {
        uni: cli.uni,
        inv1: cli.inv1,
        inv2: cli.inv2,
        output: Some(cli.output.clone()),
    };
    if let Some(dir) = &cli.input_dir {
        params.discover(dir)?;
    }
    if !params.can_apply() {
        let missing: Vec<String> = params.missing().iter().map(|r| r.to_string()).collect();
        bail!("{}: missing {}", params.status(), missing.join(", "));
    }
    check_output(&cli.output, cli.overwrite)?;

    let (uni, uni_header) = load_input(&params, VolumeRole::Uni)?;
    let (inv1, _) = load_input(&params, VolumeRole::Inv1)?;
    let (inv2, _) = load_input(&params, VolumeRole::Inv2)?;

    let combiner = VolumeCombiner::default().with_beta(cli.beta)?;
    if cli.invert {
        warn!("--invert is reserved and currently ignored");
    }
    let mut output = OutputVolume::zeros(volume_name(&cli.output), uni.shape());
    combiner
        .process(
            Some(&uni),
            Some(&inv1),
            Some(&inv2),
            Some(&mut output),
            cli.invert,
        )
        .context("Failed to compute results")?;

    save_volume(&cli.output, &output, &uni_header)?;
    info!("Final shape: {:?}", output.shape());
    Ok(())
}

fn load_input(
    params: &ParameterNode,
    role: VolumeRole,
) -> Result<(suppressnii::ScalarVolume<f64>, nifti::NiftiHeader)> {
    let path: &Path = params
        .slot(role)
        .with_context(|| format!("no {} image selected", role))?;
    if !path.exists() {
        bail!("Did not find {} file {}", role, path.display());
    }
    load_volume(path).with_context(|| format!("Could not read {} file {}", role, path.display()))
}

// main function parses commandline arguments and runs the program
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Args::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error! {:#}", e);
        std::process::exit(-2);
    }
}
