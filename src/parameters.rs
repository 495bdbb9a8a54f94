//! Which files play the UNI, INV1, INV2 and output roles.

use glob::{glob, Pattern};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::common::VolumeRole;
use crate::error::{Result, SuppressionError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterNode {
    pub uni: Option<PathBuf>,
    pub inv1: Option<PathBuf>,
    pub inv2: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl ParameterNode {
    /// The path selected for `role`, if any.
    pub fn slot(&self, role: VolumeRole) -> Option<&Path> {
        match role {
            VolumeRole::Uni => self.uni.as_deref(),
            VolumeRole::Inv1 => self.inv1.as_deref(),
            VolumeRole::Inv2 => self.inv2.as_deref(),
            VolumeRole::Output => self.output.as_deref(),
        }
    }

    fn slot_mut(&mut self, role: VolumeRole) -> &mut Option<PathBuf> {
        match role {
            VolumeRole::Uni => &mut self.uni,
            VolumeRole::Inv1 => &mut self.inv1,
            VolumeRole::Inv2 => &mut self.inv2,
            VolumeRole::Output => &mut self.output,
        }
    }

    /// Roles that still need a volume.
    pub fn missing(&self) -> Vec<VolumeRole> {
        VolumeRole::all()
            .into_iter()
            .filter(|role| self.slot(*role).is_none())
            .collect()
    }

    /// True once all four volumes are selected.
    pub fn can_apply(&self) -> bool {
        self.missing().is_empty()
    }

    /// Short description of what applying would do, or what is still needed.
    pub fn status(&self) -> &'static str {
        if self.can_apply() {
            "Apply background suppression"
        } else {
            "Select input and output volume nodes"
        }
    }

    /// Fill empty input slots from `dir` by matching `*UNI*`, `*INV1*` and `*INV2*` nifti files.
    ///
    /// Slots already set are left alone and the selected output file is never picked up as an
    /// input. A pattern that matches more than one file is an error.
    ///
    /// # Arguments
    ///
    /// * `dir` - The directory to search. Glob metacharacters in its name are taken literally.
    pub fn discover(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Err(SuppressionError::discovery(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        for (role, tag) in [
            (VolumeRole::Uni, "UNI"),
            (VolumeRole::Inv1, "INV1"),
            (VolumeRole::Inv2, "INV2"),
        ] {
            if self.slot(role).is_some() {
                continue;
            }
            let pattern = format!("{}/*{}*.nii*", Pattern::escape(&dir.to_string_lossy()), tag);
            let paths: Vec<PathBuf> = glob(&pattern)
                .map_err(|e| SuppressionError::discovery(e.to_string()))?
                .filter_map(|entry| entry.ok())
                .filter(|path| !self.is_output(path))
                .collect();
            match paths.len() {
                0 => {}
                1 => {
                    info!("Found {} image: {}", role, paths[0].display());
                    *self.slot_mut(role) = paths.into_iter().next();
                }
                n => {
                    return Err(SuppressionError::discovery(format!(
                        "{} files match {} in {}",
                        n,
                        role,
                        dir.display()
                    )))
                }
            }
        }
        Ok(())
    }

    fn is_output(&self, path: &Path) -> bool {
        match self.output.as_deref() {
            Some(output) if output == path => true,
            Some(output) => match (output.canonicalize(), path.canonicalize()) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            },
            None => false,
        }
    }
}
