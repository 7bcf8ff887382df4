//! End-to-end build: manifest → one container per level → disc image.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::{
    container::pack_container,
    gcm::build_gcm,
    manifest::{Level, Manifest, MANIFEST_FILE},
    resources::load_scene_asset,
};

/// Directory, relative to the project root, that level assets live in.
pub const ASSETS_DIR: &str = "assets";

/// Image written into the project root when no output path is given.
pub const DEFAULT_OUTPUT: &str = "game.gcm";

#[derive(Clone, Debug)]
pub struct BuildOptions {
    pub bootloader: PathBuf,
    pub runtime: PathBuf,
    pub project: PathBuf,
    pub output: Option<PathBuf>,
}

impl BuildOptions {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.project.join(DEFAULT_OUTPUT))
    }
}

/// Builds the project and returns the path of the written disc image.
/// Nothing is written to the output path unless every step succeeds.
pub fn build(options: &BuildOptions) -> Result<PathBuf> {
    let manifest = Manifest::from_path(&options.project.join(MANIFEST_FILE))?;
    let id = manifest.validate().context("invalid manifest")?;

    let staging = staging_dir(&options.project)?;
    for (level_name, level) in &manifest.levels {
        let container = pack_level(level, &options.project)
            .with_context(|| format!("failed to pack level \"{level_name}\""))?;
        let file_name = format!("{level_name}.PAK");
        fs::write(staging.path().join(&file_name), container)
            .with_context(|| format!("failed to write packed level file \"{file_name}\""))?;
    }

    let gcm = build_gcm(
        &id,
        &options.bootloader,
        &options.runtime,
        staging.path(),
    )
    .context("failed to pack GCM image")?;

    let output = options.output_path();
    fs::write(&output, gcm)
        .with_context(|| format!("failed to write disc image \"{}\"", output.display()))?;
    log::info!("Wrote {}", output.display());
    Ok(output)
}

/// Loads every scene asset of `level` and packs them into one container.
pub fn pack_level(level: &Level, project: &Path) -> Result<Vec<u8>> {
    for script in &level.script {
        log::warn!("Script {} is not packed", script.display());
    }
    let assets_dir = project.join(ASSETS_DIR);
    let assets = level
        .gltf
        .iter()
        .map(|path| load_scene_asset(&assets_dir.join(path)))
        .collect::<Result<Vec<_>>>()?;
    pack_container(&assets)
}

/// Packed levels are staged in a temporary directory that becomes the
/// disc's file tree. Falls back to the project directory when the system
/// temporary directory is unavailable.
fn staging_dir(project: &Path) -> Result<TempDir> {
    let builder = || {
        let mut builder = tempfile::Builder::new();
        builder.prefix("discpak.");
        builder
    };
    builder()
        .tempdir()
        .or_else(|e| {
            log::warn!("System temporary directory unavailable ({e}), staging in project");
            builder().tempdir_in(project)
        })
        .context("failed to create temporary working directory")
}
