//! Project manifest (`manifest.toml`).
//!
//! ```toml
//! name = "Ore Hunter"
//! game_id = "GORE01"
//! version = 0
//!
//! [levels.overworld]
//! gltf = ["overworld.glb", "props.gltf"]
//! script = ["overworld.lua"]
//! ```
//!
//! Level asset paths are relative to the project's `assets/` directory.

use std::{collections::BTreeMap, fs, path::Path, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{data_structures::disc::GameId, error::ComposeError};

pub const MANIFEST_FILE: &str = "manifest.toml";

/// Level names become disc file names and share the game name's limit.
pub const MAX_LEVEL_NAME_LEN: usize = 63;

#[derive(Clone, Debug, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub game_id: String,
    #[serde(default)]
    pub version: u8,
    /// Levels in name order; each becomes one container on disc.
    #[serde(default)]
    pub levels: BTreeMap<String, Level>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub gltf: Vec<PathBuf>,
    /// Listed for the runtime; scripts are not packed yet.
    #[serde(default)]
    pub script: Vec<PathBuf>,
}

impl FromStr for Manifest {
    type Err = toml::de::Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        toml::from_str(text)
    }
}

impl Manifest {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ComposeError::resource(path, e))
            .context("failed to open manifest")?;
        text.parse()
            .with_context(|| format!("failed to parse manifest \"{}\"", path.display()))
    }

    /// Checks every length-limited field and returns the disc identity.
    pub fn validate(&self) -> Result<GameId, ComposeError> {
        let id = GameId::new(&self.game_id, self.version, &self.name)?;
        for name in self.levels.keys() {
            if name.is_empty() || name.len() > MAX_LEVEL_NAME_LEN {
                return Err(ComposeError::Validation {
                    field: "level name",
                    len: name.len(),
                    expected: "between 1 and 63",
                });
            }
        }
        Ok(id)
    }
}
