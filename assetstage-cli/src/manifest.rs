//! Export manifest
//!
//! The asset model lives outside this tool, so `assetstage export` reads the
//! inputs, assemblies and script assets to export from a JSON manifest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assetstage_core::{Asset, ManagedAssembly};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    /// Game files or archives to stage
    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    /// Assembly files; relative paths are looked up inside each staged input
    #[serde(default)]
    pub assemblies: Vec<PathBuf>,

    /// Assets to export
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl ExportManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read manifest {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse manifest {}", path.display()))
    }

    /// Resolve assembly paths against the staged inputs
    ///
    /// Assemblies not found in any staged directory are kept as given and
    /// left for the decompiler to report.
    pub fn resolve_assemblies(&self, staged: &[PathBuf]) -> Vec<ManagedAssembly> {
        self.assemblies
            .iter()
            .map(|assembly| {
                let found = if assembly.is_absolute() {
                    None
                } else {
                    staged
                        .iter()
                        .filter(|dir| dir.is_dir())
                        .map(|dir| dir.join(assembly))
                        .find(|candidate| candidate.is_file())
                };
                ManagedAssembly::from_path(found.unwrap_or_else(|| assembly.clone()))
            })
            .collect()
    }
}
