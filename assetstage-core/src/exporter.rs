//! Script export
//!
//! Runs the three script stages in order over a whole batch of assets:
//! decompile assemblies, write stubs for the remaining scripts, then emit
//! assembly definitions from the combined bookkeeping.

use std::path::Path;

use crate::asmdef::{self, AssemblyDefinitionWriter};
use crate::asset::Asset;
use crate::decompile::{self, DecompileSettings, Decompiler, ManagedAssembly};
use crate::descriptor::DescriptorMap;
use crate::materialize::{self, MaterializeReport, MetaWriter};
use crate::version::UnityVersion;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Scripts can only be exported all at once")]
    SingleAssetUnsupported,

    #[error("Assets directory path is empty")]
    EmptyOutputPath,

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Totals for one export run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub decompiled: usize,
    pub scripts: MaterializeReport,
    pub descriptors: usize,
    pub assembly_definitions: usize,
}

/// Exports MonoScript assets as a source tree
pub struct ScriptExporter<D: Decompiler> {
    decompiler: D,
    assemblies: Vec<ManagedAssembly>,
    settings: DecompileSettings,
}

impl<D: Decompiler> ScriptExporter<D> {
    pub fn new(decompiler: D, assemblies: Vec<ManagedAssembly>, settings: DecompileSettings) -> Self {
        Self {
            decompiler,
            assemblies,
            settings,
        }
    }

    /// Whether this exporter handles `asset`
    pub fn handles(&self, asset: &Asset) -> bool {
        asset.as_script().is_some()
    }

    /// Scripts depend on each other through their assemblies, so one asset
    /// can't be exported on its own.
    pub fn export_single(&mut self, _asset: &Asset, _path: &Path) -> Result<(), ExportError> {
        Err(ExportError::SingleAssetUnsupported)
    }

    /// Export every script in `assets` under `assets_dir`
    pub fn export_all(
        &mut self,
        assets: &[Asset],
        assets_dir: &Path,
        export_version: &UnityVersion,
        meta_writer: Option<&mut dyn MetaWriter>,
        asmdef_writer: &mut dyn AssemblyDefinitionWriter,
    ) -> Result<ExportSummary, ExportError> {
        tracing::info!("Exporting scripts...");
        if assets_dir.as_os_str().is_empty() {
            return Err(ExportError::EmptyOutputPath);
        }

        let mut descriptors = DescriptorMap::new();

        let decompiled = if self.assemblies.is_empty() {
            0
        } else {
            decompile::run(
                &mut self.decompiler,
                &self.assemblies,
                assets_dir,
                &self.settings,
                &mut descriptors,
            )?
        };

        let scripts = materialize::materialize(assets, assets_dir, &mut descriptors, meta_writer)?;
        tracing::info!(
            "Scripts: {} stubs written, {} already present, {} metadata conflicts",
            scripts.stubs_written.len(),
            scripts.existing.len(),
            scripts.conflicts.len()
        );

        let supported = asmdef::supports_assembly_definitions(export_version);
        let assembly_definitions = asmdef::emit(&descriptors, supported, asmdef_writer)?;

        Ok(ExportSummary {
            decompiled,
            scripts,
            descriptors: descriptors.len(),
            assembly_definitions,
        })
    }
}
