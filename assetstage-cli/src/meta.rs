//! Minimal Unity `.meta` files for exported scripts

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use assetstage_core::{pathbuf_with_suffix, MetaWriter, ScriptAsset, META_SUFFIX};
use uuid::Uuid;

/// Writes a `MonoImporter` meta file with a fresh GUID next to each script
#[derive(Debug, Default)]
pub struct GuidMetaWriter {
    pub written: usize,
}

impl MetaWriter for GuidMetaWriter {
    fn write_meta(&mut self, script: &ScriptAsset, file_path: &Path) -> Result<()> {
        let meta_path = pathbuf_with_suffix(file_path, META_SUFFIX);
        fs::write(&meta_path, mono_importer_meta(&Uuid::new_v4()))
            .with_context(|| format!("Failed to write {}", meta_path.display()))?;

        tracing::debug!("Wrote meta for {} at {}", script.full_name(), meta_path.display());
        self.written += 1;
        Ok(())
    }
}

fn mono_importer_meta(guid: &Uuid) -> String {
    format!(
        "fileFormatVersion: 2\n\
         guid: {}\n\
         MonoImporter:\n  \
         externalObjects: {{}}\n  \
         serializedVersion: 2\n  \
         defaultReferences: []\n  \
         executionOrder: 0\n  \
         icon: {{instanceID: 0}}\n  \
         userData: \n  \
         assetBundleName: \n  \
         assetBundleVariant: \n",
        guid.simple()
    )
}
