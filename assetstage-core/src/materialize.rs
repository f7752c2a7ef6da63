//! Stub script generation
//!
//! Every script asset needs a source file so the exported project compiles
//! and its `.meta` GUIDs line up. Scripts already produced by the decompiler
//! are left alone; everything else gets a placeholder `MonoBehaviour`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::assemblies::SCRIPTS_FOLDER;
use crate::asset::{Asset, ScriptAsset};
use crate::descriptor::DescriptorMap;
use crate::path_utils::{pathbuf_with_suffix, sanitize_filename};
use crate::script_path;

/// Suffix of the metadata file next to every exported asset
pub const META_SUFFIX: &str = ".meta";

/// Receives each exported script so its metadata file can be written
///
/// Implementors are expected to create `<file_path>.meta`.
pub trait MetaWriter {
    fn write_meta(&mut self, script: &ScriptAsset, file_path: &Path) -> Result<()>;
}

/// What happened during one materialize pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Stub files written in this pass
    pub stubs_written: Vec<PathBuf>,
    /// Scripts whose file already existed (decompiled or from an earlier pass)
    pub existing: Vec<PathBuf>,
    /// Files handed to the meta writer
    pub handed_off: Vec<PathBuf>,
    /// Files whose `.meta` already existed, so the meta writer was not called
    pub conflicts: Vec<PathBuf>,
    /// Engine scripts that were not exported
    pub skipped_engine: usize,
}

/// Write stub sources for scripts without a file and hand each one to `meta_writer`
pub fn materialize(
    assets: &[Asset],
    output_root: &Path,
    descriptors: &mut DescriptorMap,
    mut meta_writer: Option<&mut dyn MetaWriter>,
) -> Result<MaterializeReport> {
    let mut report = MaterializeReport::default();

    for script in assets.iter().filter_map(Asset::as_script) {
        if script.is_engine_script() {
            report.skipped_engine += 1;
            continue;
        }

        let target = script_path::resolve(&script.assembly_name, &script.namespace, &script.class_name);
        let folder = output_root.join(&target.folder);
        let file_path = output_root.join(target.relative_path());

        if file_path.exists() {
            report.existing.push(file_path.clone());
        } else {
            fs::create_dir_all(&folder)
                .with_context(|| format!("Failed to create {}", folder.display()))?;
            fs::write(&file_path, stub_source(&script.namespace, &script.class_name))
                .with_context(|| format!("Failed to write {}", file_path.display()))?;
            tracing::debug!("Wrote stub for {} at {}", script.full_name(), file_path.display());
            report.stubs_written.push(file_path.clone());

            let assembly = script.assembly();
            descriptors.try_add(assembly, &stub_descriptor_dir(output_root, assembly));
        }

        if let Some(writer) = meta_writer.as_deref_mut() {
            let meta_path = pathbuf_with_suffix(&file_path, META_SUFFIX);
            if meta_path.exists() {
                tracing::error!("Metafile already exists at {}", meta_path.display());
                report.conflicts.push(file_path);
            } else {
                writer
                    .write_meta(script, &file_path)
                    .with_context(|| format!("Failed to write metadata for {}", file_path.display()))?;
                report.handed_off.push(file_path);
            }
        }
    }

    Ok(report)
}

/// Descriptor directory for an assembly that only has stubs: `<output_root>/Scripts/<name>`
pub fn stub_descriptor_dir(output_root: &Path, assembly_name: &str) -> PathBuf {
    output_root.join(SCRIPTS_FOLDER).join(sanitize_filename(assembly_name))
}

/// Placeholder source for a script that has no decompiled counterpart
pub fn stub_source(namespace: &str, class_name: &str) -> String {
    const COMMENT: &str =
        "//Dummy class. Use different settings or provide .NET dll files for better decompilation output";

    if namespace.is_empty() {
        format!(
            "using UnityEngine;\n\npublic class {class_name} : MonoBehaviour\n{{\n\t{COMMENT}\n}}\n"
        )
    } else {
        format!(
            "using UnityEngine;\n\nnamespace {namespace}\n{{\n\tpublic class {class_name} : MonoBehaviour\n\t{{\n\t\t{COMMENT}\n\t}}\n}}\n"
        )
    }
}
