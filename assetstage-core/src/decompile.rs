//! Assembly decompilation
//!
//! Runs a decompiler over every non-reference assembly, each into
//! `<assets>/<Scripts|Plugins>/<AssemblyName>/`, and records the assembly so
//! later stages know its sources already exist.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::assemblies::{is_reference_assembly, scripts_folder_name, to_assembly_name};
use crate::descriptor::DescriptorMap;
use crate::path_utils::sanitize_filename;
use crate::version::UnityVersion;

/// C# language version targeted by the decompiler
///
/// Serialized by variant name (`"CSharp7_3"`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LanguageVersion {
    /// Pick the newest version the export target's compiler supports
    #[default]
    Auto,
    CSharp4,
    CSharp7_3,
    CSharp8,
    CSharp9,
    CSharp10,
    Latest,
}

impl LanguageVersion {
    /// Resolve `Auto` against the Unity version being exported to
    pub fn resolve(self, version: &UnityVersion) -> Self {
        match self {
            Self::Auto if version.is_greater_equal(2022, 2) => Self::CSharp9,
            Self::Auto if version.is_greater_equal(2020, 2) => Self::CSharp8,
            Self::Auto if version.is_greater_equal(2018, 3) => Self::CSharp7_3,
            Self::Auto => Self::CSharp4,
            other => other,
        }
    }

    /// Value for ILSpy's `--languageversion` option
    pub fn ilspy_name(self) -> &'static str {
        match self {
            Self::CSharp4 => "CSharp4",
            Self::CSharp7_3 => "CSharp7_3",
            Self::CSharp8 => "CSharp8_0",
            Self::CSharp9 => "CSharp9_0",
            Self::CSharp10 => "CSharp10_0",
            Self::Auto | Self::Latest => "Latest",
        }
    }
}

/// How much of each script body is kept
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ScriptContentLevel {
    /// Scripts are not decompiled; only stubs are written
    Level0,
    /// Method bodies stripped; decompilers that can't strip fall back to `Level2`
    Level1,
    /// Full method bodies
    #[default]
    Level2,
}

/// Settings passed to every decompiler call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompileSettings {
    pub language_version: LanguageVersion,
    pub content_level: ScriptContentLevel,
}

/// A managed assembly available for export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedAssembly {
    /// Assembly name without extension
    pub name: String,
    /// Location of the assembly file
    pub path: PathBuf,
}

impl ManagedAssembly {
    /// Build from a file path, naming the assembly after the file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| to_assembly_name(&n.to_string_lossy()).to_string())
            .unwrap_or_default();
        Self { name, path }
    }
}

/// Something that turns an assembly into a source tree
pub trait Decompiler {
    fn decompile_project(
        &mut self,
        assembly: &ManagedAssembly,
        output_dir: &Path,
        settings: &DecompileSettings,
    ) -> Result<()>;
}

/// Decompile every non-reference assembly under `output_root`
///
/// Returns the number of assemblies handed to the decompiler.
pub fn run(
    decompiler: &mut dyn Decompiler,
    assemblies: &[ManagedAssembly],
    output_root: &Path,
    settings: &DecompileSettings,
    descriptors: &mut DescriptorMap,
) -> Result<usize> {
    let mut decompiled = 0;

    for assembly in assemblies {
        let name = to_assembly_name(&assembly.name);
        if is_reference_assembly(name) {
            tracing::debug!("Skipping reference assembly {}", name);
            continue;
        }

        tracing::info!("Decompiling {}", name);
        let output_dir = assembly_output_dir(output_root, name);
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        decompiler
            .decompile_project(assembly, &output_dir, settings)
            .with_context(|| format!("Failed to decompile {}", name))?;

        descriptors.try_add(name, &output_dir);
        decompiled += 1;
    }

    Ok(decompiled)
}

/// `<output_root>/<Scripts|Plugins>/<name>`, with the name sanitized like script paths
pub fn assembly_output_dir(output_root: &Path, assembly_name: &str) -> PathBuf {
    output_root
        .join(scripts_folder_name(assembly_name))
        .join(sanitize_filename(assembly_name))
}

/// Decompiler backed by an ILSpy compatible command line tool
#[derive(Debug, Clone)]
pub struct CommandDecompiler {
    program: String,
}

impl CommandDecompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Content level this tool actually produces for `requested`
    ///
    /// ILSpy has no option to strip method bodies, so `Level1` falls back to
    /// full bodies with a warning.
    pub fn effective_content_level(&self, requested: ScriptContentLevel) -> ScriptContentLevel {
        match requested {
            ScriptContentLevel::Level1 => {
                tracing::warn!(
                    "{} cannot strip method bodies, decompiling with full bodies instead",
                    self.program
                );
                ScriptContentLevel::Level2
            }
            other => other,
        }
    }

    fn command(&self, assembly: &ManagedAssembly, output_dir: &Path, settings: &DecompileSettings) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--project")
            .arg("--outputdir")
            .arg(output_dir)
            .arg("--languageversion")
            .arg(settings.language_version.ilspy_name())
            .arg(&assembly.path);
        cmd
    }
}

impl Decompiler for CommandDecompiler {
    fn decompile_project(
        &mut self,
        assembly: &ManagedAssembly,
        output_dir: &Path,
        settings: &DecompileSettings,
    ) -> Result<()> {
        if self.effective_content_level(settings.content_level) == ScriptContentLevel::Level0 {
            tracing::debug!("Content level 0, not decompiling {}", assembly.name);
            return Ok(());
        }

        let output = self
            .command(assembly, output_dir, settings)
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}
