//! Assembly definition files
//!
//! Unity 2017.3 introduced `.asmdef` files, which split a project's scripts
//! into separate assemblies. Exported assemblies other than the predefined
//! ones get one so the project compiles into the same assembly layout.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::assemblies::is_predefined_assembly;
use crate::descriptor::{AssemblyDescriptor, DescriptorMap};
use crate::path_utils::sanitize_filename;
use crate::version::UnityVersion;

/// First Unity version that understands assembly definitions
pub const ASMDEF_MIN_VERSION: (u16, u16) = (2017, 3);

pub const ASMDEF_EXTENSION: &str = "asmdef";

/// Writes one assembly definition for a descriptor
pub trait AssemblyDefinitionWriter {
    fn write(&mut self, descriptor: &AssemblyDescriptor) -> Result<()>;
}

pub fn supports_assembly_definitions(version: &UnityVersion) -> bool {
    version.is_greater_equal(ASMDEF_MIN_VERSION.0, ASMDEF_MIN_VERSION.1)
}

/// Write assembly definitions for every non-predefined assembly
///
/// Does nothing when the target version predates assembly definitions.
/// Returns how many definitions were written.
pub fn emit(
    descriptors: &DescriptorMap,
    supports_feature: bool,
    writer: &mut dyn AssemblyDefinitionWriter,
) -> Result<usize> {
    if !supports_feature || descriptors.is_empty() {
        return Ok(0);
    }

    let mut written = 0;
    for descriptor in descriptors.iter() {
        if is_predefined_assembly(&descriptor.assembly_name) {
            continue;
        }
        writer.write(descriptor)?;
        written += 1;
    }
    Ok(written)
}

/// Contents of an `.asmdef` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyDefinition {
    pub name: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub include_platforms: Vec<String>,
    #[serde(default)]
    pub exclude_platforms: Vec<String>,
    #[serde(default)]
    pub allow_unsafe_code: bool,
    #[serde(default = "default_true")]
    pub auto_referenced: bool,
}

fn default_true() -> bool {
    true
}

impl AssemblyDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            references: Vec::new(),
            include_platforms: Vec::new(),
            exclude_platforms: Vec::new(),
            // Decompiled code may contain pointers
            allow_unsafe_code: true,
            auto_referenced: true,
        }
    }
}

/// Writes `<output_dir>/<AssemblyName>.asmdef` as JSON
#[derive(Debug, Default)]
pub struct AsmdefWriter {
    written: Vec<PathBuf>,
}

impl AsmdefWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn asmdef_path(descriptor: &AssemblyDescriptor) -> PathBuf {
        descriptor.output_dir.join(format!(
            "{}.{}",
            sanitize_filename(&descriptor.assembly_name),
            ASMDEF_EXTENSION
        ))
    }
}

impl AssemblyDefinitionWriter for AsmdefWriter {
    fn write(&mut self, descriptor: &AssemblyDescriptor) -> Result<()> {
        let path = Self::asmdef_path(descriptor);
        let definition = AssemblyDefinition::new(&descriptor.assembly_name);

        fs::create_dir_all(&descriptor.output_dir)
            .with_context(|| format!("Failed to create {}", descriptor.output_dir.display()))?;
        let json = serde_json::to_string_pretty(&definition)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!("Wrote assembly definition {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn read_assembly_definition(path: &Path) -> AssemblyDefinition {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn descriptors(root: &Path, names: &[&str]) -> DescriptorMap {
        let mut map = DescriptorMap::new();
        for name in names {
            map.try_add(name, &root.join("Scripts").join(name));
        }
        map
    }

    #[test]
    fn test_supports_assembly_definitions() {
        assert!(!supports_assembly_definitions(&"2017.2.1f1".parse().unwrap()));
        assert!(supports_assembly_definitions(&"2017.3.0f3".parse().unwrap()));
        assert!(supports_assembly_definitions(&"2022.3.10f1".parse().unwrap()));
    }

    #[test]
    fn test_emit_skips_predefined() {
        let temp_dir = TempDir::new().unwrap();
        let map = descriptors(temp_dir.path(), &["Assembly-CSharp", "Game.Runtime", "Game.Editor"]);
        let mut writer = AsmdefWriter::new();

        let count = emit(&map, true, &mut writer).unwrap();

        assert_eq!(count, 2);
        let runtime = temp_dir.path().join("Scripts/Game.Runtime/Game.Runtime.asmdef");
        assert_eq!(read_assembly_definition(&runtime).name, "Game.Runtime");
        assert!(!temp_dir.path().join("Scripts/Assembly-CSharp/Assembly-CSharp.asmdef").exists());
    }

    #[test]
    fn test_emit_unsupported_version_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let map = descriptors(temp_dir.path(), &["Game.Runtime", "Game.Editor", "Tools"]);
        let mut writer = AsmdefWriter::new();

        let supported = supports_assembly_definitions(&"5.6.7f1".parse().unwrap());
        let count = emit(&map, supported, &mut writer).unwrap();

        assert_eq!(count, 0);
        assert!(writer.written().is_empty());
        assert!(!temp_dir.path().join("Scripts").exists());
    }

    #[test]
    fn test_asmdef_file_name_sanitized() {
        let temp_dir = TempDir::new().unwrap();
        let mut map = DescriptorMap::new();
        map.try_add("Weird:Game", &temp_dir.path().join("Scripts/Weird_Game"));
        let mut writer = AsmdefWriter::new();

        emit(&map, true, &mut writer).unwrap();

        let path = temp_dir.path().join("Scripts/Weird_Game/Weird_Game.asmdef");
        assert_eq!(writer.written(), &[path.clone()]);
        assert_eq!(read_assembly_definition(&path).name, "Weird:Game");
    }

    #[test]
    fn test_emit_empty_map() {
        let mut writer = AsmdefWriter::new();
        assert_eq!(emit(&DescriptorMap::new(), true, &mut writer).unwrap(), 0);
    }

    #[test]
    fn test_asmdef_json_shape() {
        let json = serde_json::to_value(AssemblyDefinition::new("Game")).unwrap();
        assert_eq!(json["name"], "Game");
        assert_eq!(json["allowUnsafeCode"], true);
        assert!(json["includePlatforms"].as_array().unwrap().is_empty());
    }
}
