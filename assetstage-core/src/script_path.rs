//! Script export paths
//!
//! Maps an (assembly, namespace, class) triple to the file a script is
//! exported to: `<Scripts|Plugins>/<Assembly>/<Name/Space>/<Class>.cs`.

use std::path::PathBuf;

use crate::assemblies::{scripts_folder_name, to_assembly_name};
use crate::path_utils::sanitize_filename;

/// Extension of exported source files
pub const SOURCE_EXTENSION: &str = "cs";

/// Where a script is exported, relative to the assets directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptExportTarget {
    pub folder: PathBuf,
    pub file_name: String,
}

impl ScriptExportTarget {
    /// Folder joined with file name
    pub fn relative_path(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }
}

/// Compute the export target of a script
pub fn resolve(assembly_name: &str, namespace: &str, class_name: &str) -> ScriptExportTarget {
    let assembly = to_assembly_name(assembly_name);

    let mut folder = PathBuf::from(scripts_folder_name(assembly));
    folder.push(sanitize_filename(assembly));
    for segment in namespace.split('.').filter(|s| !s.is_empty()) {
        folder.push(sanitize_filename(segment));
    }

    ScriptExportTarget {
        folder,
        file_name: format!("{}.{}", sanitize_filename(class_name), SOURCE_EXTENSION),
    }
}
