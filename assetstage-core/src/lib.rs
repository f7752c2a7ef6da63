//! AssetStage Core Library
//!
//! This crate provides the core functionality for AssetStage:
//! - Scratch workspace management
//! - Archive staging (zip/apk extraction)
//! - Assembly decompilation into a Unity project layout
//! - Stub script generation for scripts without decompiled sources
//! - Assembly definition (.asmdef) emission
//! - Export configuration

pub mod asmdef;
pub mod assemblies;
pub mod asset;
pub mod config;
pub mod decompile;
pub mod descriptor;
pub mod exporter;
pub mod materialize;
pub mod path_utils;
pub mod script_path;
pub mod staging;
pub mod version;
pub mod workspace;

// Re-export commonly used types
pub use asmdef::{AsmdefWriter, AssemblyDefinition, AssemblyDefinitionWriter};
pub use asset::{Asset, ScriptAsset};
pub use config::{ConfigError, ExportConfig, ScriptConfig, WorkspaceConfig, CONFIG_FILE_NAME};
pub use decompile::{
    CommandDecompiler, DecompileSettings, Decompiler, LanguageVersion, ManagedAssembly, ScriptContentLevel,
};
pub use descriptor::{AssemblyDescriptor, DescriptorMap};
pub use exporter::{ExportError, ExportSummary, ScriptExporter};
pub use materialize::{MaterializeReport, MetaWriter, META_SUFFIX};
pub use path_utils::{path_to_string, pathbuf_with_suffix, sanitize_filename};
pub use script_path::{resolve, ScriptExportTarget};
pub use staging::{stage, ArchiveKind, StageError};
pub use version::{UnityVersion, VersionError};
pub use workspace::{Workspace, WorkspaceError};
