//! Export configuration
//!
//! Defines the `assetstage.json` file. Every field has a default so a missing
//! or partial file still produces a usable configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decompile::{DecompileSettings, LanguageVersion, ScriptContentLevel};
use crate::version::UnityVersion;

/// Default file name for the configuration
pub const CONFIG_FILE_NAME: &str = "assetstage.json";

/// Errors that can occur when loading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// The main configuration file (assetstage.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Scratch workspace settings
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Script decompilation settings
    #[serde(default)]
    pub scripts: ScriptConfig,

    /// Unity version the exported project targets
    #[serde(default = "default_export_version")]
    pub export_version: UnityVersion,

    /// Command used to decompile assemblies (ILSpy compatible CLI)
    #[serde(default = "default_decompiler_command")]
    pub decompiler_command: String,
}

fn default_export_version() -> UnityVersion {
    UnityVersion {
        major: 2021,
        minor: 3,
        build: 0,
        release_type: Some('f'),
        release_number: 1,
    }
}

fn default_decompiler_command() -> String {
    "ilspycmd".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            workspace: WorkspaceConfig::default(),
            scripts: ScriptConfig::default(),
            export_version: default_export_version(),
            decompiler_command: default_decompiler_command(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from `path`, falling back to defaults if the file is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Decompiler settings with `Auto` language versions resolved for the export version
    pub fn decompile_settings(&self) -> DecompileSettings {
        DecompileSettings {
            language_version: self.scripts.language_version.resolve(&self.export_version),
            content_level: self.scripts.content_level,
        }
    }
}

/// Scratch workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Name of the workspace directory (created next to the executable)
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Length of the random folder names allocated for extracted archives (at least 6)
    #[serde(default = "default_random_name_length")]
    pub random_name_length: usize,
}

fn default_root_name() -> String {
    "temp".to_string()
}

fn default_random_name_length() -> usize {
    10
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            random_name_length: default_random_name_length(),
        }
    }
}

/// Script export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptConfig {
    /// C# language version the decompiler should target
    #[serde(default)]
    pub language_version: LanguageVersion,

    /// How much of each script to decompile
    #[serde(default)]
    pub content_level: ScriptContentLevel,
}
