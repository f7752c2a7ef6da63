//! Asset variants seen by the script exporter

use serde::{Deserialize, Serialize};

use crate::assemblies::{is_engine_assembly, to_assembly_name};

/// A MonoScript asset: the reference from serialized data to a managed class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptAsset {
    /// Owning assembly as stored in the asset (may end in `.dll`)
    pub assembly_name: String,
    #[serde(default)]
    pub namespace: String,
    pub class_name: String,
}

impl ScriptAsset {
    pub fn new(assembly_name: impl Into<String>, namespace: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            assembly_name: assembly_name.into(),
            namespace: namespace.into(),
            class_name: class_name.into(),
        }
    }

    /// Assembly name without the `.dll` suffix
    pub fn assembly(&self) -> &str {
        to_assembly_name(&self.assembly_name)
    }

    /// Scripts from Unity's own assemblies
    pub fn is_engine_script(&self) -> bool {
        is_engine_assembly(&self.assembly_name)
    }

    /// `Namespace.Class`, or just `Class` without a namespace
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.namespace, self.class_name)
        }
    }
}

/// Assets handed to exporters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Asset {
    Script(ScriptAsset),
    Other { class_id: i32, name: String },
}

impl Asset {
    pub fn as_script(&self) -> Option<&ScriptAsset> {
        match self {
            Asset::Script(script) => Some(script),
            Asset::Other { .. } => None,
        }
    }
}

impl From<ScriptAsset> for Asset {
    fn from(script: ScriptAsset) -> Self {
        Asset::Script(script)
    }
}
