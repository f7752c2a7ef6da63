//! Assembly bookkeeping for a script export run

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An assembly touched during export and the directory its sources live in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyDescriptor {
    pub assembly_name: String,
    pub output_dir: PathBuf,
}

impl AssemblyDescriptor {
    pub fn new(assembly_name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            assembly_name: assembly_name.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// Descriptors keyed by assembly name; the first insert for a name wins
#[derive(Debug, Default)]
pub struct DescriptorMap {
    entries: BTreeMap<String, AssemblyDescriptor>,
}

impl DescriptorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the assembly is already registered. Returns true if inserted.
    pub fn try_add(&mut self, assembly_name: &str, output_dir: &Path) -> bool {
        if self.entries.contains_key(assembly_name) {
            return false;
        }
        self.entries.insert(
            assembly_name.to_string(),
            AssemblyDescriptor::new(assembly_name, output_dir),
        );
        true
    }

    pub fn contains(&self, assembly_name: &str) -> bool {
        self.entries.contains_key(assembly_name)
    }

    pub fn get(&self, assembly_name: &str) -> Option<&AssemblyDescriptor> {
        self.entries.get(assembly_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptors ordered by assembly name
    pub fn iter(&self) -> impl Iterator<Item = &AssemblyDescriptor> {
        self.entries.values()
    }
}
