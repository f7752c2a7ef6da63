//! Scratch workspace
//!
//! A single process-lifetime directory that archives get extracted into.
//! It is wiped and recreated on startup so nothing from a previous run leaks
//! into the current one, and every extraction gets its own random subfolder.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::config::WorkspaceConfig;

/// Characters used for random folder names (no `0`/`O`, `1`/`l`/`I`)
const RANDOM_NAME_ALPHABET: &[u8] = b"abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Shortest random folder name accepted from configuration
pub const MIN_RANDOM_NAME_LENGTH: usize = 6;

/// Errors that can occur while setting up or tearing down the workspace
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Failed to remove stale workspace {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create workspace {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not locate the running executable: {0}")]
    ExecutableDir(#[source] std::io::Error),

    #[error("Random folder name length {0} is too short (minimum {MIN_RANDOM_NAME_LENGTH})")]
    NameLength(usize),
}

/// The scratch root and its random-name allocator
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    random_name_length: usize,
}

impl Workspace {
    /// Delete anything at `root` and recreate it empty
    pub fn initialize(root: impl Into<PathBuf>, config: &WorkspaceConfig) -> Result<Self, WorkspaceError> {
        let root = root.into();

        if config.random_name_length < MIN_RANDOM_NAME_LENGTH {
            return Err(WorkspaceError::NameLength(config.random_name_length));
        }

        if root.exists() {
            fs::remove_dir_all(&root).map_err(|source| WorkspaceError::Remove {
                path: root.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&root).map_err(|source| WorkspaceError::Create {
            path: root.clone(),
            source,
        })?;

        tracing::debug!("Initialized workspace at {}", root.display());

        Ok(Self {
            root,
            random_name_length: config.random_name_length,
        })
    }

    /// Initialize the workspace next to the running executable
    pub fn in_executable_dir(config: &WorkspaceConfig) -> Result<Self, WorkspaceError> {
        let exe = std::env::current_exe().map_err(WorkspaceError::ExecutableDir)?;
        let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::initialize(dir.join(&config.root_name), config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a new random subfolder under the root
    ///
    /// The directory is not created; callers create it when they first write
    /// into it. Uniqueness relies on the identifier length.
    pub fn allocate_subfolder(&self) -> PathBuf {
        self.root.join(random_name(self.random_name_length))
    }

    /// Remove the workspace root and everything staged under it
    pub fn dispose(self) -> std::io::Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        tracing::debug!("Disposed workspace at {}", self.root.display());
        Ok(())
    }
}

/// Generate a random alphanumeric name of `len` characters
fn random_name(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| RANDOM_NAME_ALPHABET[rng.gen_range(0..RANDOM_NAME_ALPHABET.len())] as char)
        .collect()
}
