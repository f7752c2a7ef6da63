//! Archive staging
//!
//! Turns a list of input paths into paths the importer can read directly.
//! Zip and APK archives are extracted into a fresh workspace subfolder; every
//! other input passes through untouched.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::workspace::Workspace;

pub const ZIP_EXTENSION: &str = "zip";
pub const APK_EXTENSION: &str = "apk";
pub const XAPK_EXTENSION: &str = "xapk";

/// Recognized archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Apk,
    /// Split APK bundle; recognized but not extracted
    Xapk,
}

impl ArchiveKind {
    /// Detect the archive kind from the extension (case-sensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            ZIP_EXTENSION => Some(Self::Zip),
            APK_EXTENSION => Some(Self::Apk),
            XAPK_EXTENSION => Some(Self::Xapk),
            _ => None,
        }
    }

    pub fn is_auto_extracted(self) -> bool {
        matches!(self, Self::Zip | Self::Apk)
    }
}

/// Errors that abort staging
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("Failed to open archive {archive}: {source}")]
    Open {
        archive: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid or corrupt archive {archive}: {source}")]
    Corrupt {
        archive: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive {archive} contains an unsafe entry path: {entry}")]
    UnsafeEntry { archive: PathBuf, entry: String },

    #[error("Failed to extract {archive} into {destination}: {source}")]
    Write {
        archive: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Stage every input, preserving order. One output path per input.
///
/// The first extraction failure aborts the whole operation.
pub fn stage<P: AsRef<Path>>(workspace: &Workspace, inputs: &[P]) -> Result<Vec<PathBuf>, StageError> {
    inputs
        .iter()
        .map(|input| stage_one(workspace, input.as_ref()))
        .collect()
}

fn stage_one(workspace: &Workspace, input: &Path) -> Result<PathBuf, StageError> {
    // Missing files are the caller's problem, not ours
    if !input.is_file() {
        return Ok(input.to_path_buf());
    }

    match ArchiveKind::from_path(input) {
        Some(kind) if kind.is_auto_extracted() => extract_to_random_folder(workspace, input),
        _ => Ok(input.to_path_buf()),
    }
}

/// Extract every entry of `archive` into a new workspace subfolder
pub fn extract_to_random_folder(workspace: &Workspace, archive: &Path) -> Result<PathBuf, StageError> {
    let destination = workspace.allocate_subfolder();
    tracing::info!(
        "Uncompressing files...\n\tFrom: {}\n\tTo: {}",
        archive.display(),
        destination.display()
    );

    let count = extract_zip(archive, &destination)?;
    tracing::debug!("Extracted {} files from {}", count, archive.display());

    Ok(destination)
}

fn extract_zip(archive_path: &Path, destination: &Path) -> Result<usize, StageError> {
    let corrupt = |source| StageError::Corrupt {
        archive: archive_path.to_path_buf(),
        source,
    };
    let write_err = |source| StageError::Write {
        archive: archive_path.to_path_buf(),
        destination: destination.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(|source| StageError::Open {
        archive: archive_path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(corrupt)?;

    // The destination exists even for an empty archive
    fs::create_dir_all(destination).map_err(write_err)?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(corrupt)?;

        let relative = entry.enclosed_name().ok_or_else(|| StageError::UnsafeEntry {
            archive: archive_path.to_path_buf(),
            entry: entry.name().to_string(),
        })?;
        let output_path = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(write_err)?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let mut out = File::create(&output_path).map_err(write_err)?;
        io::copy(&mut entry, &mut out).map_err(write_err)?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkspaceConfig;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    fn workspace(temp_dir: &TempDir) -> Workspace {
        Workspace::initialize(temp_dir.path().join("temp"), &WorkspaceConfig::default()).unwrap()
    }

    #[test]
    fn test_archive_kind_from_path() {
        assert_eq!(ArchiveKind::from_path(Path::new("game.zip")), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::from_path(Path::new("game.apk")), Some(ArchiveKind::Apk));
        assert_eq!(ArchiveKind::from_path(Path::new("game.xapk")), Some(ArchiveKind::Xapk));
        assert_eq!(ArchiveKind::from_path(Path::new("game.ZIP")), None);
        assert_eq!(ArchiveKind::from_path(Path::new("game")), None);
        assert!(!ArchiveKind::Xapk.is_auto_extracted());
    }

    #[test]
    fn test_stage_zip_and_plain_file() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = workspace(&temp_dir);

        let archive = temp_dir.path().join("game.zip");
        write_zip(&archive, &[("Assets/Data/a.bin", &[0u8, 1, 2, 255])]);
        let readme = temp_dir.path().join("README.txt");
        fs::write(&readme, "hello").unwrap();

        let staged = stage(&workspace, &[&archive, &readme]).unwrap();

        assert_eq!(staged.len(), 2);
        assert_eq!(staged[0].parent(), Some(workspace.root()));
        assert_eq!(staged[1], readme);
        assert_eq!(fs::read(staged[0].join("Assets/Data/a.bin")).unwrap(), vec![0u8, 1, 2, 255]);
    }

    #[test]
    fn test_stage_missing_input_passes_through() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = workspace(&temp_dir);

        let missing = temp_dir.path().join("missing.zip");
        let staged = stage(&workspace, &[&missing]).unwrap();
        assert_eq!(staged, vec![missing]);
    }

    #[test]
    fn test_stage_xapk_passes_through() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = workspace(&temp_dir);

        let bundle = temp_dir.path().join("game.xapk");
        write_zip(&bundle, &[("base.apk", b"apk")]);

        let staged = stage(&workspace, &[&bundle]).unwrap();
        assert_eq!(staged, vec![bundle]);
        assert_eq!(fs::read_dir(workspace.root()).unwrap().count(), 0);
    }

    #[test]
    fn test_each_archive_gets_own_folder() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = workspace(&temp_dir);

        let first = temp_dir.path().join("first.zip");
        let second = temp_dir.path().join("second.apk");
        write_zip(&first, &[("data.bin", b"one")]);
        write_zip(&second, &[("data.bin", b"two"), ("lib/", b"")]);

        let staged = stage(&workspace, &[&first, &second]).unwrap();

        assert_ne!(staged[0], staged[1]);
        assert_eq!(fs::read(staged[0].join("data.bin")).unwrap(), b"one");
        assert_eq!(fs::read(staged[1].join("data.bin")).unwrap(), b"two");
        assert!(staged[1].join("lib").is_dir());
    }

    #[test]
    fn test_entry_escaping_destination_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = workspace(&temp_dir);

        let archive = temp_dir.path().join("evil.zip");
        write_zip(&archive, &[("ok.txt", b"ok"), ("../evil.txt", b"pwned")]);

        let err = stage(&workspace, &[&archive]).unwrap_err();

        assert!(matches!(
            err,
            StageError::UnsafeEntry { archive: ref failed, ref entry } if *failed == archive && entry == "../evil.txt"
        ));
        assert!(!workspace.root().join("evil.txt").exists());
        assert!(!temp_dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_corrupt_archive_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = workspace(&temp_dir);

        let good = temp_dir.path().join("good.zip");
        write_zip(&good, &[("a.txt", b"a")]);
        let bad = temp_dir.path().join("bad.zip");
        fs::write(&bad, b"definitely not a zip").unwrap();

        let err = stage(&workspace, &[&good, &bad]).unwrap_err();
        assert!(matches!(err, StageError::Corrupt { ref archive, .. } if *archive == bad));
    }
}
