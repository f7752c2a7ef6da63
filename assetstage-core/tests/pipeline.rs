//! End-to-end tests: stage an archive, export scripts from it, re-run.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use assetstage_core::{
    pathbuf_with_suffix, stage, AsmdefWriter, Asset, DecompileSettings, Decompiler, LanguageVersion,
    ManagedAssembly, MetaWriter, ScriptAsset, ScriptContentLevel, ScriptExporter, UnityVersion, Workspace,
    WorkspaceConfig, META_SUFFIX,
};
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

/// Copies the assembly bytes into a single source file
struct CopyDecompiler;

impl Decompiler for CopyDecompiler {
    fn decompile_project(&mut self, assembly: &ManagedAssembly, output_dir: &Path, _: &DecompileSettings) -> Result<()> {
        let source = fs::read_to_string(&assembly.path)?;
        fs::write(output_dir.join("Decompiled.cs"), source)?;
        Ok(())
    }
}

#[derive(Default)]
struct CountingMetaWriter {
    calls: usize,
}

impl MetaWriter for CountingMetaWriter {
    fn write_meta(&mut self, script: &ScriptAsset, file_path: &Path) -> Result<()> {
        fs::write(
            pathbuf_with_suffix(file_path, META_SUFFIX),
            format!("fileFormatVersion: 2\n# {}\n", script.full_name()),
        )?;
        self.calls += 1;
        Ok(())
    }
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, data) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

/// Relative path -> file contents for every file under `root`
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect()
}

fn settings() -> DecompileSettings {
    DecompileSettings {
        language_version: LanguageVersion::CSharp9,
        content_level: ScriptContentLevel::Level2,
    }
}

#[test]
fn test_stage_preserves_order_and_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = Workspace::initialize(temp_dir.path().join("temp"), &WorkspaceConfig::default()).unwrap();

    let game = temp_dir.path().join("game.zip");
    let entries: &[(&str, &[u8])] = &[
        ("Assets/Data/a.bin", &[1, 2, 3]),
        ("Managed/Game.Runtime.dll", b"namespace Game { class Real {} }"),
        ("top.txt", b"top"),
    ];
    write_zip(&game, entries);

    let inputs = vec![
        game.clone(),
        PathBuf::from("README.txt"),
        temp_dir.path().join("does-not-exist.apk"),
    ];
    let staged = stage(&workspace, &inputs).unwrap();

    assert_eq!(staged.len(), inputs.len());
    assert!(staged[0].starts_with(workspace.root()));
    assert_eq!(staged[1], inputs[1]);
    assert_eq!(staged[2], inputs[2]);
    for (name, data) in entries {
        assert_eq!(fs::read(staged[0].join(name)).unwrap(), *data);
    }

    workspace.dispose().unwrap();
}

#[test]
fn test_export_from_staged_archive_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = Workspace::initialize(temp_dir.path().join("temp"), &WorkspaceConfig::default()).unwrap();

    let game = temp_dir.path().join("game.apk");
    write_zip(
        &game,
        &[
            ("Managed/Game.Runtime.dll", b"// decompiled runtime"),
            ("Managed/UnityEngine.dll", b"// engine"),
        ],
    );
    let staged = stage(&workspace, &[&game]).unwrap();
    let managed = staged[0].join("Managed");

    let assemblies = vec![
        ManagedAssembly::from_path(managed.join("Game.Runtime.dll")),
        ManagedAssembly::from_path(managed.join("UnityEngine.dll")),
    ];
    let assets: Vec<Asset> = vec![
        ScriptAsset::new("Game.Runtime.dll", "Game.Combat", "Weapon").into(),
        ScriptAsset::new("Assembly-CSharp-firstpass.dll", "Foo.Bar", "Baz").into(),
        ScriptAsset::new("UnityEngine.UI.dll", "UnityEngine.UI", "Image").into(),
    ];
    let version: UnityVersion = "2020.3.1f1".parse().unwrap();
    let assets_dir = temp_dir.path().join("Assets");

    let mut exporter = ScriptExporter::new(CopyDecompiler, assemblies, settings());
    let mut meta = CountingMetaWriter::default();
    let first = exporter
        .export_all(&assets, &assets_dir, &version, Some(&mut meta), &mut AsmdefWriter::new())
        .unwrap();

    assert_eq!(first.decompiled, 1);
    assert_eq!(meta.calls, 2);
    assert_eq!(first.scripts.skipped_engine, 1);
    assert_eq!(first.assembly_definitions, 1);
    assert_eq!(
        fs::read_to_string(assets_dir.join("Scripts/Game.Runtime/Decompiled.cs")).unwrap(),
        "// decompiled runtime"
    );
    assert!(assets_dir.join("Scripts/Game.Runtime/Game.Runtime.asmdef").exists());
    assert!(assets_dir.join("Plugins/Assembly-CSharp-firstpass/Foo/Bar/Baz.cs").exists());
    assert!(!assets_dir.join("Scripts/UnityEngine").exists());

    let after_first = snapshot(&assets_dir);

    let mut second_meta = CountingMetaWriter::default();
    let second = exporter
        .export_all(&assets, &assets_dir, &version, Some(&mut second_meta), &mut AsmdefWriter::new())
        .unwrap();

    assert_eq!(second_meta.calls, 0);
    assert!(second.scripts.stubs_written.is_empty());
    assert_eq!(second.scripts.conflicts.len(), 2);
    assert_eq!(snapshot(&assets_dir), after_first);

    workspace.dispose().unwrap();
}

#[test]
fn test_old_export_version_writes_no_asmdefs() {
    let temp_dir = TempDir::new().unwrap();
    let assets_dir = temp_dir.path().join("Assets");
    let assets: Vec<Asset> = vec![
        ScriptAsset::new("Game.Runtime", "Game", "A").into(),
        ScriptAsset::new("Game.Tools", "Game", "B").into(),
        ScriptAsset::new("Game.Net", "", "C").into(),
    ];
    let version: UnityVersion = "2017.2.0f3".parse().unwrap();

    let mut exporter = ScriptExporter::new(CopyDecompiler, Vec::new(), settings());
    let mut writer = AsmdefWriter::new();
    let summary = exporter
        .export_all(&assets, &assets_dir, &version, None, &mut writer)
        .unwrap();

    assert_eq!(summary.descriptors, 3);
    assert_eq!(summary.assembly_definitions, 0);
    assert!(writer.written().is_empty());
    assert!(snapshot(&assets_dir)
        .keys()
        .all(|p| p.extension().and_then(|e| e.to_str()) == Some("cs")));
}
