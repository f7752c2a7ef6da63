//! Archive staging benchmarks

use crate::{measure, BenchmarkResult, Workload};
use assetstage_core::{stage, Workspace, WorkspaceConfig};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const ITERATIONS: u32 = 20;

pub fn run_all() -> Vec<BenchmarkResult> {
    vec![
        bench_extract(200, 1024, "zip"),
        bench_extract(8, 1024 * 1024, "apk"),
        bench_extract_many_archives(),
        bench_pass_through(),
    ]
}

/// Archive with `files` entries of `size` bytes spread over a few folders
fn write_archive(path: &Path, files: usize, size: usize) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    let payload: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    for i in 0..files {
        writer
            .start_file(format!("assets/bin/Data/{}/entry_{}.bin", i % 16, i), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(&payload).unwrap();
    }
    writer.finish().unwrap();
}

fn bench_extract(files: usize, size: usize, extension: &str) -> BenchmarkResult {
    let temp_dir = TempDir::new().unwrap();
    let workspace = Workspace::initialize(temp_dir.path().join("temp"), &WorkspaceConfig::default()).unwrap();
    let archive = temp_dir.path().join(format!("game.{}", extension));
    write_archive(&archive, files, size);

    let name = format!("Extract .{} ({} x {} KB)", extension, files, size / 1024);
    measure(&name, ITERATIONS, || {
        std::hint::black_box(stage(&workspace, &[&archive]).unwrap());
        Workload::Staging {
            archives: 1,
            entries: files,
            bytes: (files * size) as u64,
        }
    })
}

fn bench_extract_many_archives() -> BenchmarkResult {
    let temp_dir = TempDir::new().unwrap();
    let workspace = Workspace::initialize(temp_dir.path().join("temp"), &WorkspaceConfig::default()).unwrap();
    let archives: Vec<PathBuf> = (0..10)
        .map(|i| {
            let path = temp_dir.path().join(format!("split{}.zip", i));
            write_archive(&path, 20, 4096);
            path
        })
        .collect();

    measure("Extract 10 archives (20 x 4 KB)", ITERATIONS, || {
        let staged = stage(&workspace, &archives).unwrap();
        Workload::Staging {
            archives: staged.len(),
            entries: staged.len() * 20,
            bytes: (staged.len() * 20 * 4096) as u64,
        }
    })
}

fn bench_pass_through() -> BenchmarkResult {
    let temp_dir = TempDir::new().unwrap();
    let workspace = Workspace::initialize(temp_dir.path().join("temp"), &WorkspaceConfig::default()).unwrap();
    let inputs: Vec<_> = (0..1000).map(|i| temp_dir.path().join(format!("level{}", i))).collect();

    measure("Pass through 1000 plain paths", ITERATIONS, || {
        std::hint::black_box(stage(&workspace, &inputs).unwrap());
        Workload::Staging {
            archives: 0,
            entries: 0,
            bytes: 0,
        }
    })
}
