//! Script export benchmarks

use crate::{measure, BenchmarkResult, Workload};
use anyhow::Result;
use assetstage_core::materialize::materialize;
use assetstage_core::{
    AsmdefWriter, Asset, DecompileSettings, Decompiler, DescriptorMap, LanguageVersion, ManagedAssembly,
    ScriptAsset, ScriptContentLevel, ScriptExporter, UnityVersion,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ITERATIONS: u32 = 30;
const SCRIPT_COUNT: usize = 500;

pub fn run_all() -> Vec<BenchmarkResult> {
    vec![
        bench_fresh_stubs(),
        bench_existing_scripts(),
        bench_full_export(),
    ]
}

/// One source file per assembly, standing in for a real decompiler
struct FixtureDecompiler;

impl Decompiler for FixtureDecompiler {
    fn decompile_project(&mut self, assembly: &ManagedAssembly, output_dir: &Path, _: &DecompileSettings) -> Result<()> {
        fs::write(output_dir.join(format!("{}.cs", assembly.name)), "// decompiled")?;
        Ok(())
    }
}

fn generate_scripts(count: usize) -> Vec<Asset> {
    (0..count)
        .map(|i| {
            ScriptAsset::new(
                format!("Game.Module{}.dll", i % 8),
                format!("Game.Feature{}.Systems", i % 32),
                format!("Behaviour{}", i),
            )
            .into()
        })
        .collect()
}

fn scripts_workload(scripts: usize, stubs_written: usize, existing: usize, assembly_definitions: usize) -> Workload {
    Workload::Scripts {
        scripts,
        stubs_written,
        existing,
        assembly_definitions,
    }
}

fn bench_fresh_stubs() -> BenchmarkResult {
    let temp_dir = TempDir::new().unwrap();
    let scripts = generate_scripts(SCRIPT_COUNT);
    let mut run = 0;

    measure("Materialize into empty tree", ITERATIONS, || {
        run += 1;
        let output = temp_dir.path().join(format!("run{}", run));
        let mut descriptors = DescriptorMap::new();
        let report = materialize(&scripts, &output, &mut descriptors, None).unwrap();
        scripts_workload(scripts.len(), report.stubs_written.len(), report.existing.len(), 0)
    })
}

fn bench_existing_scripts() -> BenchmarkResult {
    let temp_dir = TempDir::new().unwrap();
    let scripts = generate_scripts(SCRIPT_COUNT);
    let mut descriptors = DescriptorMap::new();
    materialize(&scripts, temp_dir.path(), &mut descriptors, None).unwrap();

    measure("Materialize over existing tree", ITERATIONS, || {
        let report = materialize(&scripts, temp_dir.path(), &mut descriptors, None).unwrap();
        scripts_workload(scripts.len(), report.stubs_written.len(), report.existing.len(), 0)
    })
}

fn bench_full_export() -> BenchmarkResult {
    let temp_dir = TempDir::new().unwrap();
    let scripts = generate_scripts(SCRIPT_COUNT);
    let assemblies = (0..8)
        .map(|i| ManagedAssembly::from_path(format!("Managed/Game.Module{}.dll", i)))
        .collect();
    let mut exporter = ScriptExporter::new(
        FixtureDecompiler,
        assemblies,
        DecompileSettings {
            language_version: LanguageVersion::Latest,
            content_level: ScriptContentLevel::Level2,
        },
    );
    let version: UnityVersion = "2021.3.0f1".parse().unwrap();
    let mut run = 0;

    measure("Export (decompile + stubs + asmdef)", ITERATIONS, || {
        run += 1;
        let assets_dir = temp_dir.path().join(format!("Assets{}", run));
        let summary = exporter
            .export_all(&scripts, &assets_dir, &version, None, &mut AsmdefWriter::new())
            .unwrap();
        scripts_workload(
            scripts.len(),
            summary.scripts.stubs_written.len(),
            summary.scripts.existing.len(),
            summary.assembly_definitions,
        )
    })
}
