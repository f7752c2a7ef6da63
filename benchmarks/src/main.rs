//! AssetStage Benchmark Runner
//!
//! Times staging and script export over generated fixtures and reports what
//! each run produced next to the timing: entries and bytes extracted per
//! archive, stubs written versus scripts already present, and `.asmdef`
//! files emitted.

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod benchmarks;

/// Wall-clock statistics over the measured iterations
#[derive(Debug, Clone, Serialize)]
pub struct Timing {
    pub iterations: u32,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl Timing {
    fn from_samples(samples: &[Duration]) -> Self {
        let ms: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        Self {
            iterations: ms.len() as u32,
            mean_ms: ms.iter().sum::<f64>() / ms.len().max(1) as f64,
            min_ms: ms.iter().cloned().fold(f64::INFINITY, f64::min),
            max_ms: ms.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// What one iteration of a benchmark did
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Workload {
    Staging {
        archives: usize,
        entries: usize,
        bytes: u64,
    },
    Scripts {
        scripts: usize,
        stubs_written: usize,
        existing: usize,
        assembly_definitions: usize,
    },
    Parsing {
        items: usize,
    },
}

impl Workload {
    fn label(&self) -> &'static str {
        match self {
            Workload::Staging { .. } => "Staging",
            Workload::Scripts { .. } => "Scripts",
            Workload::Parsing { .. } => "Parsing",
        }
    }

    /// Rate per second based on the mean iteration time
    fn rate(&self, mean_ms: f64) -> String {
        let per_sec = 1000.0 / mean_ms;
        match self {
            Workload::Staging { bytes, .. } => {
                format!("{:.2} MB/s", *bytes as f64 * per_sec / (1024.0 * 1024.0))
            }
            Workload::Scripts { scripts, .. } => format!("{:.0} scripts/s", *scripts as f64 * per_sec),
            Workload::Parsing { items } => format!("{:.0} items/s", *items as f64 * per_sec),
        }
    }

    fn details(&self) -> String {
        match self {
            Workload::Staging { archives, entries, bytes } => {
                format!("{} archive(s), {} entries, {} KB", archives, entries, bytes / 1024)
            }
            Workload::Scripts {
                scripts,
                stubs_written,
                existing,
                assembly_definitions,
            } => format!(
                "{} scripts: {} stubs, {} existing, {} asmdef",
                scripts, stubs_written, existing, assembly_definitions
            ),
            Workload::Parsing { items } => format!("{} items", items),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub timing: Timing,
    pub workload: Workload,
}

/// Run `f` once to warm up, then `iterations` times under the clock
///
/// `f` returns the workload of the iteration; the last one is reported.
pub fn measure<F>(name: &str, iterations: u32, mut f: F) -> BenchmarkResult
where
    F: FnMut() -> Workload,
{
    let mut workload = f();
    let mut samples = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        let start = Instant::now();
        workload = f();
        samples.push(start.elapsed());
    }

    BenchmarkResult {
        name: name.to_string(),
        timing: Timing::from_samples(&samples),
        workload,
    }
}

/// Totals across every benchmark's reported workload
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadTotals {
    pub entries_extracted: usize,
    pub bytes_extracted: u64,
    pub stubs_written: usize,
    pub scripts_existing: usize,
    pub assembly_definitions: usize,
}

impl WorkloadTotals {
    fn add(&mut self, workload: &Workload) {
        match workload {
            Workload::Staging { entries, bytes, .. } => {
                self.entries_extracted += entries;
                self.bytes_extracted += bytes;
            }
            Workload::Scripts {
                stubs_written,
                existing,
                assembly_definitions,
                ..
            } => {
                self.stubs_written += stubs_written;
                self.scripts_existing += existing;
                self.assembly_definitions += assembly_definitions;
            }
            Workload::Parsing { .. } => {}
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub timestamp: String,
    pub version: String,
    pub platform: String,
    pub results: Vec<BenchmarkResult>,
    pub totals: WorkloadTotals,
}

fn print_report(report: &BenchmarkReport) {
    println!("\nAssetStage {} benchmarks ({})", report.version, report.platform);

    let mut section = "";
    for r in &report.results {
        if r.workload.label() != section {
            section = r.workload.label();
            println!("\n[{}]", section);
        }
        println!(
            "  {:<36} {:>9.3}ms  {:>16}  {}",
            r.name,
            r.timing.mean_ms,
            r.workload.rate(r.timing.mean_ms),
            r.workload.details()
        );
    }

    let t = &report.totals;
    println!(
        "\nPer-iteration totals: {} entries ({} KB) extracted, {} stubs, {} existing scripts, {} asmdefs",
        t.entries_extracted,
        t.bytes_extracted / 1024,
        t.stubs_written,
        t.scripts_existing,
        t.assembly_definitions
    );
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let json_only = args.iter().any(|a| a == "--json-only");
    let results_dir = args
        .iter()
        .position(|a| a == "--out")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("benchmarks/results"));

    let mut results = Vec::new();
    results.extend(benchmarks::staging::run_all());
    results.extend(benchmarks::scripts::run_all());
    results.extend(benchmarks::config::run_all());

    let mut totals = WorkloadTotals::default();
    for r in &results {
        totals.add(&r.workload);
    }

    let now = chrono::Utc::now();
    let report = BenchmarkReport {
        timestamp: now.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
        results,
        totals,
    };

    let json = serde_json::to_string_pretty(&report)?;
    if json_only {
        println!("{}", json);
        return Ok(());
    }

    print_report(&report);
    fs::create_dir_all(&results_dir)?;
    let path = results_dir.join(format!("assetstage-{}.json", now.format("%Y%m%d_%H%M%S")));
    fs::write(&path, json)?;
    println!("Saved {}", path.display());
    Ok(())
}
