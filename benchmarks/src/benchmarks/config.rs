//! Config and version parsing benchmarks

use crate::{measure, BenchmarkResult, Workload};
use assetstage_core::{resolve, ExportConfig, LanguageVersion, UnityVersion};

const ITERATIONS: u32 = 100;

pub fn run_all() -> Vec<BenchmarkResult> {
    vec![bench_parse_versions(), bench_parse_config(), bench_resolve_paths()]
}

fn version_strings() -> Vec<String> {
    (0..1000)
        .map(|i| format!("20{}.{}.{}{}{}", 17 + i % 7, i % 4, i % 30, ['a', 'b', 'f', 'p'][i % 4], i % 9))
        .collect()
}

fn bench_parse_versions() -> BenchmarkResult {
    let versions = version_strings();

    measure("Parse + resolve language version", ITERATIONS, || {
        for v in &versions {
            let version: UnityVersion = v.parse().unwrap();
            std::hint::black_box(LanguageVersion::Auto.resolve(&version));
        }
        Workload::Parsing { items: versions.len() }
    })
}

fn bench_parse_config() -> BenchmarkResult {
    let json = serde_json::to_string_pretty(&ExportConfig::default()).unwrap();

    measure("Parse assetstage.json", ITERATIONS, || {
        let config: ExportConfig = serde_json::from_str(&json).unwrap();
        std::hint::black_box(config.decompile_settings());
        Workload::Parsing { items: 1 }
    })
}

fn bench_resolve_paths() -> BenchmarkResult {
    let names: Vec<(String, String, String)> = (0..1000)
        .map(|i| {
            let assembly = if i % 2 == 0 { "Assembly-CSharp" } else { "Assembly-CSharp-firstpass" };
            (assembly.to_string(), format!("Vendor.Sdk{}", i), format!("Handler<T{}>", i))
        })
        .collect();

    measure("Resolve script paths", ITERATIONS, || {
        for (assembly, namespace, class) in &names {
            std::hint::black_box(resolve(assembly, namespace, class));
        }
        Workload::Parsing { items: names.len() }
    })
}
