//! AssetStage CLI
//!
//! Command-line interface for staging game packages and exporting their
//! scripts as a Unity project source tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assetstage_core::{
    path_to_string, stage, AsmdefWriter, CommandDecompiler, ExportConfig, MetaWriter, ScriptExporter,
    Workspace, CONFIG_FILE_NAME,
};
use clap::{Parser, Subcommand};

mod manifest;
mod meta;

use manifest::ExportManifest;
use meta::GuidMetaWriter;

#[derive(Parser)]
#[command(name = "assetstage")]
#[command(about = "Stage game packages and export their scripts as a Unity project")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: ./assetstage.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workspace directory for extracted archives (default: next to the executable)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default assetstage.json
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Extract archives into the workspace and print the staged paths
    Stage {
        /// Game files or archives
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Stage the manifest inputs and export scripts into an assets directory
    Export {
        /// Export manifest (JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Assets directory of the exported project
        #[arg(short, long)]
        output: PathBuf,

        /// Don't write .meta files
        #[arg(long)]
        no_meta: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "assetstage=debug" } else { "assetstage=info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    let config_path = cli.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    match cli.command {
        Commands::Init { path } => cmd_init(path),
        Commands::Stage { inputs } => {
            let config = ExportConfig::load(&config_path)?;
            cmd_stage(&config, cli.workspace.as_deref(), &inputs)
        }
        Commands::Export {
            manifest,
            output,
            no_meta,
        } => {
            let config = ExportConfig::load(&config_path)?;
            cmd_export(&config, cli.workspace.as_deref(), &manifest, &output, no_meta)
        }
    }
}

fn open_workspace(config: &ExportConfig, dir: Option<&Path>) -> Result<Workspace> {
    let workspace = match dir {
        Some(dir) => Workspace::initialize(dir, &config.workspace)?,
        None => Workspace::in_executable_dir(&config.workspace)?,
    };
    Ok(workspace)
}

/// Write a default config file
fn cmd_init(path: Option<PathBuf>) -> Result<()> {
    let project_dir = match path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    std::fs::create_dir_all(&project_dir).context("Failed to create project directory")?;

    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    let config_json = serde_json::to_string_pretty(&ExportConfig::default())?;
    std::fs::write(&config_path, config_json).with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Wrote {}", config_path.display());
    Ok(())
}

/// Stage inputs and print one resolved path per line
///
/// The workspace is left in place so the printed paths stay valid; the next
/// run clears it.
fn cmd_stage(config: &ExportConfig, workspace_dir: Option<&Path>, inputs: &[PathBuf]) -> Result<()> {
    let workspace = open_workspace(config, workspace_dir)?;
    let staged = stage(&workspace, inputs)?;

    for path in &staged {
        println!("{}", path_to_string(path));
    }
    Ok(())
}

/// Full export: stage, decompile, write stubs and metadata, emit asmdefs
fn cmd_export(
    config: &ExportConfig,
    workspace_dir: Option<&Path>,
    manifest_path: &Path,
    output: &Path,
    no_meta: bool,
) -> Result<()> {
    let manifest = ExportManifest::load(manifest_path)?;
    let workspace = open_workspace(config, workspace_dir)?;

    let staged = stage(&workspace, &manifest.inputs)?;
    let assemblies = manifest.resolve_assemblies(&staged);
    tracing::info!("Staged {} inputs, {} assemblies", staged.len(), assemblies.len());

    let settings = config.decompile_settings();
    let mut exporter = ScriptExporter::new(
        CommandDecompiler::new(config.decompiler_command.clone()),
        assemblies,
        settings,
    );

    let mut meta_writer = GuidMetaWriter::default();
    let mut asmdef_writer = AsmdefWriter::new();
    let meta_target: Option<&mut dyn MetaWriter> = if no_meta { None } else { Some(&mut meta_writer) };
    let summary = exporter
        .export_all(
            &manifest.assets,
            output,
            &config.export_version,
            meta_target,
            &mut asmdef_writer,
        )
        .context("Script export failed")?;

    workspace.dispose().context("Failed to clean up workspace")?;

    println!("Exported scripts to {}", path_to_string(output));
    println!("  Assemblies decompiled:  {}", summary.decompiled);
    println!("  Stub scripts written:   {}", summary.scripts.stubs_written.len());
    println!("  Existing scripts kept:  {}", summary.scripts.existing.len());
    println!("  Meta files written:     {}", meta_writer.written);
    println!("  Meta conflicts:         {}", summary.scripts.conflicts.len());
    println!("  Assembly definitions:   {}", summary.assembly_definitions);

    Ok(())
}
