//! # lammpsweb-build
//!
//! Build LAMMPS as a WebAssembly/JavaScript bundle.
//!
//! ## Usage
//!
//! ```bash
//! lammpsweb-build                 # Full pipeline (same as `all`)
//! lammpsweb-build fetch           # Clone LAMMPS at $LAMMPS_TAG
//! lammpsweb-build bundle          # Link lammps.js only
//! lammpsweb-build status --json   # Workspace state
//! PACKAGES="yes-molecule yes-kspace" SINGLE_FILE=1 lammpsweb-build
//! ```
//!
//! Activate emsdk first; `emcc` must be on PATH.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use lammpsweb_builder::builder::{doctor, status, vendor, BuildCommands};
use lammpsweb_builder::{
    Pipeline, PipelineConfig, PurgeProfile, RootStrategy, Stage, SystemRunner, Workspace,
};

#[derive(Parser)]
#[command(name = "lammpsweb-build", about = "Build LAMMPS for the web")]
struct Cli {
    #[command(subcommand)]
    command: Option<BuildCommands>,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Which unbuildable units to delete from the LAMMPS tree
    #[arg(long, value_enum, default_value_t = PurgeProfile::Minimal, global = true)]
    purge: PurgeProfile,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let strategy = cli.root.map_or(RootStrategy::CurrentDir, RootStrategy::Fixed);
    let ws = Workspace::resolve(&strategy)?;
    let config = PipelineConfig::from_env(cli.purge).context("Failed to read configuration")?;
    let runner = SystemRunner;
    let pipeline = Pipeline::new(&runner, &ws, &config);

    match cli.command.unwrap_or(BuildCommands::All) {
        BuildCommands::All => {
            let artifact = pipeline.run()?;
            println!("\nDone.\nBundle: {}", artifact.display());
            println!("Intermediate artifacts are left in: {}", ws.source_dir().display());
        }
        BuildCommands::Fetch => pipeline.run_stage(Stage::Provision)?,
        BuildCommands::Customize => pipeline.run_stage(Stage::Customize)?,
        BuildCommands::Packages => pipeline.run_stage(Stage::SelectPackages)?,
        BuildCommands::Native => pipeline.run_stage(Stage::NativePrebuild)?,
        BuildCommands::Wasm => pipeline.run_stage(Stage::CrossCompile)?,
        BuildCommands::Bundle => pipeline.run_stage(Stage::Bundle)?,
        BuildCommands::Status { json } => {
            let report = status::collect(&ws, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
        }
        BuildCommands::Clean { all } => vendor::clean(&ws, &config, all)?,
        BuildCommands::Doctor => doctor::run(&runner)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var("LAMMPSWEB_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
