//! Emscripten cross-compilation of the LAMMPS sources.

use super::command::{jobs_flag, run_checked, CommandRunner, Invocation};
use super::config::PipelineConfig;
use super::error::Result;
use super::vendor;
use super::workspace::Workspace;

/// Environment variable emcc reads extra compiler flags from.
pub const CFLAGS_VAR: &str = "EMCC_CFLAGS";

/// Embed the wasm in the JS glue and emit it as an ES6 module factory.
pub const SINGLE_FILE_FLAGS: &[&str] = &[
    "-s",
    "SINGLE_FILE=1",
    "-s",
    "MODULARIZE=1",
    "-s",
    "EXPORT_ES6=1",
];

/// `EMCC_CFLAGS` for a single-file build: existing flags first, ours after.
pub fn single_file_cflags(existing: &str) -> String {
    existing
        .split_whitespace()
        .chain(SINGLE_FILE_FLAGS.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the default make target with the emscripten toolchain.
pub fn cross_compile(
    runner: &dyn CommandRunner,
    ws: &Workspace,
    config: &PipelineConfig,
) -> Result<()> {
    let src_dir = vendor::require(ws)?;
    let mut make = Invocation::new("make", &src_dir).arg(jobs_flag(config.jobs));
    if config.single_file {
        make = make.env(CFLAGS_VAR, single_file_cflags(&config.extra_cflags));
        tracing::info!("SINGLE_FILE=1 enabled for emscripten build");
    }

    tracing::info!("Building wasm/JS ...");
    run_checked(runner, &make)
}
