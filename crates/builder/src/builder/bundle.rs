//! Final link of `lammps.js` through the top-level Makefile.

use std::path::PathBuf;

use super::command::{run_checked, CommandRunner, Invocation};
use super::config::PipelineConfig;
use super::error::{BuildError, Result};
use super::workspace::Workspace;

pub const EMCC: &str = "emcc";
pub const CACHE_VAR: &str = "EM_CACHE";
pub const LINK_TARGET: &str = "wasm";

/// How to put `emcc` on `PATH`.
pub const EMSDK_HINT: &str = "Activate emsdk (source emsdk_env.sh) before building.";

/// Written once when the shim is missing; never overwritten.
pub const LOADER_SHIM_TEMPLATE: &str = r#"if (typeof Module === "undefined") {
  Module = {};
}
if (!Module.locateFile) {
  Module.locateFile = function locateFile(path) {
    return path;
  };
}
"#;

/// Fail unless the emscripten compiler is on `PATH`.
pub fn require_toolchain(runner: &dyn CommandRunner) -> Result<PathBuf> {
    runner
        .find_program(EMCC)
        .ok_or_else(|| BuildError::ToolchainMissing {
            program: format!("Emscripten compiler '{EMCC}'"),
            hint: EMSDK_HINT.to_string(),
        })
}

/// Create the loader shim from the template if absent. Returns whether it was created.
pub fn ensure_loader_shim(ws: &Workspace) -> Result<bool> {
    let shim = ws.loader_shim();
    if shim.exists() {
        return Ok(false);
    }
    std::fs::write(&shim, LOADER_SHIM_TEMPLATE).map_err(|e| BuildError::io(&shim, e))?;
    tracing::info!("created: {}", ws.display_path(&shim));
    Ok(true)
}

/// The configured cache directory, or the workspace default. Created if needed.
pub fn ensure_cache_dir(ws: &Workspace, config: &PipelineConfig) -> Result<PathBuf> {
    let dir = ws.cache_dir(config.cache_dir.as_deref());
    std::fs::create_dir_all(&dir).map_err(|e| BuildError::io(&dir, e))?;
    Ok(dir)
}

/// Check preconditions, link, then verify the artifact exists.
pub fn bundle(
    runner: &dyn CommandRunner,
    ws: &Workspace,
    config: &PipelineConfig,
) -> Result<PathBuf> {
    let emcc = require_toolchain(runner)?;
    tracing::debug!("using {}", emcc.display());
    ensure_loader_shim(ws)?;
    let cache = ensure_cache_dir(ws, config)?;

    tracing::info!("Linking lammps.js via top-level Makefile ...");
    let link = Invocation::new("make", ws.root())
        .arg(LINK_TARGET)
        .env(CACHE_VAR, cache.display().to_string());
    run_checked(runner, &link)?;

    let artifact = ws.artifact();
    if !artifact.is_file() {
        return Err(BuildError::PostconditionViolated {
            step: "Emscripten link step".to_string(),
            path: artifact,
        });
    }
    tracing::info!("Built: {}", ws.display_path(&artifact));
    Ok(artifact)
}
