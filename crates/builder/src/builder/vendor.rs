//! LAMMPS source management (fetch, clean).
//!
//! The tree is cloned once at a pinned tag and never updated. An existing
//! checkout is trusted as-is, whatever revision it is at.

use std::path::PathBuf;

use super::command::{run_checked, CommandRunner, Invocation};
use super::config::PipelineConfig;
use super::error::{BuildError, Result};
use super::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadyPresent,
    Cloned,
}

/// Shallow clone of `config.tag` into the workspace, unless a tree is there.
pub fn ensure_provisioned(
    runner: &dyn CommandRunner,
    ws: &Workspace,
    config: &PipelineConfig,
) -> Result<ProvisionOutcome> {
    let dest = ws.external_root();
    if dest.is_dir() {
        tracing::info!("LAMMPS already cached at {}", dest.display());
        return Ok(ProvisionOutcome::AlreadyPresent);
    }

    std::fs::create_dir_all(ws.root()).map_err(|e| BuildError::io(ws.root(), e))?;

    tracing::info!("Cloning LAMMPS from {} @ {}...", config.repo_url, config.tag);
    let clone = Invocation::new("git", ws.root()).args([
        "clone".to_string(),
        "--depth".to_string(),
        "1".to_string(),
        "--branch".to_string(),
        config.tag.clone(),
        config.repo_url.clone(),
        dest.display().to_string(),
    ]);
    run_checked(runner, &clone)?;

    let src = ws.source_dir();
    if !src.is_dir() {
        return Err(BuildError::PostconditionViolated {
            step: format!("git clone of {}", config.tag),
            path: src,
        });
    }
    Ok(ProvisionOutcome::Cloned)
}

/// The LAMMPS source directory, or an error if it has not been fetched.
pub fn require(ws: &Workspace) -> Result<PathBuf> {
    let src = ws.source_dir();
    if !src.is_dir() {
        return Err(BuildError::NotProvisioned { path: src });
    }
    Ok(src)
}

/// Remove the external tree; with `all`, also the artifact and cache.
///
/// Local override sources and the loader shim are never touched.
pub fn clean(ws: &Workspace, config: &PipelineConfig, all: bool) -> Result<()> {
    remove_dir(&ws.external_root())?;
    if all {
        let cache = ws.cache_dir(config.cache_dir.as_deref());
        remove_dir(&cache)?;

        let artifact = ws.artifact();
        if artifact.is_file() {
            std::fs::remove_file(&artifact).map_err(|e| BuildError::io(&artifact, e))?;
            tracing::info!("Cleaned: {}", ws.display_path(&artifact));
        }
    }
    Ok(())
}

fn remove_dir(path: &std::path::Path) -> Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path).map_err(|e| BuildError::io(path, e))?;
        tracing::info!("Cleaned: {}", path.display());
    } else {
        tracing::info!("{} not present", path.display());
    }
    Ok(())
}
