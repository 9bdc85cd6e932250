//! Change-aware file installation.

use std::path::Path;

use super::error::{BuildError, Result};

/// What [`install`] did to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Updated,
    Unchanged,
}

/// Copy `src` over `dst` only when their bytes differ.
///
/// A missing destination reads as empty. A missing
/// source means there is nothing to install: the destination is left alone
/// and no error is raised.
pub fn install(src: &Path, dst: &Path) -> Result<InstallOutcome> {
    if !src.exists() {
        tracing::debug!("no source for {}, skipping", dst.display());
        return Ok(InstallOutcome::Unchanged);
    }
    let wanted = read_or_empty(src)?;
    let current = read_or_empty(dst)?;
    if wanted == current {
        return Ok(InstallOutcome::Unchanged);
    }

    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    std::fs::write(dst, &wanted).map_err(|e| BuildError::io(dst, e))?;
    tracing::info!("updated: {}", dst.display());
    Ok(InstallOutcome::Updated)
}

fn read_or_empty(path: &Path) -> Result<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(BuildError::io(path, e)),
    }
}
