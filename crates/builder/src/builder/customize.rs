//! Source customization of the LAMMPS tree.
//!
//! - overlay: install local `lammpsweb/<name>.{cpp,h}` over `lammps/src`
//! - purge: delete units that do not build for the WebAssembly target

use std::path::Path;

use super::config::PipelineConfig;
use super::error::{BuildError, Result};
use super::install::{install, InstallOutcome};
use super::vendor;
use super::workspace::Workspace;

/// Source/header pair every basename expands to.
pub const EXTENSIONS: [&str; 2] = ["cpp", "h"];

/// Needs sockets; removed on every run whatever the deny-list says.
pub const BROKEN_FEATURE: &str = "fix_imd";

/// Overlay then purge.
pub fn customize(ws: &Workspace, config: &PipelineConfig) -> Result<()> {
    let src_dir = vendor::require(ws)?;
    let updated = overlay(ws, &config.custom_basenames)?;
    let purged = purge(&src_dir, &config.stale_basenames)?;
    tracing::info!(
        "{} overlay file(s) updated, {} unit(s) purged",
        updated,
        purged.len()
    );
    Ok(())
}

/// Install each local override that exists. Returns how many files changed.
pub fn overlay(ws: &Workspace, basenames: &[String]) -> Result<usize> {
    let mut updated = 0;
    for base in basenames {
        for ext in EXTENSIONS {
            let file = format!("{base}.{ext}");
            let src = ws.custom_dir().join(&file);
            if !src.exists() {
                continue;
            }
            if install(&src, &ws.source_dir().join(&file))? == InstallOutcome::Updated {
                updated += 1;
            }
        }
    }
    Ok(updated)
}

/// Remove the configured stale units plus [`BROKEN_FEATURE`].
///
/// Returns the basenames whose source file was removed.
pub fn purge(src_dir: &Path, stale: &[String]) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for base in stale
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(BROKEN_FEATURE))
    {
        if remove_unit(src_dir, base)? {
            removed.push(base.to_string());
        }
    }
    Ok(removed)
}

/// The header goes only if the source did.
fn remove_unit(src_dir: &Path, base: &str) -> Result<bool> {
    let source = src_dir.join(format!("{base}.cpp"));
    if !source.is_file() {
        return Ok(false);
    }
    std::fs::remove_file(&source).map_err(|e| BuildError::io(&source, e))?;

    let header = src_dir.join(format!("{base}.h"));
    if header.is_file() {
        std::fs::remove_file(&header).map_err(|e| BuildError::io(&header, e))?;
    }
    tracing::info!("removed: {base}.*");
    Ok(true)
}
