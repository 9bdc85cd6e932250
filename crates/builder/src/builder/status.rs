//! Workspace status report.

#![allow(clippy::cast_precision_loss)] // Artifact sizes are only displayed

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::config::PipelineConfig;
use super::customize::EXTENSIONS;
use super::error::{BuildError, Result};
use super::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayState {
    InSync,
    Stale,
    NotInstalled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayStatus {
    pub file: String,
    pub state: OverlayState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactStatus {
    pub path: PathBuf,
    pub bytes: u64,
    pub modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub root: PathBuf,
    pub tag: String,
    pub tree_present: bool,
    pub overlays: Vec<OverlayStatus>,
    pub loader_shim: bool,
    pub artifact: Option<ArtifactStatus>,
}

pub fn collect(ws: &Workspace, config: &PipelineConfig) -> Result<StatusReport> {
    let mut overlays = Vec::new();
    for base in &config.custom_basenames {
        for ext in EXTENSIONS {
            let file = format!("{base}.{ext}");
            let local = ws.custom_dir().join(&file);
            if !local.is_file() {
                continue;
            }
            let installed = ws.source_dir().join(&file);
            let state = if !installed.is_file() {
                OverlayState::NotInstalled
            } else if read(&local)? == read(&installed)? {
                OverlayState::InSync
            } else {
                OverlayState::Stale
            };
            overlays.push(OverlayStatus { file, state });
        }
    }

    let artifact_path = ws.artifact();
    let artifact = match std::fs::metadata(&artifact_path) {
        Ok(meta) if meta.is_file() => Some(ArtifactStatus {
            bytes: meta.len(),
            modified: meta
                .modified()
                .ok()
                .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string()),
            path: artifact_path,
        }),
        _ => None,
    };

    Ok(StatusReport {
        root: ws.root().to_path_buf(),
        tag: config.tag.clone(),
        tree_present: ws.external_root().is_dir(),
        overlays,
        loader_shim: ws.loader_shim().is_file(),
        artifact,
    })
}

fn read(path: &std::path::Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| BuildError::io(path, e))
}

impl StatusReport {
    pub fn print(&self) {
        println!("Workspace: {}\n", self.root.display());

        if self.tree_present {
            println!("  {:16} [cached]", "lammps");
        } else {
            println!("  {:16} [missing] @ {}", "lammps", self.tag);
        }

        for overlay in &self.overlays {
            let state = match overlay.state {
                OverlayState::InSync => "in sync",
                OverlayState::Stale => "stale",
                OverlayState::NotInstalled => "not installed",
            };
            println!("  {:16} [{state}]", overlay.file);
        }

        let shim = if self.loader_shim { "present" } else { "missing" };
        println!("  {:16} [{shim}]", super::workspace::LOADER_SHIM);

        match &self.artifact {
            Some(artifact) => println!(
                "  {:16} [built] {:.1} MB{}",
                super::workspace::ARTIFACT,
                artifact.bytes as f64 / 1_000_000.0,
                artifact
                    .modified
                    .as_deref()
                    .map(|m| format!(", {m}"))
                    .unwrap_or_default()
            ),
            None => println!("  {:16} [missing]", super::workspace::ARTIFACT),
        }
    }
}
