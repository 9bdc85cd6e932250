//! Pipeline configuration, resolved once from the environment.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

use super::error::{BuildError, Result};

pub const DEFAULT_REPO: &str = "https://github.com/lammps/lammps.git";
pub const DEFAULT_TAG: &str = "patch_10Sep2025";
pub const DEFAULT_PACKAGES: &str = "yes-molecule";
pub const DEFAULT_JOBS: usize = 8;

/// Local sources overlaid onto the LAMMPS tree.
pub const CUSTOM_BASENAMES: &[&str] = &["lammpsweb"];

/// Units that cannot build for the WebAssembly target (sockets, embedded Python).
pub const EXTENDED_DENY_LIST: &[&str] = &[
    "fix_imd",
    "fix_ipi",
    "fix_python_invoke",
    "fix_python_move",
    "pair_python",
    "python_impl",
];

/// How the workspace root is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootStrategy {
    /// An explicit base directory.
    Fixed(PathBuf),
    /// The process working directory at startup.
    CurrentDir,
}

/// Which stale units are purged from the external tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PurgeProfile {
    /// Only the always-removed broken feature.
    #[default]
    Minimal,
    /// The full deny-list.
    Extended,
}

impl PurgeProfile {
    pub fn basenames(self) -> &'static [&'static str] {
        match self {
            Self::Minimal => &[],
            Self::Extended => EXTENDED_DENY_LIST,
        }
    }
}

/// Read-only settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    pub repo_url: String,
    pub tag: String,
    /// Package targets in command-line order.
    pub packages: Vec<String>,
    pub custom_basenames: Vec<String>,
    pub stale_basenames: Vec<String>,
    pub single_file: bool,
    /// Pre-existing `EMCC_CFLAGS`, kept ahead of any flags we add.
    pub extra_cflags: String,
    /// `EM_CACHE` override.
    pub cache_dir: Option<PathBuf>,
    pub jobs: usize,
}

impl PipelineConfig {
    pub fn from_env(profile: PurgeProfile) -> Result<Self> {
        Self::from_lookup(profile, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(profile: PurgeProfile, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let packages = split_words(&lookup("PACKAGES").unwrap_or_else(|| DEFAULT_PACKAGES.into()));

        let mut stale_basenames = split_words(&profile.basenames().join(" "));
        for extra in split_words(&lookup("PURGE").unwrap_or_default()) {
            if !is_basename(&extra) {
                return Err(BuildError::Config(format!(
                    "PURGE entries must be bare unit names, got {extra:?}"
                )));
            }
            if !stale_basenames.contains(&extra) {
                stale_basenames.push(extra);
            }
        }

        let jobs = match non_empty("MAKE_JOBS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(BuildError::Config(format!(
                        "MAKE_JOBS must be a positive integer, got {raw:?}"
                    )))
                }
            },
            None => DEFAULT_JOBS,
        };

        Ok(Self {
            repo_url: non_empty("LAMMPS_REPO").unwrap_or_else(|| DEFAULT_REPO.into()),
            tag: non_empty("LAMMPS_TAG").unwrap_or_else(|| DEFAULT_TAG.into()),
            packages,
            custom_basenames: CUSTOM_BASENAMES.iter().map(ToString::to_string).collect(),
            stale_basenames,
            single_file: lookup("SINGLE_FILE").as_deref() == Some("1"),
            extra_cflags: lookup("EMCC_CFLAGS").unwrap_or_default(),
            cache_dir: non_empty("EM_CACHE").map(PathBuf::from),
            jobs,
        })
    }
}

fn split_words(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(ToString::to_string).collect()
}

/// A unit name inside `lammps/src`: no separators, no `.`/`..`.
fn is_basename(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}
