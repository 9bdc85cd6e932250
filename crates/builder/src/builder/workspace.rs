//! Fixed on-disk layout of a build workspace.

use std::path::{Path, PathBuf};

use super::config::RootStrategy;
use super::error::{BuildError, Result};

/// Checked-out LAMMPS tree.
pub const EXTERNAL_DIR: &str = "lammps";
/// Locally maintained sources overlaid onto the external tree.
pub const CUSTOM_DIR: &str = "lammpsweb";
pub const LOADER_SHIM: &str = "locateFile.js";
pub const CACHE_DIR: &str = ".emscripten_cache";
pub const ARTIFACT: &str = "lammps.js";

/// Every path a stage touches, derived from one absolute root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the root once. Nothing downstream reads the current directory.
    pub fn resolve(strategy: &RootStrategy) -> Result<Self> {
        let cwd = || std::env::current_dir().map_err(|e| BuildError::io(".", e));
        let root = match strategy {
            RootStrategy::Fixed(path) if path.is_absolute() => path.clone(),
            RootStrategy::Fixed(path) => cwd()?.join(path),
            RootStrategy::CurrentDir => cwd()?,
        };
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn external_root(&self) -> PathBuf {
        self.root.join(EXTERNAL_DIR)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.external_root().join("src")
    }

    pub fn custom_dir(&self) -> PathBuf {
        self.root.join(CUSTOM_DIR)
    }

    pub fn loader_shim(&self) -> PathBuf {
        self.root.join(LOADER_SHIM)
    }

    pub fn default_cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }

    /// The emscripten cache: `override_dir` if given (relative paths are
    /// taken from the root, where the link runs), else the default.
    pub fn cache_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        match override_dir {
            Some(dir) => self.root.join(dir),
            None => self.default_cache_dir(),
        }
    }

    pub fn artifact(&self) -> PathBuf {
        self.root.join(ARTIFACT)
    }

    /// Path relative to the root for display, or the path itself if outside it.
    pub fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.root).unwrap_or(path).display()
    }
}
