//! Build system for the LAMMPS web bundle.
//!
//! Structure:
//! - `install` - Change-aware file copy used by the overlay
//! - `vendor` - LAMMPS checkout at a pinned tag
//! - `customize` - Local source overlay and purge of unbuildable units
//! - `packages` - Optional LAMMPS package selection
//! - `native` - Serial native prebuild
//! - `wasm` - Emscripten cross-compile
//! - `bundle` - Final `lammps.js` link
//! - `pipeline` - The stage chain tying these together

pub mod bundle;
pub mod command;
pub mod config;
pub mod customize;
pub mod doctor;
pub mod error;
pub mod install;
pub mod native;
pub mod packages;
pub mod pipeline;
pub mod status;
pub mod vendor;
pub mod wasm;
pub mod workspace;

use clap::Subcommand;

/// Build commands for the CLI.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BuildCommands {
    /// Run the whole pipeline (default)
    All,
    /// Clone LAMMPS at the configured tag if not present
    Fetch,
    /// Overlay local sources and purge unbuildable units
    Customize,
    /// Enable the configured LAMMPS packages
    Packages,
    /// Serial native prebuild
    Native,
    /// Cross-compile with emscripten
    Wasm,
    /// Link lammps.js and check it was produced
    Bundle,
    /// Show workspace status
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the LAMMPS checkout
    Clean {
        /// Also remove lammps.js and the emscripten cache
        #[arg(long)]
        all: bool,
    },
    /// Check that git, make and emcc are on PATH
    Doctor,
}
