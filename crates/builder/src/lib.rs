//! Pipeline that compiles LAMMPS into a WebAssembly/JavaScript bundle.
//!
//! The stages shell out to `git`, `make` and `emcc` through
//! [`CommandRunner`]; see [`builder::pipeline`] for the order they run in.

pub mod builder;

pub use builder::command::{CommandRunner, Exit, Invocation, SystemRunner};
pub use builder::config::{PipelineConfig, PurgeProfile, RootStrategy};
pub use builder::error::{BuildError, PipelineError};
pub use builder::pipeline::{Pipeline, Stage};
pub use builder::workspace::Workspace;
