#![deny(clippy::all)]

/**
 * Glimmer Compiler CLI
 *
 * Configuration loading and batch precompilation behind the
 * `glimmer-precompile` binary.
 */
pub use glimmer_compiler as compiler;

pub mod config;
pub mod perform_precompile;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
