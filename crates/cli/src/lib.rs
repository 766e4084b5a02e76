//! # Joint CLI
//!
//! Command-line tools for Joint wire simulations.
//!
//! Runs the wire simulator and the connection drawing policy outside an
//! editor, so their behaviour can be inspected and tuned from a terminal.
//!
//! ## Commands
//!
//! - `simulate` - Simulate one wire and print its offset over time
//! - `scene` - Replay a scene file and report what the last frame drew
//! - `settings init` - Write the default wire settings
//! - `settings show` - Print settings as TOML or JSON
//! - `settings validate` - Check a settings file
//!

pub mod args;
pub mod commands;
pub mod replay;
pub mod simulation;

// Re-export dependencies for use in main.rs
pub use joint_core;
pub use joint_graph;
pub use joint_render;
pub use joint_wire;

pub use args::{Cli, Command};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Dispatch a parsed command line
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Simulate(args) => commands::simulate(args),
        Command::Scene(args) => commands::scene(args),
        Command::Settings(command) => commands::settings(command),
    }
}
