//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use joint_graph::ConnectionCategory;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "joint",
    author,
    version,
    about = "Run and inspect Joint wiggle-wire simulations",
    long_about = None
)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate a single wire and print its offset over time
    Simulate(SimulateArgs),

    /// Replay a scene file through the connection drawing policy
    Scene(SceneArgs),

    /// Create, show or validate wire settings files
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// Connection category as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryArg {
    Normal,
    Recursive,
    #[value(name = "self")]
    SelfLink,
    Preview,
}

impl From<CategoryArg> for ConnectionCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Normal => ConnectionCategory::Normal,
            CategoryArg::Recursive => ConnectionCategory::Recursive,
            CategoryArg::SelfLink => ConnectionCategory::SelfLink,
            CategoryArg::Preview => ConnectionCategory::Preview,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Horizontal distance between the two endpoints
    #[arg(long, default_value_t = 400.0)]
    pub length: f32,

    /// Number of frames to run
    #[arg(long, default_value_t = 300)]
    pub frames: u32,

    /// Seconds per frame
    #[arg(long = "delta-time", default_value_t = 1.0 / 60.0)]
    pub delta_time: f32,

    /// Which category's simulation config to use
    #[arg(long, value_enum, default_value_t = CategoryArg::Normal)]
    pub category: CategoryArg,

    /// Settings file (.toml or .json) to read the config from
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Frame on which the start point jumps sideways
    #[arg(long = "jump-frame")]
    pub jump_frame: Option<u32>,

    /// How far the start point jumps
    #[arg(long = "jump-distance", default_value_t = 200.0)]
    pub jump_distance: f32,

    /// Print every Nth frame
    #[arg(long, default_value_t = 30)]
    pub every: u32,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Scene file (.json)
    pub file: PathBuf,

    /// Settings file (.toml or .json)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Write the default settings to a file
    Init {
        /// Destination (.toml or .json)
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print settings, the defaults if no file is given
    Show {
        path: Option<PathBuf>,

        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Check a settings file and report every problem
    Validate { path: PathBuf },
}
