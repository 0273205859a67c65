//! Command-line interface for the `traction` binary.
//!
//! Defines the CLI contract using clap derive macros.
//!
//! # Examples
//!
//! ```bash
//! # Closed-form totals for the default run
//! traction predict
//!
//! # Replay a heavier block in slow motion and dump the frames as CSV
//! traction run --mass 5 --force 30 --slow --format csv
//!
//! # Use a config file, then override one value
//! traction --config lab.toml run --friction 0.35
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;
use traction::Series;

/// Exact motion of a pushed block sliding against friction.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "traction",
    author,
    version,
    about = "Exact motion of a pushed block sliding against friction",
    long_about = "Predicts and replays the motion of a block pushed along a rough \
                  surface: a force acts for a limited time, then friction brings the \
                  block to rest."
)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, short = 'c', env = "TRACTION_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the closed-form prediction for a set of parameters
    Predict(PredictArgs),

    /// Replay a run frame by frame and print the sampled frames
    Run(RunArgs),
}

/// Physical parameters; each overrides the config file when given.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ParamArgs {
    /// Mass of the block in kg
    #[arg(long, short = 'm', env = "TRACTION_MASS")]
    pub mass: Option<f64>,

    /// Kinetic friction coefficient
    #[arg(long, short = 'u', env = "TRACTION_FRICTION")]
    pub friction: Option<f64>,

    /// Applied force in N
    #[arg(long, short = 'f', env = "TRACTION_FORCE")]
    pub force: Option<f64>,

    /// How long the force acts, in s
    #[arg(long, short = 'd', env = "TRACTION_DURATION")]
    pub duration: Option<f64>,
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Physical parameters
    #[command(flatten)]
    pub params: ParamArgs,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Physical parameters
    #[command(flatten)]
    pub params: ParamArgs,

    /// Play at quarter speed
    #[arg(long, env = "TRACTION_SLOW")]
    pub slow: bool,

    /// Series whose axis range and peak are reported (v, a, x, fnet)
    #[arg(long, short = 's', default_value = "v")]
    pub series: Series,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,

    /// Frames per second of the replay (at most 1000)
    #[arg(long)]
    pub frame_rate: Option<u32>,

    /// Give up after this many seconds of wall time (at most 3600)
    #[arg(long)]
    pub max_seconds: Option<f64>,

    /// Keep one frame out of every N
    #[arg(long)]
    pub sample_every: Option<usize>,
}

/// Output formats.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned human-readable text
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Get log level based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

impl Command {
    /// Parameter overrides carried by the subcommand.
    #[must_use]
    pub const fn params(&self) -> &ParamArgs {
        match self {
            Self::Predict(args) => &args.params,
            Self::Run(args) => &args.params,
        }
    }
}
