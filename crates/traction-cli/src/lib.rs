#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]

//! # Traction CLI
//!
//! Headless driver for the [`traction`] engine.
//!
//! The binary exposes two commands: `predict` prints the closed-form totals
//! for a set of parameters, and `run` replays a run at a fixed frame rate
//! the way an animation loop would and prints the sampled frames.
//!
//! This library exposes the pieces so integration tests and other front
//! ends can share them.
//!
//! ## Public Modules
//!
//! - [`cli`] - Command-line contract
//! - [`clock`] - Wall-clock to simulation-time conversion
//! - [`config`] - Layered runtime configuration
//! - [`session`] - Headless frame loop
//! - [`output`] - Table, JSON and CSV rendering

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod session;

use std::io::Write;

use traction::predict;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{Config, RunConfig};
pub use error::{CliError, Result};
pub use session::{Session, SessionReport};

/// Runs the parsed command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or writing fails.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let config = Config::from_cli(cli)?;
    tracing::debug!(?config, "effective configuration");

    match &cli.command {
        Command::Predict(args) => {
            let report = output::PredictionReport {
                parameters: config.parameters,
                prediction: predict(&config.parameters),
            };
            output::write_prediction(out, &report, args.format)
        }
        Command::Run(args) => {
            let report = Session::new(&config)?.run(args.series);
            output::write_report(out, &report, args.format)
        }
    }
}
