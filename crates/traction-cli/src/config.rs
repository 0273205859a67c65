//! Runtime configuration for the traction driver.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then command-line flags and their environment variables.
//!
//! ```toml
//! [parameters]
//! mass = 2.0
//! friction_coefficient = 0.2
//! applied_force = 10.0
//! force_duration = 1.0
//!
//! [run]
//! frame_rate = 60
//! time_scale = 1.0
//! max_frame_delta = 0.033
//! max_seconds = 30.0
//! sample_every = 1
//! trace_capacity = 5000
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use traction::{DEFAULT_CAPACITY, Parameters};

use crate::cli::{Cli, Command, ParamArgs, RunArgs};
use crate::clock::{MAX_FRAME_DELTA, SLOW_MOTION_SCALE};
use crate::error::{CliError, Result};

/// Longest replay a session will run, in s of wall time.
pub const MAX_WALL_SECONDS: f64 = 3600.0;

/// Highest replay frame rate.
pub const MAX_FRAME_RATE: u32 = 1000;

/// Complete driver configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Physical parameters of the run.
    pub parameters: Parameters,
    /// Replay settings.
    pub run: RunConfig,
}

/// Replay settings for the `run` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Frames per second.
    pub frame_rate: u32,
    /// Physical seconds per wall second.
    pub time_scale: f64,
    /// Longest wall delta one frame may contribute, in s.
    pub max_frame_delta: f64,
    /// Wall-time limit for a replay, in s.
    pub max_seconds: f64,
    /// Keep one frame out of every N.
    pub sample_every: usize,
    /// Samples kept in the trace.
    pub trace_capacity: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            time_scale: 1.0,
            max_frame_delta: MAX_FRAME_DELTA,
            max_seconds: 30.0,
            sample_every: 1,
            trace_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl RunConfig {
    /// Validate the replay settings.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidSetting`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &'static str, reason: &'static str) -> Result<()> {
            Err(CliError::InvalidSetting { name, reason })
        }

        if self.frame_rate == 0 || self.frame_rate > MAX_FRAME_RATE {
            return invalid("frame_rate", "must be between 1 and 1000");
        }
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return invalid("time_scale", "must be a finite number greater than zero");
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return invalid(
                "max_frame_delta",
                "must be a finite number greater than zero",
            );
        }
        if !(self.max_seconds > 0.0 && self.max_seconds <= MAX_WALL_SECONDS) {
            return invalid("max_seconds", "must be greater than zero and at most 3600");
        }
        if self.sample_every == 0 {
            return invalid("sample_every", "must be at least 1");
        }
        if self.trace_capacity == 0 {
            return invalid("trace_capacity", "must be at least 1");
        }
        Ok(())
    }
}

impl Config {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ParseConfig`] on malformed TOML or mistyped values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ReadConfig`] if the file cannot be read, or
    /// [`CliError::ParseConfig`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Build the effective configuration for a parsed command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the merged
    /// settings do not validate.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        config.apply_params(cli.command.params());
        if let Command::Run(args) = &cli.command {
            config.apply_run(args);
        }

        config.validate()?;
        Ok(config)
    }

    /// Overlay the parameter flags that were given.
    pub fn apply_params(&mut self, args: &ParamArgs) {
        let p = &mut self.parameters;
        if let Some(mass) = args.mass {
            p.mass = mass;
        }
        if let Some(mu) = args.friction {
            p.friction_coefficient = mu;
        }
        if let Some(force) = args.force {
            p.applied_force = force;
        }
        if let Some(duration) = args.duration {
            p.force_duration = duration;
        }
    }

    /// Overlay the replay flags that were given.
    pub fn apply_run(&mut self, args: &RunArgs) {
        let run = &mut self.run;
        if args.slow {
            run.time_scale = SLOW_MOTION_SCALE;
        }
        if let Some(frame_rate) = args.frame_rate {
            run.frame_rate = frame_rate;
        }
        if let Some(max_seconds) = args.max_seconds {
            run.max_seconds = max_seconds;
        }
        if let Some(sample_every) = args.sample_every {
            run.sample_every = sample_every;
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters or the replay settings are out of range.
    pub fn validate(&self) -> Result<()> {
        self.parameters.validate()?;
        self.run.validate()
    }
}
