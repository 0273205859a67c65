//! Tracing subscriber setup.

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` when set, otherwise `default_level`.
pub fn filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level).into())
        .from_env_lossy()
}

/// Installs a fmt subscriber writing to stderr, so stdout carries only
/// command output.
///
/// Does nothing if a global subscriber is already installed.
pub fn init(default_level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(%default_level, "logging initialized");
    }
}
