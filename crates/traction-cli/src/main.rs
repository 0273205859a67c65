#![forbid(unsafe_code)]

//! # Traction
//!
//! Predict and replay the motion of a pushed block sliding against friction.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p traction-cli -- run --slow --series x
//! ```

use std::io::{self, Write};

use traction_cli::{Cli, execute, logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.log_level());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)?;
    out.flush()?;

    Ok(())
}
