//! Command-line argument parsing for the `bytelog` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::engine::runtime::DEFAULT_MAX_ROUNDS;

#[derive(Parser, Debug)]
#[command(name = "bytelog", version, about = "Run a ByteLog program")]
pub struct Cli {
    /// Path to a ByteLog source file.
    pub source: PathBuf,

    /// Abort SOLVE if it hasn't reached a fixpoint after this many rounds.
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    pub max_rounds: u64,

    /// Increase log verbosity; repeat for more (-v, -vv, -vvv).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output but QUERY results and fatal errors.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// The `tracing` filter directive implied by `-v`/`-q`, coarsest to
    /// finest: quiet, default, `-v`, `-vv`, `-vvv` and beyond.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "off"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}
