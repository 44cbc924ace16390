//! The `bytelog` command-line front end: read a source file, run it, print
//! `QUERY` results, and exit with a code that distinguishes parse failure
//! from rule-compile failure from a fixpoint that never stabilized.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bytelog::cli::Cli;
use bytelog::driver::run_program;
use bytelog::error::ByteLogError;
use bytelog::{parse_program, ByteLogRuntime};

fn init_logging(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_filter());

    let source = match std::fs::read_to_string(&cli.source) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!(path = %cli.source.display(), %err, "failed to read source file");
            return ExitCode::from(1);
        }
    };

    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(err) => {
            tracing::error!(%err, "parse error");
            return ExitCode::from(1);
        }
    };

    let mut runtime = ByteLogRuntime::new(cli.max_rounds);
    match run_program(&mut runtime, &program) {
        Ok(outcomes) => {
            for outcome in outcomes {
                if cli.quiet {
                    if let bytelog::driver::StatementOutcome::QueryResult { .. } = outcome {
                        println!("{outcome}");
                    }
                } else {
                    println!("{outcome}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(err @ ByteLogError::RuleCompile { .. }) => {
            tracing::error!(%err, "rule compile error");
            ExitCode::from(2)
        }
        Err(err @ ByteLogError::FixpointIterationCapExceeded { .. }) => {
            tracing::error!(%err, "fixpoint did not stabilize");
            ExitCode::from(3)
        }
        Err(err) => {
            tracing::error!(%err, "unexpected error");
            ExitCode::from(1)
        }
    }
}
