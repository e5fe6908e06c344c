//! `workout-clock` - Tick-driven clock for timed interval workouts

use clap::Parser;

use workout_clock::cli::Shutdown;
use workout_clock::cli::args::Cli;
use workout_clock::cli::commands;
use workout_clock::error::{ConfigError, ExitCode, WorkoutClockError};
use workout_clock::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format.into(), cli.verbose, cli.color);
    }

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    let result = commands::dispatch(cli, shutdown.clone()).await;

    match result {
        Ok(()) => std::process::exit(shutdown.exit_code()),
        Err(e) => {
            eprintln!("error: {e}");
            if let WorkoutClockError::Config(ConfigError::ValidationError { errors, .. }) = &e {
                for issue in errors {
                    eprintln!("  {issue}");
                }
            }
            std::process::exit(match shutdown.exit_code() {
                ExitCode::SUCCESS => e.exit_code(),
                code => code,
            });
        }
    }
}
