//! Shared integration-test harness for running the `workout-clock` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Helpers for invoking the compiled `workout-clock` binary.
pub struct WorkoutClockProcess;

impl WorkoutClockProcess {
    /// Path to the compiled binary.
    pub fn bin() -> &'static str {
        env!("CARGO_BIN_EXE_workout-clock")
    }

    /// Runs the binary to completion with `args` and captures its output.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Command::new(Self::bin())
            .args(args)
            .env_remove("WORKOUT_CLOCK_LOG_LEVEL")
            .env("WORKOUT_CLOCK_COLOR", "never")
            .output()
            .expect("failed to run workout-clock")
    }

    /// Like [`spawn_command`](Self::spawn_command) with extra environment.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(Self::bin());
        cmd.args(args)
            .env_remove("WORKOUT_CLOCK_LOG_LEVEL")
            .env("WORKOUT_CLOCK_COLOR", "never");
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.output().expect("failed to run workout-clock")
    }

    /// Absolute path to a file under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Fixture path as `&str`-friendly `String`.
    pub fn fixture(name: &str) -> String {
        Self::fixture_path(name)
            .to_str()
            .expect("non-UTF-8 fixture path")
            .to_string()
    }
}
