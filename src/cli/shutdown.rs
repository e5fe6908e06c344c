//! Signal-driven shutdown
//!
//! The first SIGINT or SIGTERM cancels the running workout and records which
//! signal arrived so the process can exit with the matching code. A second
//! signal exits immediately.

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::error::ExitCode;
use crate::observability::StopReason;

/// Shared shutdown handle.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
    reason: Arc<OnceLock<StopReason>>,
}

impl Shutdown {
    /// Creates an untriggered handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled when shutdown is triggered.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Records `reason` (first caller wins) and cancels the token.
    pub fn trigger(&self, reason: StopReason) {
        let _ = self.reason.set(reason);
        self.token.cancel();
    }

    /// Reason recorded by the first trigger, if any.
    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        self.reason.get().copied()
    }

    /// Process exit code implied by the recorded reason.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.reason() {
            Some(StopReason::Interrupted) => ExitCode::INTERRUPTED,
            Some(StopReason::Terminated) => ExitCode::TERMINATED,
            _ => ExitCode::SUCCESS,
        }
    }

    /// Spawns the task that maps process signals onto this handle.
    pub fn listen_for_signals(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            let first = wait_for_signal().await;
            tracing::info!(reason = %first, "shutdown requested");
            eprintln!("\nStopping workout... (press Ctrl+C again to force)");
            shutdown.trigger(first);

            let second = wait_for_signal().await;
            let code = match second {
                StopReason::Terminated => ExitCode::TERMINATED,
                _ => ExitCode::INTERRUPTED,
            };
            std::process::exit(code);
        });
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> StopReason {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => tokio::select! {
            _ = tokio::signal::ctrl_c() => StopReason::Interrupted,
            _ = sigterm.recv() => StopReason::Terminated,
        },
        Err(e) => {
            tracing::warn!(error = %e, "failed to register SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            StopReason::Interrupted
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> StopReason {
    let _ = tokio::signal::ctrl_c().await;
    StopReason::Interrupted
}
