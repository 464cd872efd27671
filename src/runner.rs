//! Process-wide task lifecycle shell.
//!
//! The [`TaskRunner`] is an explicit object with a bounded lifecycle
//! (`Running → ShuttingDown → Closed`), constructed once per process. It owns
//! the root cancellation token, an explicit registry of spawned unit handles,
//! and the operator-termination signal handling. On shutdown it cancels every
//! outstanding unit and waits for all of them to unwind before closing; since
//! every registered unit observes the token, the shutdown path itself cannot
//! hang.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;

// ============================================================================
// RunnerState
// ============================================================================

/// Lifecycle state of the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Accepting and driving work.
    Running,
    /// Cancellation requested; draining outstanding units.
    ShuttingDown,
    /// All units unwound; scheduler resources released.
    Closed,
}

// ============================================================================
// TaskRunner
// ============================================================================

/// Lifecycle shell that drives the root unit of work to completion.
pub struct TaskRunner {
    token: CancellationToken,
    state: Arc<Mutex<RunnerState>>,
    units: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRunner {
    /// Creates a runner in the `Running` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            state: Arc::new(Mutex::new(RunnerState::Running)),
            units: Mutex::new(Vec::new()),
        }
    }

    /// Returns a clone of the root cancellation token.
    ///
    /// Thread it through every unit of work; cancellation is observed at the
    /// unit's next suspension point.
    #[inline]
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> RunnerState {
        *self.state.lock()
    }

    /// Spawns a unit of work and registers its handle for the shutdown drain.
    ///
    /// Units must observe the runner's token; the drain awaits them and relies
    /// on cancellation to bound how long that takes.
    pub fn spawn<F>(&self, unit: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.units.lock().push(tokio::spawn(unit));
    }

    /// Requests shutdown: transitions to `ShuttingDown` and cancels the token.
    ///
    /// Idempotent; safe to call from any unit or signal handler.
    pub fn request_shutdown(&self) {
        let mut state = self.state.lock();
        if *state == RunnerState::Running {
            *state = RunnerState::ShuttingDown;
        }
        drop(state);
        self.token.cancel();
    }

    /// Drives the root unit to completion, then performs the full shutdown
    /// path: cancel, drain every registered unit, close.
    ///
    /// Shutdown is triggered by a termination signal (Ctrl-C, and SIGTERM on
    /// unix) or by the root unit finishing on its own, including finishing
    /// with an error, which is returned after cleanup rather than crashing
    /// the process.
    ///
    /// # Errors
    ///
    /// Returns the root unit's error, after all units have unwound.
    pub async fn run<F>(self, root: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        self.install_signal_handler();

        let result = root.await;

        self.request_shutdown();
        self.drain().await;
        *self.state.lock() = RunnerState::Closed;
        debug!("Runner closed");

        result
    }

    /// Registers the operator-termination handler as a unit of work.
    fn install_signal_handler(&self) {
        let token = self.token.clone();
        let state = Arc::clone(&self.state);

        self.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                () = wait_for_termination() => {
                    info!("Termination signal received, shutting down");
                    let mut state = state.lock();
                    if *state == RunnerState::Running {
                        *state = RunnerState::ShuttingDown;
                    }
                    drop(state);
                    token.cancel();
                }
            }
        });
    }

    /// Joins every registered unit, including units registered mid-drain.
    async fn drain(&self) {
        loop {
            let handles: Vec<_> = {
                let mut units = self.units.lock();
                units.drain(..).collect()
            };
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await
                    && e.is_panic()
                {
                    warn!(error = %e, "Unit panicked during shutdown");
                }
            }
        }
    }
}

// ============================================================================
// Signals
// ============================================================================

/// Resolves when the operator requests termination.
#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            warn!(error = %e, "SIGTERM handler unavailable, falling back to Ctrl-C only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

/// Resolves when the operator requests termination.
#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_new_runner_is_running() {
        let runner = TaskRunner::new();
        assert_eq!(runner.state(), RunnerState::Running);
        assert!(!runner.token().is_cancelled());
    }

    #[test]
    fn test_request_shutdown_transitions_and_cancels() {
        let runner = TaskRunner::new();
        runner.request_shutdown();

        assert_eq!(runner.state(), RunnerState::ShuttingDown);
        assert!(runner.token().is_cancelled());

        // Idempotent
        runner.request_shutdown();
        assert_eq!(runner.state(), RunnerState::ShuttingDown);
    }

    #[tokio::test]
    async fn test_run_closes_after_root_completes() {
        let runner = TaskRunner::new();
        let state = Arc::clone(&runner.state);
        let token = runner.token();

        let result = runner.run(async { Ok(()) }).await;

        assert!(result.is_ok());
        assert_eq!(*state.lock(), RunnerState::Closed);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_run_propagates_root_error_after_cleanup() {
        let runner = TaskRunner::new();
        let state = Arc::clone(&runner.state);

        let result = runner.run(async { Err(Error::protocol("boom")) }).await;

        assert!(matches!(result, Err(Error::Protocol { .. })));
        assert_eq!(*state.lock(), RunnerState::Closed);
    }

    #[tokio::test]
    async fn test_run_drains_registered_units() {
        let runner = TaskRunner::new();
        let unwound = Arc::new(AtomicBool::new(false));

        let token = runner.token();
        let flag = Arc::clone(&unwound);
        runner.spawn(async move {
            token.cancelled().await;
            flag.store(true, Ordering::SeqCst);
        });

        runner.run(async { Ok(()) }).await.expect("run");
        assert!(unwound.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_shutdown_request_unblocks_root() {
        let runner = TaskRunner::new();
        let token = runner.token();

        // A second handle requesting shutdown while the root waits on the token.
        let trigger = runner.token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = runner
            .run(async move {
                token.cancelled().await;
                Ok(())
            })
            .await;

        assert!(result.is_ok());
    }
}
