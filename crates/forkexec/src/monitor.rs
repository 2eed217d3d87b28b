//! Polling a spawned child until it goes away.
//!
//! The core probes never block, so waiting for an exit is the caller's job:
//! these helpers poll the liveness check on a tokio interval. They only
//! observe. Restarting a dead child is left to whoever awaits the outcome.

use forkexec_core::{ExitState, MonitorConfig, ProcessId, ProcessLifecycle};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Why a watch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The child is gone; holds the state the final probe observed
    Exited(ExitState),
    /// The token was cancelled while the child was still running
    Cancelled,
}

/// Poll `pid` every `config.poll_interval()` until it exits or `cancel` fires.
///
/// The first probe happens immediately. The probe that observes the exit reaps
/// the child.
pub async fn watch<M>(
    manager: &M,
    pid: ProcessId,
    config: &MonitorConfig,
    cancel: &CancellationToken,
) -> anyhow::Result<WatchOutcome>
where
    M: ProcessLifecycle + ?Sized,
{
    config.validate()?;

    let mut ticker = tokio::time::interval(config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(
        "Watching process {} every {}ms",
        pid, config.poll_interval_ms
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Stopped watching process {}", pid);
                return Ok(WatchOutcome::Cancelled);
            }
            _ = ticker.tick() => {
                let state = manager.exit_state(pid);
                if !state.is_running() {
                    info!("Watched process {} is gone: {:?}", pid, state);
                    return Ok(WatchOutcome::Exited(state));
                }
            }
        }
    }
}

/// Run [`watch`] on a background task
pub fn spawn_watch<M>(
    manager: Arc<M>,
    pid: ProcessId,
    config: MonitorConfig,
    cancel: CancellationToken,
) -> JoinHandle<anyhow::Result<WatchOutcome>>
where
    M: ProcessLifecycle + 'static,
{
    tokio::spawn(async move { watch(manager.as_ref(), pid, &config, &cancel).await })
}
