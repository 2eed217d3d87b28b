//! Raw spawn / terminate / is-alive contract over plain integers.
//!
//! These functions are what a host runtime binds to: only strings and
//! integers cross, nothing is retained between calls, and terminate and
//! is-alive never report errors.

use crate::{PlatformProcessManagerFactory, create_process_manager};
use forkexec_core::{
    CommandSpec, ExitState, ManagerConfig, ProcessId, ProcessLifecycle, ProcessManagerFactory,
    ProcessTermination, RawPid, SPAWN_FAILED, TerminationResult,
};
use tracing::{debug, warn};

fn manager() -> crate::PlatformProcessManager {
    PlatformProcessManagerFactory::create_process_manager(ManagerConfig::default())
}

/// Fork and exec `path` with `args`, inheriting every open descriptor.
///
/// `path` becomes argv[0]. Returns the child's pid, or [`SPAWN_FAILED`] if the
/// command could not be marshalled or the fork failed; in that case no child
/// exists. A missing or non-executable `path` is not detected here: the child
/// exits with status 127 and a later [`is_alive`] returns `false`.
pub fn spawn<S: AsRef<str>>(path: &str, args: &[S]) -> RawPid {
    let command = CommandSpec::new(path, args.iter().map(AsRef::<str>::as_ref));
    match manager().spawn_process(&command) {
        Ok(pid) => pid.as_raw(),
        Err(e) => {
            warn!("Spawn of {} failed: {}", path, e);
            SPAWN_FAILED
        }
    }
}

/// Send SIGTERM to `pid` and make one non-blocking reap attempt.
///
/// Safe to call with stale, zero or negative identifiers.
pub fn terminate(pid: RawPid) {
    let _ = terminate_raw(pid);
}

/// Like [`terminate`], but reports what happened
pub fn terminate_raw(pid: RawPid) -> TerminationResult {
    match ProcessId::from_raw(pid) {
        Some(pid) => manager().terminate(pid),
        None => {
            debug!("Ignoring terminate for invalid pid {}", pid);
            TerminationResult::InvalidId
        }
    }
}

/// Single non-blocking liveness check. Reaps the child if it has exited.
pub fn is_alive(pid: RawPid) -> bool {
    exit_state_raw(pid).is_running()
}

/// Like [`is_alive`], but reports how the child ended
pub fn exit_state_raw(pid: RawPid) -> ExitState {
    match ProcessId::from_raw(pid) {
        Some(pid) => manager().exit_state(pid),
        None => ExitState::Unknown(format!("invalid pid {pid}")),
    }
}

/// Spawn with a validated, non-default configuration
pub fn spawn_with(config: ManagerConfig, command: &CommandSpec) -> RawPid {
    let manager = match create_process_manager(config) {
        Ok(manager) => manager,
        Err(e) => {
            warn!("Rejected manager configuration: {}", e);
            return SPAWN_FAILED;
        }
    };

    match manager.spawn_process(command) {
        Ok(pid) => pid.as_raw(),
        Err(e) => {
            warn!("Spawn of {} failed: {}", command.program, e);
            SPAWN_FAILED
        }
    }
}
