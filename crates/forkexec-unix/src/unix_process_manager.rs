use forkexec_core::{
    CommandSpec, ExitReason, ExitState, ManagerConfig, ProcessError, ProcessId, ProcessLifecycle,
    ProcessManager, ProcessTermination, TerminationResult,
};

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use crate::argv::Argv;
    use nix::errno::Errno;
    use nix::sys::signal::{self, Signal};
    use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
    use nix::unistd::{ForkResult, Pid as NixPid, fork};
    use tracing::{debug, info, warn};

    /// Unix process manager built directly on fork/exec
    ///
    /// Unlike `std::process::Command`, nothing runs between the fork and the
    /// exec: descriptors that are open and not close-on-exec in the caller stay
    /// open in the child. The manager keeps no record of the children it
    /// creates; every probe asks the OS.
    pub struct UnixProcessManager {
        config: ManagerConfig,
    }

    impl Default for UnixProcessManager {
        fn default() -> Self {
            <Self as ProcessManager>::new(ManagerConfig::default())
        }
    }

    /// Replace the child's image, or leave with the exec-failure status.
    ///
    /// Runs between fork and exec, so it must stay async-signal-safe: no
    /// allocation, no locks, no logging.
    fn exec_child(argv: &Argv, failure_status: i32) -> ! {
        // SAFETY: both pointers come from `argv`, which is alive and
        // NULL-terminated for the whole call.
        unsafe {
            libc::execv(argv.program().as_ptr(), argv.as_ptr());
        }
        // SAFETY: `_exit` skips atexit handlers and stdio flushing that belong
        // to the parent's image.
        unsafe { libc::_exit(failure_status) }
    }

    impl ProcessLifecycle for UnixProcessManager {
        fn spawn_process(&self, command: &CommandSpec) -> Result<ProcessId, ProcessError> {
            let argv = Argv::new(command)?;
            debug!(
                "Spawning {} with {} argv entries: {:?}",
                command.program,
                argv.len(),
                command.args
            );

            // SAFETY: the child only calls execv and _exit on buffers prepared
            // above, both of which are async-signal-safe.
            match unsafe { fork() } {
                Ok(ForkResult::Child) => exec_child(&argv, self.config.exec_failure_status),
                Ok(ForkResult::Parent { child }) => {
                    let pid = ProcessId::from_raw(child.as_raw()).ok_or_else(|| {
                        ProcessError::SpawnFailed {
                            program: command.program.clone(),
                            source: std::io::Error::other(format!(
                                "fork returned invalid pid {child}"
                            )),
                        }
                    })?;
                    info!(
                        "Spawned Unix process: {} (PID: {}) with args: {:?}",
                        command.program, pid, command.args
                    );
                    Ok(pid)
                }
                Err(e) => {
                    warn!("Failed to fork for {}: {}", command.program, e);
                    Err(ProcessError::SpawnFailed {
                        program: command.program.clone(),
                        source: e.into(),
                    })
                }
            }
        }

        fn exit_state(&self, pid: ProcessId) -> ExitState {
            let nix_pid = NixPid::from_raw(pid.as_raw());

            match waitpid(nix_pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::StillAlive) => ExitState::Running,
                Ok(WaitStatus::Exited(_, code)) => {
                    info!("Unix process {} exited with status {}", pid, code);
                    ExitState::Exited(ExitReason::Code(code))
                }
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    info!("Unix process {} was killed by {}", pid, signal);
                    ExitState::Exited(ExitReason::Signaled(signal as i32))
                }
                // Stop and continue notifications are never requested
                Ok(other) => {
                    debug!("Unix process {} reported {:?}", pid, other);
                    ExitState::Running
                }
                Err(e) => {
                    debug!("Unix process {} cannot be waited on: {}", pid, e);
                    ExitState::Unknown(e.desc().to_string())
                }
            }
        }
    }

    impl ProcessTermination for UnixProcessManager {
        fn terminate(&self, pid: ProcessId) -> TerminationResult {
            let nix_pid = NixPid::from_raw(pid.as_raw());

            let dispatch = match signal::kill(nix_pid, Signal::SIGTERM) {
                Ok(()) => {
                    info!("Sent SIGTERM to process {}", pid);
                    None
                }
                Err(Errno::ESRCH) => {
                    debug!("Process {} not found (already terminated)", pid);
                    Some(TerminationResult::ProcessNotFound)
                }
                Err(Errno::EPERM) => {
                    warn!("Permission denied to terminate process {}", pid);
                    Some(TerminationResult::AccessDenied)
                }
                Err(e) => {
                    warn!("Failed to send SIGTERM to process {}: {}", pid, e);
                    Some(TerminationResult::Failed(format!("SIGTERM failed: {e}")))
                }
            };

            // Exactly one non-blocking reap; the signal is usually still in
            // flight, so this rarely catches the exit.
            let reaped = match self.exit_state(pid) {
                ExitState::Exited(reason) => Some(reason),
                ExitState::Running | ExitState::Unknown(_) => None,
            };

            dispatch.unwrap_or(TerminationResult::Signalled { reaped })
        }
    }

    impl ProcessManager for UnixProcessManager {
        fn new(config: ManagerConfig) -> Self {
            debug!(
                "Initializing Unix process manager (exec failure status {})",
                config.exec_failure_status
            );
            Self { config }
        }

        fn config(&self) -> &ManagerConfig {
            &self.config
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::time::{Duration, Instant};

        fn sh(script: &str) -> CommandSpec {
            CommandSpec::new("/bin/sh", ["-c", script])
        }

        fn wait_until_exited(manager: &UnixProcessManager, pid: ProcessId) -> ExitState {
            let deadline = Instant::now() + Duration::from_secs(10);
            loop {
                let state = manager.exit_state(pid);
                if !state.is_running() || Instant::now() > deadline {
                    return state;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
        }

        #[test]
        fn test_spawn_and_reap_exit_code() {
            let manager = UnixProcessManager::default();
            let pid = manager.spawn_process(&sh("exit 3")).unwrap();

            assert!(pid.as_raw() > 0);
            assert_eq!(
                wait_until_exited(&manager, pid),
                ExitState::Exited(ExitReason::Code(3))
            );

            // The exit notification was consumed by the first probe
            assert!(matches!(manager.exit_state(pid), ExitState::Unknown(_)));
            assert!(!manager.is_alive(pid));
        }

        #[test]
        fn test_running_child_is_alive() {
            let manager = UnixProcessManager::default();
            let pid = manager.spawn_process(&sh("exec sleep 30")).unwrap();

            assert!(manager.is_alive(pid));
            assert!(manager.is_alive(pid));

            assert!(matches!(
                manager.terminate(pid),
                TerminationResult::Signalled { .. }
            ));
            assert!(!wait_until_exited(&manager, pid).is_running());
        }

        #[test]
        fn test_missing_binary_exits_with_exec_failure_status() {
            let manager = UnixProcessManager::default();
            let pid = manager
                .spawn_process(&CommandSpec::new(
                    "/nonexistent/forkexec-missing-binary",
                    ["--flag"],
                ))
                .unwrap();

            match wait_until_exited(&manager, pid) {
                ExitState::Exited(reason) => {
                    assert_eq!(reason, ExitReason::Code(127));
                    assert!(reason.is_exec_failure(manager.config()));
                }
                other => panic!("unexpected state {other:?}"),
            }
        }

        #[test]
        fn test_custom_exec_failure_status() {
            let manager = <UnixProcessManager as ProcessManager>::new(ManagerConfig {
                exec_failure_status: 99,
            });
            let pid = manager
                .spawn_process(&CommandSpec::new("/nonexistent/binary", Vec::<String>::new()))
                .unwrap();

            assert_eq!(
                wait_until_exited(&manager, pid),
                ExitState::Exited(ExitReason::Code(99))
            );
        }

        #[test]
        fn test_invalid_command_creates_no_child() {
            let manager = UnixProcessManager::default();

            let result = manager.spawn_process(&CommandSpec::new("", ["a"]));
            assert!(matches!(result, Err(ProcessError::InvalidCommand(_))));

            let result = manager.spawn_process(&CommandSpec::new("/bin/sh", ["-c", "exit\0 0"]));
            assert!(matches!(result, Err(ProcessError::InvalidCommand(_))));
        }

        #[test]
        fn test_terminate_reports_signal_and_is_idempotent() {
            let manager = UnixProcessManager::default();
            let pid = manager.spawn_process(&sh("exec sleep 30")).unwrap();

            let started = Instant::now();
            let result = manager.terminate(pid);
            assert!(started.elapsed() < Duration::from_secs(1));
            assert!(matches!(result, TerminationResult::Signalled { .. }));

            if let TerminationResult::Signalled { reaped: None } = result {
                assert_eq!(
                    wait_until_exited(&manager, pid),
                    ExitState::Exited(ExitReason::Signaled(Signal::SIGTERM as i32))
                );
            }

            assert_eq!(manager.terminate(pid), TerminationResult::ProcessNotFound);
            assert!(!manager.is_alive(pid));
        }
    }
}

// Re-export the Unix implementation when on Unix systems
#[cfg(unix)]
pub use unix_impl::UnixProcessManager;

// Provide a stub for non-Unix systems; it implements none of the traits
#[cfg(not(unix))]
pub struct UnixProcessManager;
