use crate::config::{CommandSpec, ManagerConfig};
use crate::error::ProcessError;
use std::fmt;

/// Raw OS process identifier as it crosses the boundary to the caller
pub type RawPid = i32;

/// Sentinel returned by the raw boundary when a spawn request fails
pub const SPAWN_FAILED: RawPid = -1;

/// Identifier of a child created by a spawn request
///
/// Always positive. Once the child has been reaped the identifier is stale and
/// the OS may hand the same number to an unrelated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(RawPid);

impl ProcessId {
    /// Wrap a raw identifier, rejecting zero and negative values
    pub fn from_raw(raw: RawPid) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn as_raw(self) -> RawPid {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ProcessId> for RawPid {
    fn from(pid: ProcessId) -> Self {
        pid.0
    }
}

/// How a reaped child ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Normal exit with the given status
    Code(i32),
    /// Killed by the given signal number
    Signaled(i32),
}

impl ExitReason {
    /// True when the child never managed to replace its image
    pub fn is_exec_failure(&self, config: &ManagerConfig) -> bool {
        matches!(self, ExitReason::Code(code) if *code == config.exec_failure_status)
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Code(code) => write!(f, "exit status {code}"),
            ExitReason::Signaled(signal) => write!(f, "signal {signal}"),
        }
    }
}

/// Liveness of a child, recomputed from the OS on every probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitState {
    /// No state change reported yet
    Running,
    /// The child exited and this probe reaped it
    Exited(ExitReason),
    /// The OS could not report on the identifier (already reaped, not our child)
    Unknown(String),
}

impl ExitState {
    pub fn is_running(&self) -> bool {
        matches!(self, ExitState::Running)
    }
}

/// Result of a termination request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationResult {
    /// SIGTERM was dispatched; `reaped` holds the exit if the single
    /// non-blocking reap after it already caught the child
    Signalled { reaped: Option<ExitReason> },
    /// No such process (already exited and reaped, or never existed)
    ProcessNotFound,
    /// Permission denied (identifier belongs to someone else's process)
    AccessDenied,
    /// Identifier was zero or negative; nothing was done
    InvalidId,
    /// Signal dispatch failed for another reason
    Failed(String),
}

/// Process creation and liveness probing
pub trait ProcessLifecycle: Send + Sync {
    /// Create exactly one child running `command`, inheriting every open
    /// descriptor of the caller. Never waits on the child.
    fn spawn_process(&self, command: &CommandSpec) -> Result<ProcessId, ProcessError>;

    /// Single non-blocking status check; reaps the child if it has exited
    fn exit_state(&self, pid: ProcessId) -> ExitState;

    /// Check if the child is still running (non-blocking)
    fn is_alive(&self, pid: ProcessId) -> bool {
        self.exit_state(pid).is_running()
    }
}

/// Graceful termination of a spawned child
pub trait ProcessTermination: Send + Sync {
    /// Send SIGTERM and make one non-blocking reap attempt
    fn terminate(&self, pid: ProcessId) -> TerminationResult;
}

/// Process manager combining lifecycle and termination
pub trait ProcessManager: ProcessLifecycle + ProcessTermination {
    /// Create a new process manager instance
    fn new(config: ManagerConfig) -> Self
    where
        Self: Sized;

    fn config(&self) -> &ManagerConfig;
}

/// Factory trait for creating platform-specific process managers
pub trait ProcessManagerFactory {
    /// The type of process manager this factory creates
    type Manager: ProcessManager;

    /// Create a process manager for the current platform
    fn create_process_manager(config: ManagerConfig) -> Self::Manager;

    /// Get the platform name for logging and debugging
    fn platform_name() -> &'static str;
}
