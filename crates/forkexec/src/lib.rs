//! Spawn, probe and terminate child processes without closing inherited
//! file descriptors.
//!
//! `std::process::Command` and most runtime launchers run code between fork
//! and exec that can close or remap descriptors. This crate forks and execs
//! directly, so a descriptor the caller opened beforehand (a tunnel device,
//! a socket) is still open in the child.
//!
//! Two surfaces are offered:
//! - [`boundary`]: the raw three-operation contract over `i32` identifiers,
//!   with `-1` as the spawn failure sentinel.
//! - the typed [`ProcessManager`] API, created with
//!   [`create_process_manager`].

#[cfg(not(unix))]
compile_error!("forkexec only supports Unix targets");

pub mod boundary;
mod check;
pub mod fd;
pub mod monitor;

pub use check::{ExecutableError, check_executable};
pub use monitor::{WatchOutcome, spawn_watch, watch};

// Re-export core functionality
pub use forkexec_core::*;

/// Platform-independent factory that selects the implementation at compile time
pub struct PlatformProcessManagerFactory;

impl ProcessManagerFactory for PlatformProcessManagerFactory {
    #[cfg(unix)]
    type Manager = forkexec_unix::UnixProcessManager;

    fn create_process_manager(config: ManagerConfig) -> Self::Manager {
        #[cfg(unix)]
        return forkexec_unix::UnixProcessManagerFactory::create_process_manager(config);
    }

    fn platform_name() -> &'static str {
        #[cfg(unix)]
        return forkexec_unix::UnixProcessManagerFactory::platform_name();
    }
}

/// Process manager for the current platform
pub type PlatformProcessManager = <PlatformProcessManagerFactory as ProcessManagerFactory>::Manager;

/// Validate `config` and create a process manager for the current platform
pub fn create_process_manager(config: ManagerConfig) -> anyhow::Result<PlatformProcessManager> {
    config.validate()?;
    tracing::debug!(
        "Creating {} process manager",
        PlatformProcessManagerFactory::platform_name()
    );
    Ok(PlatformProcessManagerFactory::create_process_manager(config))
}
