#[cfg(unix)]
mod argv;
mod unix_process_manager;

pub use unix_process_manager::UnixProcessManager;

#[cfg(unix)]
pub struct UnixProcessManagerFactory;

#[cfg(unix)]
impl forkexec_core::ProcessManagerFactory for UnixProcessManagerFactory {
    type Manager = UnixProcessManager;

    fn create_process_manager(config: forkexec_core::ManagerConfig) -> UnixProcessManager {
        <UnixProcessManager as forkexec_core::ProcessManager>::new(config)
    }

    fn platform_name() -> &'static str {
        "Unix"
    }
}
