//! Preparing descriptors for inheritance.
//!
//! Spawning never touches descriptors, but exec itself closes every
//! descriptor marked close-on-exec, and Rust's standard library sets that flag
//! on everything it opens. A caller that wants the child to see a descriptor
//! clears the flag before spawning.

use nix::fcntl::{FcntlArg, FdFlag, fcntl};
use std::os::fd::AsFd;
use tracing::debug;

/// Clear `FD_CLOEXEC` so `fd` survives the exec in a spawned child
pub fn make_inheritable<Fd: AsFd>(fd: Fd) -> std::io::Result<()> {
    let fd = fd.as_fd();
    let flags = FdFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFD)?);
    if flags.contains(FdFlag::FD_CLOEXEC) {
        fcntl(fd, FcntlArg::F_SETFD(flags - FdFlag::FD_CLOEXEC))?;
        debug!("Cleared close-on-exec on {:?}", fd);
    }
    Ok(())
}

/// Check whether `fd` would survive an exec
pub fn is_inheritable<Fd: AsFd>(fd: Fd) -> std::io::Result<bool> {
    let flags = FdFlag::from_bits_truncate(fcntl(fd.as_fd(), FcntlArg::F_GETFD)?);
    Ok(!flags.contains(FdFlag::FD_CLOEXEC))
}
