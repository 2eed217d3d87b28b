//! Helper binary for the integration tests.
//!
//! Writes a JSON report of its arguments and open descriptors to
//! `$TMPDIR/forkexec-probe-<pid>.json`, then acts on its first argument:
//!
//! - `sleep <secs>`: stay alive for that long
//! - `exit <code>`: exit with that status
//! - `write-fd <fd>`: write `probe\n` to an inherited descriptor
//!
//! Any other arguments are only recorded.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::os::fd::{FromRawFd, RawFd};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProbeReport {
    pid: u32,
    args: Vec<String>,
    open_fds: Vec<RawFd>,
}

fn report_path(pid: u32) -> PathBuf {
    std::env::temp_dir().join(format!("forkexec-probe-{pid}.json"))
}

fn open_fds() -> Result<Vec<RawFd>> {
    let mut fds = std::fs::read_dir("/dev/fd")
        .context("listing /dev/fd")?
        .filter_map(|entry| entry.ok()?.file_name().to_str()?.parse().ok())
        .collect::<Vec<RawFd>>();
    fds.sort_unstable();
    Ok(fds)
}

fn write_report(report: &ProbeReport) -> Result<()> {
    let path = report_path(report.pid);
    let partial = path.with_extension("partial");
    std::fs::write(&partial, serde_json::to_vec(report)?)
        .with_context(|| format!("writing {}", partial.display()))?;
    // Readers only ever see a complete report
    std::fs::rename(&partial, &path).with_context(|| format!("renaming to {}", path.display()))?;
    Ok(())
}

fn argument<T: std::str::FromStr>(args: &[String], index: usize) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args
        .get(index)
        .with_context(|| format!("missing argument {index}"))?;
    raw.parse()
        .with_context(|| format!("invalid argument {index}: {raw:?}"))
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let report = ProbeReport {
        pid: std::process::id(),
        args: args.clone(),
        open_fds: open_fds()?,
    };
    write_report(&report)?;

    match args.first().map(String::as_str) {
        Some("sleep") => std::thread::sleep(Duration::from_secs(argument(&args, 1)?)),
        Some("exit") => std::process::exit(argument(&args, 1)?),
        Some("write-fd") => {
            let fd: RawFd = argument(&args, 1)?;
            // SAFETY: the descriptor was inherited from the spawning test and
            // nothing else in this process uses it.
            let mut file = unsafe { File::from_raw_fd(fd) };
            file.write_all(b"probe\n")
                .with_context(|| format!("writing to inherited fd {fd}"))?;
        }
        _ => {}
    }

    Ok(())
}
