use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a path cannot be executed
#[derive(Error, Debug)]
pub enum ExecutableError {
    #[error("Executable not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("No execute permission: {0}")]
    NotExecutable(PathBuf),

    #[error("Cannot inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Check that `path` names a regular file with at least one execute bit set.
///
/// Spawning does not call this; an exec failure only shows up as the child's
/// exit status. Callers that want an early, descriptive error check first.
pub fn check_executable(path: impl AsRef<Path>) -> Result<(), ExecutableError> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExecutableError::NotFound(path.to_path_buf()),
        _ => ExecutableError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_file() {
        return Err(ExecutableError::NotAFile(path.to_path_buf()));
    }

    if metadata.permissions().mode() & 0o111 == 0 {
        return Err(ExecutableError::NotExecutable(path.to_path_buf()));
    }

    Ok(())
}
