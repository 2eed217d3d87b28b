use thiserror::Error;

/// Errors surfaced synchronously by a spawn request
///
/// Terminate and liveness probes never produce one of these; they degrade to
/// no-ops or `false` instead.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Check if the caller supplied something that can never be spawned
    pub fn is_input_error(&self) -> bool {
        matches!(self, ProcessError::InvalidCommand(_))
    }

    /// Check if the failure came from the OS refusing to create a process
    pub fn is_resource_error(&self) -> bool {
        matches!(self, ProcessError::SpawnFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categorization() {
        assert!(ProcessError::InvalidCommand("empty".to_string()).is_input_error());
        assert!(!ProcessError::InvalidCommand("empty".to_string()).is_resource_error());

        let error = ProcessError::SpawnFailed {
            program: "/bin/true".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::OutOfMemory),
        };
        assert!(error.is_resource_error());
        assert!(!error.is_input_error());
    }

    #[test]
    fn test_error_display() {
        let error = ProcessError::InvalidCommand("program path is empty".to_string());
        assert_eq!(
            format!("{error}"),
            "Invalid command: program path is empty"
        );

        let error = ProcessError::SpawnFailed {
            program: "/usr/bin/tun2socks".to_string(),
            source: std::io::Error::other("fork: resource temporarily unavailable"),
        };
        let display = format!("{error}");
        assert!(display.contains("Failed to spawn '/usr/bin/tun2socks'"));
        assert!(display.contains("resource temporarily unavailable"));
    }

    #[test]
    fn test_error_source_is_preserved() {
        use std::error::Error as _;

        let error = ProcessError::SpawnFailed {
            program: "x".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::WouldBlock),
        };
        assert!(error.source().is_some());
        assert!(ProcessError::InvalidCommand("x".to_string()).source().is_none());
    }
}
