use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Program and arguments for a single spawn request
///
/// `program` becomes argv[0]; `args` follow it verbatim, with no shell-style
/// splitting or quoting.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct CommandSpec {
    pub program: String,
    #[builder(default)]
    #[builder(setter(custom))]
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn builder() -> CommandSpecBuilder {
        CommandSpecBuilder::default()
    }

    /// Shorthand for a program with arguments
    pub fn new<P, S, I>(program: P, args: I) -> Self
    where
        P: Into<String>,
        S: ToString,
        I: IntoIterator<Item = S>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Number of entries in the argv vector including the trailing NULL
    pub fn argv_len(&self) -> usize {
        self.args.len() + 2
    }
}

impl CommandSpecBuilder {
    pub fn args<S: ToString, I: IntoIterator<Item = S>>(&mut self, iter: I) -> &mut Self {
        let args: Vec<String> = iter.into_iter().map(|s| s.to_string()).collect();
        self.args = Some(args);
        self
    }

    pub fn arg<S: ToString>(&mut self, arg: S) -> &mut Self {
        self.args
            .get_or_insert_with(Vec::new)
            .push(arg.to_string());
        self
    }
}

/// Configuration of a process manager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManagerConfig {
    /// Status a forked child exits with when exec fails
    #[serde(default = "default_exec_failure_status")]
    pub exec_failure_status: i32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            exec_failure_status: default_exec_failure_status(),
        }
    }
}

impl ManagerConfig {
    /// Validate the configuration and return errors if invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=255).contains(&self.exec_failure_status) {
            return Err(anyhow::anyhow!(
                "exec_failure_status must be between 1 and 255"
            ));
        }

        Ok(())
    }
}

/// Configuration for polling a child until it exits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Delay between liveness probes (in milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll with the given interval
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            poll_interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Validate the configuration and return errors if invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("poll_interval_ms must be greater than 0"));
        }

        if self.poll_interval_ms > 60_000 {
            return Err(anyhow::anyhow!(
                "poll_interval_ms should not exceed 60 seconds"
            ));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// Default value functions for serde
fn default_exec_failure_status() -> i32 {
    127
}
fn default_poll_interval_ms() -> u64 {
    2_000
}
