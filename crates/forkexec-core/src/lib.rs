//! forkexec core - platform-independent process lifecycle abstractions
//!
//! This crate provides the identifier, exit-state and configuration types plus
//! the traits that platform-specific managers implement.

mod config;
mod error;
mod process;

pub use config::*;
pub use error::*;
pub use process::*;
