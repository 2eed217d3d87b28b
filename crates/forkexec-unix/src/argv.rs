//! Marshalling of a [`CommandSpec`] into the NULL-terminated vector `execv`
//! expects.
//!
//! Everything is allocated before the fork so the child only touches memory
//! that already exists.

use forkexec_core::{CommandSpec, ProcessError};
use std::ffi::{CStr, CString, c_char};
use std::ptr;

/// Owned argv buffer: `[program, args..., NULL]`
pub(crate) struct Argv {
    program: CString,
    // Keeps the argument strings alive for as long as `ptrs` points at them.
    _args: Vec<CString>,
    ptrs: Vec<*const c_char>,
}

impl Argv {
    pub(crate) fn new(command: &CommandSpec) -> Result<Self, ProcessError> {
        if command.program.is_empty() {
            return Err(ProcessError::InvalidCommand(
                "program path is empty".to_string(),
            ));
        }

        let program = CString::new(command.program.as_bytes()).map_err(|_| {
            ProcessError::InvalidCommand(format!(
                "program path {:?} contains a NUL byte",
                command.program
            ))
        })?;

        let args = command
            .args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                CString::new(arg.as_bytes()).map_err(|_| {
                    ProcessError::InvalidCommand(format!(
                        "argument {index} ({arg:?}) contains a NUL byte"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut ptrs = Vec::with_capacity(command.argv_len());
        ptrs.push(program.as_ptr());
        ptrs.extend(args.iter().map(|arg| arg.as_ptr()));
        ptrs.push(ptr::null());

        Ok(Self {
            program,
            _args: args,
            ptrs,
        })
    }

    pub(crate) fn program(&self) -> &CStr {
        &self.program
    }

    pub(crate) fn as_ptr(&self) -> *const *const c_char {
        self.ptrs.as_ptr()
    }

    /// Length of the pointer vector, terminator included
    pub(crate) fn len(&self) -> usize {
        self.ptrs.len()
    }
}
