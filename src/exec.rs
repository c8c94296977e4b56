use std::ffi::{CStr, CString};

use log::debug;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::unistd::execv;

use crate::error::{DemoError, Result};
use crate::fork::{duplicate, exit_immediately, Branch};
use crate::wait::{log_outcome, reap};

pub const DEFAULT_PROGRAM: &str = "/bin/ls";
pub const DEFAULT_FLAG: &str = "-l";

/// Status the child exits with when its image could not be replaced.
pub const EXEC_FAILURE_STATUS: i32 = 1;

/// A program to run in place of the current image, plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    program: String,
    args: Vec<String>,
}

impl ExecRequest {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument vector in exec order: the program path, then each argument.
    /// The trailing NULL is added by `execv` itself.
    pub fn argv(&self) -> Result<Vec<CString>> {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| CString::new(s.as_str()).map_err(|e| DemoError::NulByte(s.clone(), e)))
            .collect()
    }
}

impl Default for ExecRequest {
    fn default() -> Self {
        ExecRequest::new(DEFAULT_PROGRAM).arg(DEFAULT_FLAG)
    }
}

pub fn failure_line(program: &str) -> String {
    format!("Fails to execute {}", program)
}

/// Replaces the current process image with the program at `path`.
///
/// Only ever returns when the replacement failed.
pub fn replace_image(path: &CStr, argv: &[CString]) -> DemoError {
    match execv(path, argv) {
        Ok(never) => match never {},
        Err(source) => DemoError::Exec {
            path: path.to_string_lossy().into_owned(),
            source,
        },
    }
}

/// Forks a child that runs `request` in place of itself.
///
/// If the exec fails the child prints the failure line to stdout and exits
/// with [`EXEC_FAILURE_STATUS`]. The parent returns 0, or the child's status
/// when `wait` is set.
///
/// # Safety
///
/// The calling process must be single-threaded, as for [`duplicate`].
pub unsafe fn run_exec_demo(request: &ExecRequest, wait: bool) -> Result<i32> {
    // Built before the fork so a bad argument is reported once, by the parent.
    // Never empty: the program path is always argv[0].
    let argv = request.argv()?;

    match duplicate()? {
        Branch::Child => {
            // The Rust runtime ignores SIGPIPE; the new program gets the default back.
            if let Err(errno) = signal(Signal::SIGPIPE, SigHandler::SigDfl) {
                debug!("could not restore SIGPIPE: {}", errno);
            }
            let err = replace_image(&argv[0], &argv);
            debug!("{}", err);
            println!("{}", failure_line(request.program()));
            exit_immediately(EXEC_FAILURE_STATUS);
        }
        Branch::Parent { child } => {
            debug!("forked child {} to run {:?}", child, argv);

            if !wait {
                return Ok(0);
            }
            let outcome = reap(child)?;
            log_outcome(child, &outcome);
            Ok(outcome.exit_code())
        }
    }
}
