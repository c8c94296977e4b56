use std::fmt;

use log::{debug, info, trace};
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::Pid;

use crate::error::{DemoError, Result};

/// How a reaped child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOutcome {
    Exited(i32),
    Signaled(Signal),
}

impl ChildOutcome {
    /// The outcome a wait status describes, or `None` if the child is still around.
    pub fn from_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(_, code) => Some(ChildOutcome::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => Some(ChildOutcome::Signaled(signal)),
            _ => None,
        }
    }

    /// Shell-style status: the exit code, or 128 plus the signal number.
    pub fn exit_code(&self) -> i32 {
        match self {
            ChildOutcome::Exited(code) => *code,
            ChildOutcome::Signaled(signal) => 128 + *signal as i32,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ChildOutcome::Exited(0))
    }
}

impl fmt::Display for ChildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildOutcome::Exited(code) => write!(f, "exited with code {}", code),
            ChildOutcome::Signaled(signal) => write!(f, "was terminated by signal {}", signal),
        }
    }
}

/// Blocks until `child` terminates and reports how it ended.
pub fn reap(child: Pid) -> Result<ChildOutcome> {
    loop {
        match waitpid(child, None) {
            Ok(status) => {
                trace!("wait status for {}: {:?}", child, status);
                if let Some(outcome) = ChildOutcome::from_status(status) {
                    return Ok(outcome);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(source) => return Err(DemoError::Wait { pid: child, source }),
        }
    }
}

/// Logs a reaped child's outcome. Kept below the default level so a demo run
/// prints nothing beyond its own stdout lines.
pub fn log_outcome(child: Pid, outcome: &ChildOutcome) {
    if outcome.success() {
        debug!("child {} {}", child, outcome);
    } else {
        info!("child {} {}", child, outcome);
    }
}
