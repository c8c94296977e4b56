use std::fmt;
use std::io::{self, Write};

use log::debug;
use nix::libc::_exit;
use nix::unistd::{fork, getpid, ForkResult, Pid};

use crate::error::{DemoError, Result};
use crate::wait::{log_outcome, reap};

/// Which side of a fork the current process is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Parent { child: Pid },
    Child,
}

impl Branch {
    /// The raw value fork handed back in this context: zero in the child,
    /// the child's pid in the parent.
    pub fn return_value(&self) -> i32 {
        match self {
            Branch::Parent { child } => child.as_raw(),
            Branch::Child => 0,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Branch::Parent { .. } => Role::Parent,
            Branch::Child => Role::Child,
        }
    }
}

impl From<ForkResult> for Branch {
    fn from(result: ForkResult) -> Self {
        match result {
            ForkResult::Parent { child } => Branch::Parent { child },
            ForkResult::Child => Branch::Child,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Parent,
    Child,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Parent => write!(f, "parent"),
            Role::Child => write!(f, "child"),
        }
    }
}

pub fn identity_line(role: Role, pid: Pid, return_value: i32) -> String {
    format!(
        "I am {} with pid {}. I got return value from fork: {}",
        role, pid, return_value
    )
}

/// Duplicates the calling process.
///
/// Stdout is flushed first so that anything still buffered is not written
/// twice, once by each process.
///
/// # Safety
///
/// The caller must be single-threaded. After a fork from a multi-threaded
/// process the child may only call async-signal-safe functions, and the rest
/// of this crate allocates and prints in the child.
pub unsafe fn duplicate() -> Result<Branch> {
    let _ = io::stdout().flush();
    branch_from_fork(fork())
}

pub fn branch_from_fork(result: nix::Result<ForkResult>) -> Result<Branch> {
    result.map(Branch::from).map_err(DemoError::Fork)
}

/// Pairs a fork outcome with the line this process should print.
/// A failed fork yields only the error, never an identity line.
pub fn identify(forked: Result<Branch>, pid: Pid) -> Result<(Branch, String)> {
    let branch = forked?;
    let line = identity_line(branch.role(), pid, branch.return_value());
    Ok((branch, line))
}

/// Ends the current process right here, without unwinding into caller code.
pub fn exit_immediately(code: i32) -> ! {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    unsafe { _exit(code) }
}

/// Forks once; parent and child each print their identity line.
///
/// The child exits with status 0 straight after printing. The parent returns
/// the status it wants to exit with: 0, or the child's status when `wait` is set.
///
/// # Safety
///
/// Same requirement as [`duplicate`]: the calling process must be single-threaded.
pub unsafe fn run_fork_demo(wait: bool) -> Result<i32> {
    let (branch, line) = identify(duplicate(), getpid())?;

    match branch {
        Branch::Child => {
            println!("{}", line);
            exit_immediately(0);
        }
        Branch::Parent { child } => {
            debug!("forked child {}", child);
            println!("{}", line);

            if !wait {
                return Ok(0);
            }
            let outcome = reap(child)?;
            log_outcome(child, &outcome);
            Ok(outcome.exit_code())
        }
    }
}
