//! Small demonstrations of the POSIX process-creation primitives.
//!
//! `fork_demo` duplicates the process and has both sides report who they are.
//! `exec_demo` forks a child that replaces its image with another program and
//! prints a diagnostic if that replacement fails.

pub mod error;
pub mod exec;
pub mod fork;
pub mod logging;
pub mod wait;

pub use error::{DemoError, Result};
