use std::ffi::NulError;

use nix::errno::Errno;
use nix::unistd::Pid;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("failed to create child process: {0}")]
    Fork(#[source] Errno),

    #[error("failed to execute {path}: {source}")]
    Exec { path: String, source: Errno },

    #[error("argument {0:?} contains an interior NUL byte")]
    NulByte(String, #[source] NulError),

    #[error("failed to wait for child {pid}: {source}")]
    Wait { pid: Pid, source: Errno },
}

pub type Result<T> = std::result::Result<T, DemoError>;
