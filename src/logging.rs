use std::io::Write;

use env_logger::{Builder, Env};
use nix::unistd::getpid;

/// Environment variable holding an env_logger filter, e.g. `FORKEXEC_LOG=debug`.
pub const LOG_ENV: &str = "FORKEXEC_LOG";

fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Sets up stderr logging. Every record carries the pid of the process that
/// emitted it, since parent and child share the same stream after a fork.
pub fn init(verbosity: u8) {
    let env = Env::default().filter_or(LOG_ENV, default_filter(verbosity));
    let _ = Builder::from_env(env)
        .format(|buf, record| {
            writeln!(buf, "[{} {}] {}", getpid(), record.level(), record.args())
        })
        .try_init();
}
