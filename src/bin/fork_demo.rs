use anyhow::Result;
use clap::Parser;
use forkexec::{fork::run_fork_demo, logging};
use std::process;

#[derive(Parser)]
#[command(name = "fork_demo")]
#[command(about = "Fork once and have the parent and the child each report their pid")]
struct Args {
    /// Wait for the child before exiting and exit with its status
    #[arg(short, long)]
    wait: bool,

    /// Raise log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    // Still single-threaded here: nothing above spawns threads
    let code = unsafe { run_fork_demo(args.wait) }?;
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}
