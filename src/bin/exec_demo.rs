use anyhow::Result;
use clap::Parser;
use forkexec::exec::{run_exec_demo, ExecRequest, DEFAULT_FLAG, DEFAULT_PROGRAM};
use forkexec::logging;
use std::process;

#[derive(Parser)]
#[command(name = "exec_demo")]
#[command(about = "Fork a child that replaces itself with another program")]
struct Args {
    /// Absolute path of the program the child should become
    #[arg(short, long, default_value = DEFAULT_PROGRAM)]
    program: String,

    /// Arguments passed after the program path
    #[arg(last = true, default_values = [DEFAULT_FLAG])]
    args: Vec<String>,

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

    let request = ExecRequest::new(args.program).args(args.args);

    // Still single-threaded here: nothing above spawns threads
    let code = unsafe { run_exec_demo(&request, args.wait) }?;
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}
