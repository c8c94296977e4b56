use std::ffi::CString;

use forkexec::exec::{failure_line, replace_image, ExecRequest};
use forkexec::fork::{branch_from_fork, identify, identity_line, Branch, Role};
use forkexec::wait::ChildOutcome;
use forkexec::DemoError;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::WaitStatus;
use nix::unistd::{ForkResult, Pid};

#[test]
fn test_default_request_is_ls_long() {
    let argv = ExecRequest::default().argv().expect("Default argv should encode");
    let argv: Vec<&str> = argv.iter().map(|a| a.to_str().unwrap()).collect();
    assert_eq!(argv, vec!["/bin/ls", "-l"]);
}

#[test]
fn test_argv_puts_program_first() {
    let request = ExecRequest::new("/usr/bin/env").arg("-i").args(["FOO=bar", "true"]);
    let argv = request.argv().expect("argv should encode");

    assert_eq!(request.program(), "/usr/bin/env");
    assert_eq!(argv[0].to_str().unwrap(), "/usr/bin/env");
    assert_eq!(argv.len(), 4);
    assert_eq!(argv[3].to_str().unwrap(), "true");
}

#[test]
fn test_argv_rejects_interior_nul() {
    let err = ExecRequest::new("/bin/ls").arg("a\0b").argv().unwrap_err();
    match err {
        DemoError::NulByte(arg, _) => assert_eq!(arg, "a\0b"),
        other => panic!("Expected NulByte, got {:?}", other),
    }
}

#[test]
fn test_failed_fork_is_reported_without_identity_line() {
    let forked = branch_from_fork(Err(Errno::EAGAIN));
    let err = identify(forked, Pid::from_raw(100)).unwrap_err();

    assert!(matches!(err, DemoError::Fork(Errno::EAGAIN)));
    assert!(
        err.to_string().starts_with("failed to create child process"),
        "Unexpected message: {}",
        err
    );
}

#[test]
fn test_successful_fork_yields_identity_line() {
    let forked = branch_from_fork(Ok(ForkResult::Parent { child: Pid::from_raw(4242) }));
    let (branch, line) = identify(forked, Pid::from_raw(100)).expect("Should identify parent");

    assert_eq!(branch, Branch::Parent { child: Pid::from_raw(4242) });
    assert_eq!(line, "I am parent with pid 100. I got return value from fork: 4242");

    let (branch, line) = identify(branch_from_fork(Ok(ForkResult::Child)), Pid::from_raw(4242))
        .expect("Should identify child");
    assert_eq!(branch, Branch::Child);
    assert!(line.ends_with("return value from fork: 0"));
}

#[test]
fn test_replace_image_returns_on_missing_program() {
    // A failed execv returns, so this is safe to run in the test process
    let argv = [CString::new("/nonexistent/forkexec-missing").unwrap()];
    match replace_image(&argv[0], &argv) {
        DemoError::Exec { path, source } => {
            assert_eq!(path, "/nonexistent/forkexec-missing");
            assert_eq!(source, Errno::ENOENT);
        }
        other => panic!("Expected Exec error, got {:?}", other),
    }
}

#[test]
fn test_failure_line() {
    assert_eq!(failure_line("/bin/ls"), "Fails to execute /bin/ls");
}

#[test]
fn test_identity_line_format() {
    let line = identity_line(Role::Child, Pid::from_raw(4242), 0);
    assert_eq!(line, "I am child with pid 4242. I got return value from fork: 0");

    let line = identity_line(Role::Parent, Pid::from_raw(100), 4242);
    assert_eq!(line, "I am parent with pid 100. I got return value from fork: 4242");
}

#[test]
fn test_branch_return_values() {
    let parent = Branch::Parent { child: Pid::from_raw(77) };
    assert_eq!(parent.return_value(), 77);
    assert_eq!(parent.role(), Role::Parent);

    assert_eq!(Branch::Child.return_value(), 0);
    assert_eq!(Branch::Child.role(), Role::Child);
}

#[test]
fn test_child_outcome_exit_codes() {
    let pid = Pid::from_raw(42);

    let exited = ChildOutcome::from_status(WaitStatus::Exited(pid, 3)).expect("Exited is terminal");
    assert_eq!(exited, ChildOutcome::Exited(3));
    assert_eq!(exited.exit_code(), 3);
    assert!(!exited.success());

    let killed = ChildOutcome::from_status(WaitStatus::Signaled(pid, Signal::SIGKILL, false))
        .expect("Signaled is terminal");
    assert_eq!(killed.exit_code(), 137);

    // A stopped child has not ended yet
    assert_eq!(ChildOutcome::from_status(WaitStatus::Stopped(pid, Signal::SIGSTOP)), None);

    assert!(ChildOutcome::Exited(0).success());
}
