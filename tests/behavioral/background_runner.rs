// ABOUTME: Behavioral tests for detached background runs

use super::fixtures::wait_until;
use anyhow::Result;
use codex_headless::process::watcher::is_alive;
use codex_headless::process::{spawn_detached, Detach, PtyShim};
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{getsid, Pid};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Detach through the built wrapper binary, as the CLI does
fn new_session() -> Detach {
    Detach::NewSession(PathBuf::from(env!("CARGO_BIN_EXE_codex-headless")))
}

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

fn reap(pid: u32) -> Option<WaitStatus> {
    waitpid(Pid::from_raw(pid as i32), None).ok()
}

#[test]
fn test_output_lands_in_log_after_header() -> Result<()> {
    let logs = TempDir::new()?;
    let work = TempDir::new()?;
    let command = argv(&["sh", "-c", "echo pid=$$; echo oops >&2"]);

    let job = spawn_detached(&command, Some(work.path()), logs.path(), &PtyShim::Disabled, &new_session())?;
    reap(job.pid);

    // The launcher execs in place, so `$$` is the PID handed back
    let marker = format!("pid={}", job.pid);
    assert!(
        wait_until(Duration::from_secs(5), || {
            std::fs::read_to_string(&job.log_path)
                .map(|log| log.contains(&marker) && log.contains("oops"))
                .unwrap_or(false)
        }),
        "child output should be appended to {}",
        job.log_path.display()
    );

    let log = std::fs::read_to_string(&job.log_path)?;
    let lines: Vec<&str> = log.lines().collect();
    assert!(lines[0].starts_with("# Command: sh -c "));
    assert!(lines[1].starts_with("# Started: "));
    assert_eq!(lines[2], format!("# CWD: {}", work.path().display()));
    assert_eq!(lines[3], "");

    let name = job.log_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("codex-") && name.ends_with(".log"));
    assert_eq!(job.log_path.parent(), Some(logs.path()));
    Ok(())
}

#[test]
fn test_returns_without_waiting_for_child() -> Result<()> {
    let logs = TempDir::new()?;

    let started = Instant::now();
    let job = spawn_detached(&argv(&["sleep", "5"]), None, logs.path(), &PtyShim::Disabled, &new_session())?;
    assert!(started.elapsed() < Duration::from_secs(2));

    assert!(is_alive(job.pid));
    let summary = job.summary();
    assert!(summary.starts_with("Background process started:"));
    assert!(summary.contains(&format!("kill {}", job.pid)));
    assert!(summary.contains(&job.log_path.display().to_string()));

    kill(Pid::from_raw(job.pid as i32), Signal::SIGTERM)?;
    reap(job.pid);
    assert!(!is_alive(job.pid));
    Ok(())
}

#[test]
fn test_creates_missing_log_directory() -> Result<()> {
    let root = TempDir::new()?;
    let logs = root.path().join("nested").join("logs");

    let job = spawn_detached(&argv(&["true"]), None, &logs, &PtyShim::Disabled, &new_session())?;
    reap(job.pid);

    assert!(logs.is_dir());
    assert!(job.log_path.exists());
    Ok(())
}

#[test]
fn test_same_second_runs_get_distinct_logs() -> Result<()> {
    let logs = TempDir::new()?;

    let first = spawn_detached(&argv(&["true"]), None, logs.path(), &PtyShim::Disabled, &Detach::ProcessGroup)?;
    let second = spawn_detached(&argv(&["true"]), None, logs.path(), &PtyShim::Disabled, &Detach::ProcessGroup)?;
    reap(first.pid);
    reap(second.pid);

    assert_ne!(first.log_path, second.log_path);
    Ok(())
}

#[test]
fn test_missing_program_is_reported() {
    let logs = TempDir::new().unwrap();
    let result = spawn_detached(
        &argv(&["/nonexistent/codex-headless/agent"]),
        None,
        logs.path(),
        &PtyShim::Disabled,
        &Detach::ProcessGroup,
    );
    assert!(result.is_err());
}

#[test]
fn test_child_runs_in_its_own_session() -> Result<()> {
    let logs = TempDir::new()?;
    let own_session = getsid(None)?;

    let job = spawn_detached(&argv(&["sleep", "5"]), None, logs.path(), &PtyShim::Disabled, &new_session())?;
    let pid = Pid::from_raw(job.pid as i32);

    // The launcher calls setsid before exec, so the child leads its own session
    let detached = wait_until(Duration::from_secs(5), || getsid(Some(pid)) == Ok(pid));
    let child_session = getsid(Some(pid));

    kill(pid, Signal::SIGTERM)?;
    reap(job.pid);

    assert!(detached, "child session {child_session:?} should be its own PID {pid}");
    assert_ne!(child_session?, own_session);
    Ok(())
}

#[test]
fn test_unstartable_command_in_new_session_is_logged() -> Result<()> {
    let logs = TempDir::new()?;

    // The launcher itself starts fine; the exec inside it fails
    let job = spawn_detached(
        &argv(&["/nonexistent/codex-headless/agent"]),
        None,
        logs.path(),
        &PtyShim::Disabled,
        &new_session(),
    )?;

    assert_eq!(reap(job.pid), Some(WaitStatus::Exited(Pid::from_raw(job.pid as i32), 127)));
    let log = std::fs::read_to_string(&job.log_path)?;
    assert!(log.contains("Error: Failed to start /nonexistent/codex-headless/agent"));
    Ok(())
}
