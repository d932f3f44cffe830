// ABOUTME: Completion watcher for detached background runs
//
// The watcher is its own detached process (this binary re-invoked with the
// hidden --watch-pid flag). It polls the watched PID with signal 0 at a fixed
// interval and fires a desktop notification once the PID is gone. A
// notification can therefore arrive up to one interval after the real exit.

use nix::errno::Errno;
use nix::sys::signal;
use nix::unistd::Pid;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::{debug, info};

use super::ProcessError;
use crate::desktop::{Notifier, NOTIFICATION_TITLE};

/// Default liveness poll interval
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// Check whether a process still exists
///
/// EPERM means the process exists but belongs to someone else, so only ESRCH
/// counts as gone.
pub fn is_alive(pid: u32) -> bool {
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    !matches!(signal::kill(Pid::from_raw(raw), None), Err(Errno::ESRCH))
}

/// Message sent when a watched job finishes
pub fn finished_message(pid: u32) -> String {
    format!("Background task finished (PID {pid})")
}

/// Poll `pid` every `interval` until it exits, then notify
pub async fn watch_until_exit(pid: u32, interval: Duration, notifier: &dyn Notifier) {
    debug!("Watching PID {} every {:?}", pid, interval);
    while is_alive(pid) {
        tokio::time::sleep(interval).await;
    }

    info!("Watched process {} exited", pid);
    notifier.notify(NOTIFICATION_TITLE, &finished_message(pid)).await;
}

/// Launch a detached watcher process for `pid`
///
/// `exe` is the wrapper binary; it is re-invoked in watcher mode with all
/// standard streams closed and its own process group.
pub fn spawn_watcher(exe: &Path, pid: u32, interval: Duration) -> Result<u32, ProcessError> {
    let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);

    let child = Command::new(exe)
        .args([
            "--watch-pid",
            &pid.to_string(),
            "--watch-interval-ms",
            &interval_ms.to_string(),
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: exe.display().to_string(),
            source,
        })?;

    info!("Started completion watcher {} for PID {}", child.id(), pid);
    Ok(child.id())
}
