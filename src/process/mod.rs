// ABOUTME: Process execution for the wrapped agent
//
// - pty: synchronous runs through the BSD `script(1)` pseudo-terminal shim
// - background: detached runs with output redirected to a timestamped log
// - watcher: liveness polling that notifies when a detached run finishes

pub mod background;
pub mod pty;
pub mod watcher;

pub use background::{exec_in_new_session, spawn_detached, BackgroundJob, Detach};
pub use pty::{CapturedOutput, PtyShim};

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot run an empty command")]
    EmptyCommand,

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to prepare log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Map an exit status to a shell-style exit code
///
/// Signal deaths become `128 + signal`, the same convention shells use.
pub fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}
