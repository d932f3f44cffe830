// ABOUTME: Detached background runs with output redirected to a timestamped log file
//
// The child leaves the wrapper's terminal session with stdin closed and
// stdout/stderr appended to the log, so it survives the wrapper exiting and
// can never be stopped by job control on the caller's tty. Nothing waits on
// it; callers get the PID and log path back immediately.
//
// A new session needs setsid(2) between fork and exec. Instead of a pre_exec
// hook the wrapper binary is launched in its hidden session-exec mode, which
// calls setsid and then execs the real command in place, keeping the PID.

use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::info;

use super::pty::PtyShim;
use super::ProcessError;

/// Hidden flag that switches the wrapper binary into session-exec mode
pub const SESSION_EXEC_FLAG: &str = "--session-exec";

/// How a background child is cut loose from the wrapper's terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detach {
    /// Launch through this wrapper binary in session-exec mode (new session)
    NewSession(PathBuf),
    /// New process group only; the controlling terminal stays shared
    ProcessGroup,
}

impl Detach {
    /// New session through the running executable, when it can be located
    pub fn from_current_exe() -> Self {
        match std::env::current_exe() {
            Ok(exe) => Self::NewSession(exe),
            Err(e) => {
                tracing::warn!("Cannot locate own binary, background run keeps the session: {}", e);
                Self::ProcessGroup
            }
        }
    }

    /// Full argument vector that starts `argv` with this detachment
    pub fn wrap(&self, argv: &[String]) -> Vec<String> {
        match self {
            Self::NewSession(launcher) => {
                let mut wrapped = Vec::with_capacity(argv.len() + 3);
                wrapped.push(launcher.to_string_lossy().into_owned());
                wrapped.push(SESSION_EXEC_FLAG.to_string());
                wrapped.push("--".to_string());
                wrapped.extend(argv.iter().cloned());
                wrapped
            }
            Self::ProcessGroup => argv.to_vec(),
        }
    }
}

/// Become a session leader, then replace the current process with `argv`
///
/// Only returns if either step fails.
pub fn exec_in_new_session(argv: &[String]) -> ProcessError {
    let Some((program, args)) = argv.split_first() else {
        return ProcessError::EmptyCommand;
    };

    if let Err(errno) = nix::unistd::setsid() {
        return ProcessError::Io(errno.into());
    }

    let source = Command::new(program).args(args).exec();
    ProcessError::Spawn {
        program: program.clone(),
        source,
    }
}

/// A detached run started by [`spawn_detached`]
#[derive(Debug, Clone)]
pub struct BackgroundJob {
    pub pid: u32,
    pub log_path: PathBuf,
    pub started_at: DateTime<Local>,
    /// PID of the completion watcher, when notifications were requested
    pub watcher_pid: Option<u32>,
}

impl BackgroundJob {
    /// Record the watcher process observing this job
    #[must_use]
    pub fn with_watcher(mut self, watcher_pid: u32) -> Self {
        self.watcher_pid = Some(watcher_pid);
        self
    }

    /// Ready-to-paste command that follows the log
    pub fn tail_command(&self) -> String {
        format!("tail -f {}", quote(&self.log_path.to_string_lossy()))
    }

    /// Ready-to-paste command that stops the job
    pub fn kill_command(&self) -> String {
        format!("kill {}", self.pid)
    }

    /// Operator-facing summary printed after the job starts
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Background process started:".to_string(),
            format!("  PID:  {}", self.pid),
            format!("  Log:  {}", self.log_path.display()),
            format!("  Tail: {}", self.tail_command()),
            format!("  Stop: {}", self.kill_command()),
        ];
        if let Some(watcher) = self.watcher_pid {
            lines.push(format!("  Notify watcher PID: {watcher}"));
        }
        lines.join("\n")
    }
}

fn quote(word: &str) -> String {
    shell_escape::unix::escape(Cow::Borrowed(word)).into_owned()
}

/// Shell-quoted rendering of an argument vector
pub fn quote_command(argv: &[String]) -> String {
    argv.iter().map(|arg| quote(arg)).collect::<Vec<_>>().join(" ")
}

/// Log file name for a run started at `started_at`
pub fn log_file_name(started_at: &DateTime<Local>) -> String {
    format!("codex-{}.log", started_at.format("%Y%m%d-%H%M%S"))
}

/// Three header lines plus a blank line, written before the child's output
pub fn log_header(argv: &[String], started_at: &DateTime<Local>, cwd: &Path) -> String {
    format!(
        "# Command: {}\n# Started: {}\n# CWD: {}\n\n",
        quote_command(argv),
        started_at.format("%Y-%m-%d %H:%M:%S"),
        cwd.display()
    )
}

/// Create the log file, adding a numeric suffix if a run in the same second already claimed the name
fn create_log_file(log_dir: &Path, started_at: &DateTime<Local>) -> Result<(PathBuf, File), ProcessError> {
    let base = log_file_name(started_at);
    let stem = base.trim_end_matches(".log");

    for attempt in 0..100u32 {
        let name = if attempt == 0 {
            base.clone()
        } else {
            format!("{stem}-{attempt}.log")
        };
        let path = log_dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(ProcessError::LogFile { path, source }),
        }
    }

    Err(ProcessError::LogFile {
        path: log_dir.join(base),
        source: io::Error::new(io::ErrorKind::AlreadyExists, "too many runs in the same second"),
    })
}

/// Start `argv` fully detached, returning without waiting for it
///
/// Steps:
/// 1. Ensure `log_dir` exists
/// 2. Create `codex-YYYYmmdd-HHMMSS.log` and write the header
/// 3. Spawn the (optionally PTY-wrapped) command detached as `detach` says,
///    stdin from /dev/null, stdout and stderr appended to the log
pub fn spawn_detached(
    argv: &[String],
    cwd: Option<&Path>,
    log_dir: &Path,
    shim: &PtyShim,
    detach: &Detach,
) -> Result<BackgroundJob, ProcessError> {
    if argv.is_empty() {
        return Err(ProcessError::EmptyCommand);
    }
    let full = detach.wrap(&shim.wrap(argv));
    let (program, args) = full.split_first().ok_or(ProcessError::EmptyCommand)?;

    fs::create_dir_all(log_dir).map_err(|source| ProcessError::LogFile {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let started_at = Local::now();
    let (log_path, mut log_file) = create_log_file(log_dir, &started_at)?;

    let header_cwd = match cwd {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    log_file
        .write_all(log_header(argv, &started_at, &header_cwd).as_bytes())
        .and_then(|()| log_file.flush())
        .map_err(|source| ProcessError::LogFile {
            path: log_path.clone(),
            source,
        })?;

    let stderr_file = log_file.try_clone()?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log_file))
        .stderr(Stdio::from(stderr_file));
    if *detach == Detach::ProcessGroup {
        cmd.process_group(0);
    }
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;

    let pid = child.id();
    info!("Started background process {} logging to {}", pid, log_path.display());

    Ok(BackgroundJob {
        pid,
        log_path,
        started_at,
        watcher_pid: None,
    })
}
