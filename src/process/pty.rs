// ABOUTME: Runs a command under the BSD script(1) pseudo-terminal shim
//
// codex can hang when stdin/stdout are not a terminal. `script` fabricates
// one. Only the BSD form is ever produced:
//
//   script -q /dev/null cmd arg1 arg2 ...
//
// The GNU form (`script -q -c "cmd ..." /dev/null`) takes a single shell
// string and is not used; on non-BSD platforms commands run directly.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::{exit_code, ProcessError};
use crate::agent::SearchEnv;

/// Name of the pseudo-terminal shim
pub const SCRIPT_BINARY: &str = "script";

/// Whether commands are wrapped in the pseudo-terminal shim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PtyShim {
    /// Wrap with BSD `script` at this path
    Bsd(PathBuf),
    /// Run commands directly
    Disabled,
}

/// Whether this target ships the BSD `script` accepting `script -q file cmd...`
///
/// util-linux `script` only takes a command through `-c`, so it is never used.
pub const BSD_SCRIPT_PLATFORM: bool = cfg!(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
));

impl PtyShim {
    /// Use `script` from the search path on BSD-family platforms
    pub fn detect(env: &SearchEnv) -> Self {
        Self::detect_for(env, BSD_SCRIPT_PLATFORM)
    }

    /// Shim selection for a platform with or without BSD `script`
    pub fn detect_for(env: &SearchEnv, bsd_platform: bool) -> Self {
        if !bsd_platform {
            return Self::Disabled;
        }
        env.find(SCRIPT_BINARY).map_or(Self::Disabled, Self::Bsd)
    }

    /// Prefix `argv` with the shim invocation
    pub fn wrap(&self, argv: &[String]) -> Vec<String> {
        match self {
            Self::Bsd(script) => {
                let mut wrapped = Vec::with_capacity(argv.len() + 3);
                wrapped.push(script.to_string_lossy().into_owned());
                wrapped.push("-q".to_string());
                wrapped.push("/dev/null".to_string());
                wrapped.extend(argv.iter().cloned());
                wrapped
            }
            Self::Disabled => argv.to_vec(),
        }
    }
}

/// Output of a run whose streams were captured
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

fn command_for(shim: &PtyShim, argv: &[String], cwd: Option<&Path>) -> Result<Command, ProcessError> {
    let full = shim.wrap(argv);
    let (program, args) = full.split_first().ok_or(ProcessError::EmptyCommand)?;

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    Ok(cmd)
}

fn program_name(argv: &[String]) -> String {
    argv.first().cloned().unwrap_or_default()
}

/// Run `argv` to completion with inherited standard streams
///
/// Blocks until the child exits and returns its exit code unchanged.
pub async fn run(shim: &PtyShim, argv: &[String], cwd: Option<&Path>) -> Result<i32, ProcessError> {
    let mut cmd = command_for(shim, argv, cwd)?;
    info!("Running {} (pty shim: {:?})", program_name(argv), shim);

    let status = cmd.status().await.map_err(|source| ProcessError::Spawn {
        program: program_name(argv),
        source,
    })?;

    let code = exit_code(status);
    debug!("{} exited with {}", program_name(argv), code);
    Ok(code)
}

/// Run `argv` to completion capturing stdout and stderr
///
/// Captured output is echoed to the wrapper's own streams once the child exits.
pub async fn run_captured(
    shim: &PtyShim,
    argv: &[String],
    cwd: Option<&Path>,
) -> Result<CapturedOutput, ProcessError> {
    let mut cmd = command_for(shim, argv, cwd)?;
    cmd.stdin(Stdio::null());
    info!("Running {} with captured output", program_name(argv));

    let output = cmd.output().await.map_err(|source| ProcessError::Spawn {
        program: program_name(argv),
        source,
    })?;

    let captured = CapturedOutput {
        code: exit_code(output.status),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    tokio::io::stdout().write_all(captured.stdout.as_bytes()).await?;
    tokio::io::stdout().flush().await?;
    if !captured.stderr.is_empty() {
        tokio::io::stderr().write_all(captured.stderr.as_bytes()).await?;
    }

    Ok(captured)
}
