// ABOUTME: Multiplexer implementation that shells out to the tmux binary

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use super::{CaptureOptions, Multiplexer, TmuxError};
use crate::agent::SearchEnv;
use crate::process::exit_code;

/// Runs tmux subcommands; none of them has a timeout of its own
#[derive(Debug, Clone)]
pub struct TmuxCli {
    program: PathBuf,
}

impl TmuxCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate tmux on the search path
    pub fn detect(env: &SearchEnv) -> Result<Self, TmuxError> {
        env.find("tmux").map(Self::new).ok_or(TmuxError::NotFound)
    }

    /// Run a tmux subcommand, failing on non-zero exit
    async fn run<S: AsRef<str> + Sync>(&self, args: &[S]) -> Result<Output, TmuxError> {
        let args: Vec<&str> = args.iter().map(|arg| AsRef::<str>::as_ref(arg)).collect();
        let command = args.first().copied().unwrap_or_default().to_string();
        debug!("tmux {}", args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| TmuxError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TmuxError::Command {
                command,
                code: exit_code(output.status),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl Multiplexer for TmuxCli {
    async fn kill_session(&self, session: &str) -> Result<(), TmuxError> {
        self.run(&["kill-session", "-t", session]).await.map(|_| ())
    }

    async fn new_session(&self, session: &str, window: &str) -> Result<(), TmuxError> {
        self.run(&["new-session", "-d", "-s", session, "-n", window])
            .await
            .map(|_| ())
    }

    async fn send_literal(&self, target: &str, text: &str) -> Result<(), TmuxError> {
        // `--` keeps text starting with a dash from being read as a flag
        self.run(&["send-keys", "-t", target, "-l", "--", text])
            .await
            .map(|_| ())
    }

    async fn send_enter(&self, target: &str) -> Result<(), TmuxError> {
        self.run(&["send-keys", "-t", target, "Enter"]).await.map(|_| ())
    }

    async fn capture_pane(&self, target: &str, options: &CaptureOptions) -> Result<String, TmuxError> {
        let output = self.run(&options.to_args(target)).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
