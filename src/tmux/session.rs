// ABOUTME: Interactive codex session driver over a single named tmux session
//
// Lifecycle:
// - Bootstrap: kill any session with the same name, create a fresh detached
//   one, type `cd <dir> && <codex ...>` into its pane and press Enter, then
//   give the TUI time to render
// - Prompt feed: type each non-blank prompt line followed by Enter, pausing
//   between lines so the TUI does not drop or interleave input
// - Observation: optionally wait, then capture a one-shot snapshot
//
// The session is left running when the wrapper exits.

use std::borrow::Cow;
use std::path::Path;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

use super::capture::{CaptureOptions, SNAPSHOT_LINES};
use super::{Multiplexer, TmuxError};

/// Session name used when none is configured
pub const DEFAULT_SESSION_NAME: &str = "codex";

/// Name of the single window created in the session
pub const AGENT_WINDOW_NAME: &str = "codex";

/// Time given to the agent TUI to start before any prompt is typed
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Pause after each prompt line
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_millis(800);

/// Floor for the interval between captures in [`SessionDriver::wait_for_text`]
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Timing and naming for one interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub name: String,
    pub settle_delay: Duration,
    pub send_delay: Duration,
    /// Wait before the snapshot; zero disables the snapshot
    pub snapshot_wait: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_NAME.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            send_delay: DEFAULT_SEND_DELAY,
            snapshot_wait: Duration::ZERO,
        }
    }
}

/// Shell line typed into the pane to start the agent
pub fn launch_line(work_dir: &Path, argv: &[String]) -> String {
    let dir = work_dir.to_string_lossy();
    let command = argv
        .iter()
        .map(|arg| shell_escape::unix::escape(Cow::Borrowed(arg.as_str())))
        .collect::<Vec<_>>()
        .join(" ");
    format!("cd {} && {}", shell_escape::unix::escape(dir), command)
}

/// Non-blank lines of a prompt, in order
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn prompt_lines(prompt: &str) -> impl Iterator<Item = &str> {
    prompt
        .split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty())
}

/// Drives one named session through a [`Multiplexer`]
pub struct SessionDriver<M> {
    mux: M,
    settings: SessionSettings,
    target: String,
}

impl<M: Multiplexer> SessionDriver<M> {
    pub fn new(mux: M, settings: SessionSettings) -> Self {
        let target = format!("{}:0.0", settings.name);
        Self {
            mux,
            settings,
            target,
        }
    }

    /// Session name
    pub fn name(&self) -> &str {
        &self.settings.name
    }

    /// Pane target, `<name>:0.0`
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Recreate the session and start the agent in it
    ///
    /// Failing to kill a previous session is expected (there usually is none).
    /// Every later tmux failure aborts the bootstrap.
    pub async fn bootstrap(&self, work_dir: &Path, launch_argv: &[String]) -> Result<(), TmuxError> {
        if let Err(e) = self.mux.kill_session(self.name()).await {
            debug!("No previous session '{}' to kill: {}", self.name(), e);
        }

        self.mux.new_session(self.name(), AGENT_WINDOW_NAME).await?;
        info!("Created tmux session: {}", self.name());

        let launch = launch_line(work_dir, launch_argv);
        self.mux.send_literal(&self.target, &launch).await?;
        self.mux.send_enter(&self.target).await?;
        info!("Launched agent in {}", self.target);

        pause(self.settings.settle_delay).await;
        Ok(())
    }

    /// Type each non-blank prompt line followed by Enter
    ///
    /// Returns the number of lines sent.
    pub async fn feed_prompt(&self, prompt: &str) -> Result<usize, TmuxError> {
        let mut sent = 0;
        for line in prompt_lines(prompt) {
            self.mux.send_literal(&self.target, line).await?;
            self.mux.send_enter(&self.target).await?;
            sent += 1;
            pause(self.settings.send_delay).await;
        }

        debug!("Sent {} prompt line(s) to {}", sent, self.target);
        Ok(sent)
    }

    /// Capture the last 200 lines of the pane
    pub async fn capture(&self) -> Result<String, TmuxError> {
        self.mux
            .capture_pane(&self.target, &CaptureOptions::last_lines(SNAPSHOT_LINES))
            .await
    }

    /// Wait the configured snapshot delay, then capture once
    ///
    /// Returns `None` when snapshots are disabled or the capture fails.
    pub async fn snapshot(&self) -> Option<String> {
        if self.settings.snapshot_wait.is_zero() {
            return None;
        }

        sleep(self.settings.snapshot_wait).await;
        match self.capture().await {
            Ok(content) => Some(content),
            Err(e) => {
                warn!("Failed to capture snapshot of {}: {}", self.target, e);
                None
            }
        }
    }

    /// Poll the pane until `pattern` appears or `timeout` elapses
    ///
    /// Capture failures count as "not found yet". One last capture is always
    /// taken at the deadline, so text that shows up on the final poll is seen.
    /// `interval` is raised to at least [`MIN_POLL_INTERVAL`].
    pub async fn wait_for_text(&self, pattern: &str, timeout: Duration, interval: Duration) -> bool {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let deadline = Instant::now() + timeout;
        let options = CaptureOptions::last_lines(SNAPSHOT_LINES);

        loop {
            match self.mux.capture_pane(&self.target, &options).await {
                Ok(content) if content.contains(pattern) => return true,
                Ok(_) => {}
                Err(e) => debug!("Capture of {} failed while polling: {}", self.target, e),
            }

            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            sleep(interval.min(deadline - now)).await;
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}
