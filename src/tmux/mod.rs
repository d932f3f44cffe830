// ABOUTME: Tmux session management for interactive codex runs
//
// This module provides:
// - The Multiplexer trait, the seam between the session driver and tmux
// - TmuxCli, the production implementation shelling out to `tmux`
// - Pane capture options for snapshots and text polling
// - SessionDriver, which bootstraps a session and feeds it the prompt

pub mod capture;
pub mod client;
pub mod session;

pub use capture::CaptureOptions;
pub use client::TmuxCli;
pub use session::{SessionDriver, SessionSettings};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TmuxError {
    #[error("tmux not found. Install via: brew install tmux")]
    NotFound,

    #[error("Failed to run tmux {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tmux {command} failed (exit {code}): {stderr}")]
    Command {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// The subset of tmux the session driver relies on
///
/// Every call addresses a session by name or a pane by target
/// (`session:window.pane`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Multiplexer: Send + Sync {
    /// Kill a session; a missing session is reported as an error the caller may ignore
    async fn kill_session(&self, session: &str) -> Result<(), TmuxError>;

    /// Create a detached session with a single named window
    async fn new_session(&self, session: &str, window: &str) -> Result<(), TmuxError>;

    /// Type `text` into the pane as literal keystrokes
    async fn send_literal(&self, target: &str, text: &str) -> Result<(), TmuxError>;

    /// Press Enter in the pane
    async fn send_enter(&self, target: &str) -> Result<(), TmuxError>;

    /// Capture pane scrollback as plain text
    async fn capture_pane(&self, target: &str, options: &CaptureOptions) -> Result<String, TmuxError>;
}
