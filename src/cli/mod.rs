// ABOUTME: CLI argument parsing for codex-headless
//
// One flat command: an optional prompt, the mode selector, flags mirrored
// from `codex exec`, wrapper-specific flags, and raw extra arguments after `--`.

pub mod run;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::agent::{AgentBinary, LocalProvider, RunConfig, SandboxPolicy};

/// Exit code for a missing codex binary or tmux
pub const EXIT_NOT_FOUND: u8 = 2;

/// Exit code when session-exec mode cannot start its command
pub const EXIT_EXEC_FAILED: u8 = 127;

/// Run OpenAI Codex reliably on macOS (headless or interactive via tmux)
#[derive(Parser, Debug)]
#[command(name = "codex-headless")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Prompt text for codex exec
    pub prompt: Option<String>,

    /// Execution mode: 'headless' uses codex exec, 'interactive' uses tmux
    #[arg(long, value_enum, default_value = "headless")]
    pub mode: Mode,

    /// Model to use (e.g. o4-mini, codex-mini-latest)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sandbox policy for shell commands
    #[arg(short, long, value_enum)]
    pub sandbox: Option<SandboxPolicy>,

    /// Convenience: auto-approve + workspace-write sandbox
    #[arg(long)]
    pub full_auto: bool,

    /// Configuration profile from config.toml
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Working directory for the agent
    #[arg(long = "cd", short = 'C')]
    pub cd: Option<PathBuf>,

    /// Attach image(s) to the initial prompt (can be repeated)
    #[arg(short = 'i', long = "image")]
    pub images: Vec<PathBuf>,

    /// Print events to stdout as JSONL
    #[arg(long = "json")]
    pub json_output: bool,

    /// Write last agent message to this file
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Path to JSON Schema for structured final response
    #[arg(long)]
    pub output_schema: Option<PathBuf>,

    /// Run without persisting session files
    #[arg(long)]
    pub ephemeral: bool,

    /// Allow running outside a Git repository
    #[arg(long)]
    pub skip_git_repo_check: bool,

    /// Additional writable directories (can be repeated)
    #[arg(long = "add-dir")]
    pub add_dirs: Vec<PathBuf>,

    /// Skip all prompts and sandboxing (use with extreme caution)
    #[arg(long)]
    pub yolo: bool,

    /// Use an open-source provider
    #[arg(long)]
    pub oss: bool,

    /// Local provider to use
    #[arg(long, value_enum)]
    pub local_provider: Option<LocalProvider>,

    /// Color settings for output
    #[arg(long)]
    pub color: Option<String>,

    /// Run in background (non-blocking). Returns immediately with PID and log path
    #[arg(long, visible_alias = "bg")]
    pub background: bool,

    /// Directory for background log files [default: ~/.claude/logs/headless]
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Path to codex binary
    #[arg(long, env = "CODEX_BIN")]
    pub codex_bin: Option<PathBuf>,

    /// Send a desktop notification on completion
    #[arg(long)]
    pub notify: bool,

    /// Copy output to the clipboard
    #[arg(long)]
    pub clipboard: bool,

    /// tmux session name [default: codex]
    #[arg(long)]
    pub tmux_session: Option<String>,

    /// Wait N seconds then print a tmux output snapshot
    #[arg(long, default_value_t = 0)]
    pub interactive_wait_s: u64,

    /// Delay (ms) between sending lines in interactive mode [default: 800]
    #[arg(long)]
    pub interactive_send_delay_ms: Option<u64>,

    /// Extra args passed to codex (after --)
    #[arg(last = true)]
    pub extra: Vec<String>,

    /// Watcher mode: wait for this PID to exit, then notify
    #[arg(long, hide = true)]
    pub watch_pid: Option<u32>,

    /// Watcher mode poll interval
    #[arg(long, hide = true)]
    pub watch_interval_ms: Option<u64>,

    /// Session-exec mode: start a new session, then exec the args after `--`
    #[arg(long, hide = true)]
    pub session_exec: bool,
}

/// Execution mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[default]
    Headless,
    Interactive,
}

impl Cli {
    /// Build the run configuration forwarded to the agent
    pub fn run_config(&self, agent: AgentBinary) -> RunConfig {
        RunConfig {
            model: self.model.clone(),
            sandbox: self.sandbox,
            full_auto: self.full_auto,
            profile: self.profile.clone(),
            cd: self.cd.clone(),
            images: self.images.clone(),
            json_output: self.json_output,
            output_file: self.output_file.clone(),
            output_schema: self.output_schema.clone(),
            ephemeral: self.ephemeral,
            skip_git_repo_check: self.skip_git_repo_check,
            add_dirs: self.add_dirs.clone(),
            yolo: self.yolo,
            oss: self.oss,
            local_provider: self.local_provider,
            color: self.color.clone(),
            extra: self.extra.clone(),
            prompt: self.prompt.clone(),
            ..RunConfig::new(agent)
        }
    }
}
