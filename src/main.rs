// ABOUTME: Main entry point for codex-headless
//
// Binary: codex-headless
// Usage: codex-headless [OPTIONS] [PROMPT] [-- EXTRA...]
// - default: headless `codex exec` through a PTY shim
// - --background: detached headless run with a log file
// - --mode interactive: codex TUI in a tmux session
// - --watch-pid (hidden): completion watcher for a background run
// - --session-exec (hidden): setsid, then exec a background command

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use codex_headless::cli::{self, Cli};
use codex_headless::config;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_logging();
    setup_panic_handler();

    let args = Cli::parse();

    if args.session_exec {
        return Ok(cli::run::session_exec(&args.extra));
    }

    match args.watch_pid {
        Some(pid) => cli::run::watch(pid, args.watch_interval_ms).await,
        None => cli::run::execute(args).await,
    }
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::path::PathBuf;
    use tracing_subscriber::prelude::*;

    let log_dir = config::state_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|| PathBuf::from(".codex-headless/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    // One JSONL file per day, shared by the wrapper and its watchers
    let log_file = log_dir.join(format!(
        "codex-headless-{}.jsonl",
        chrono::Local::now().format("%Y%m%d")
    ));

    match OpenOptions::new().create(true).append(true).open(&log_file) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_writer(file)
                        .with_ansi(false),
                )
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "codex_headless=info".into()),
                )
                .init();
        }
        Err(_) => {
            // Without a log file only warnings reach the terminal
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "codex_headless=warn".into()),
                )
                .init();
        }
    }
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
