// ABOUTME: Dispatch for a codex-headless invocation
//
// Resolves the agent binary, applies the git safety default, then runs
// exactly one of:
// - background headless (detached, logged, optional completion watcher)
// - foreground headless (PTY shim, optionally capturing to the clipboard)
// - interactive (tmux session bootstrap and prompt feed)

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

use super::{Cli, Mode, EXIT_EXEC_FAILED, EXIT_NOT_FOUND};
use crate::agent::{resolve_agent_binary, RunConfig, SearchEnv};
use crate::config::WrapperConfig;
use crate::desktop::{
    ClipboardWriter, DesktopNotifier, Notifier, SystemClipboard, NOTIFICATION_TITLE,
};
use crate::git;
use crate::process::{background, pty, spawn_detached, watcher, Detach, PtyShim};
use crate::tmux::capture::SNAPSHOT_LINES;
use crate::tmux::{SessionDriver, SessionSettings, TmuxCli, TmuxError};

/// Execute one wrapper invocation against the real environment and config files
pub async fn execute(args: Cli) -> Result<ExitCode> {
    execute_with(args, &WrapperConfig::load(), &SearchEnv::from_process()).await
}

/// Execute one wrapper invocation with explicit configuration and lookup environment
pub async fn execute_with(args: Cli, config: &WrapperConfig, env: &SearchEnv) -> Result<ExitCode> {
    // Step 1: Resolve the agent binary (flag / CODEX_BIN, then config, then PATH, then npx)
    let explicit = args.codex_bin.clone().or_else(|| config.codex_bin.clone());
    let Some(agent) = resolve_agent_binary(explicit.as_deref(), env) else {
        eprintln!("Error: codex binary not found.");
        eprintln!("Install: npm install -g @openai/codex");
        eprintln!("Or set CODEX_BIN=/path/to/codex");
        return Ok(ExitCode::from(EXIT_NOT_FOUND));
    };
    info!("Using agent: {}", agent);

    // Step 2: Outside a git work tree codex refuses to run unless told to skip the check
    let work_dir = match &args.cd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let inside_repo = git::is_inside_work_tree(&work_dir);
    let run_config = args.run_config(agent);
    if run_config.needs_repo_check_skip(inside_repo) {
        eprintln!(
            "Note: {} is not a Git repository. Automatically adding --skip-git-repo-check.",
            work_dir.display()
        );
    }
    let run_config = run_config.with_repo_check(inside_repo);

    let notifier = DesktopNotifier::new(env);

    // Step 3: Dispatch
    match args.mode {
        Mode::Headless if args.background => run_background(&args, config, env, &run_config),
        Mode::Headless => {
            let code = run_headless(&args, env, &run_config).await?;
            if args.notify {
                notifier.notify(NOTIFICATION_TITLE, &headless_status_message(code)).await;
            }
            Ok(exit_code_from(code))
        }
        Mode::Interactive => {
            if args.background {
                warn!("--background is ignored in interactive mode");
            }
            let code = run_interactive(&args, config, env, &run_config, &work_dir).await?;
            if args.notify && code == ExitCode::SUCCESS {
                notifier.notify(NOTIFICATION_TITLE, "Interactive session started").await;
            }
            Ok(code)
        }
    }
}

/// Watcher mode: block until `pid` exits, then notify
pub async fn watch(pid: u32, interval_ms: Option<u64>) -> Result<ExitCode> {
    let interval = interval_ms.map_or(watcher::DEFAULT_WATCH_INTERVAL, Duration::from_millis);
    let notifier = DesktopNotifier::new(&SearchEnv::from_process());
    watcher::watch_until_exit(pid, interval, &notifier).await;
    Ok(ExitCode::SUCCESS)
}

/// Session-exec mode: become a session leader and exec `argv` in place
///
/// Only returns when that fails; the error lands in the background log.
pub fn session_exec(argv: &[String]) -> ExitCode {
    let err = background::exec_in_new_session(argv);
    eprintln!("Error: {err}");
    ExitCode::from(EXIT_EXEC_FAILED)
}

/// Notification text after a foreground headless run
pub fn headless_status_message(code: i32) -> String {
    if code == 0 {
        "Headless task completed".to_string()
    } else {
        format!("Headless task failed (exit {code})")
    }
}

/// Convert a child exit code into the wrapper's own exit code
pub fn exit_code_from(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn run_background(
    args: &Cli,
    config: &WrapperConfig,
    env: &SearchEnv,
    run_config: &RunConfig,
) -> Result<ExitCode> {
    let log_dir = args.log_dir.clone().unwrap_or_else(|| config.log_dir());
    let shim = PtyShim::detect(env);

    let mut job = spawn_detached(
        &run_config.headless_args(),
        run_config.work_dir(),
        &log_dir,
        &shim,
        &Detach::from_current_exe(),
    )
    .context("Failed to start background run")?;

    if args.notify {
        match std::env::current_exe() {
            Ok(exe) => match watcher::spawn_watcher(&exe, job.pid, config.watch_interval()) {
                Ok(watcher_pid) => job = job.with_watcher(watcher_pid),
                Err(e) => warn!("Completion notifications disabled: {}", e),
            },
            Err(e) => warn!("Completion notifications disabled, cannot locate own binary: {}", e),
        }
    }

    println!("{}", job.summary());
    Ok(ExitCode::SUCCESS)
}

async fn run_headless(args: &Cli, env: &SearchEnv, run_config: &RunConfig) -> Result<i32> {
    let shim = PtyShim::detect(env);
    let argv = run_config.headless_args();

    if args.clipboard {
        let output = pty::run_captured(&shim, &argv, run_config.work_dir())
            .await
            .context("Failed to run codex")?;
        SystemClipboard.write_text(&output.stdout);
        return Ok(output.code);
    }

    pty::run(&shim, &argv, run_config.work_dir())
        .await
        .context("Failed to run codex")
}

/// Session settings from flags, falling back to config and built-in defaults
fn session_settings(args: &Cli, config: &WrapperConfig) -> SessionSettings {
    SessionSettings {
        name: args.tmux_session.clone().unwrap_or_else(|| config.tmux_session()),
        settle_delay: config.settle_delay(),
        send_delay: args
            .interactive_send_delay_ms
            .map_or_else(|| config.send_delay(), Duration::from_millis),
        snapshot_wait: Duration::from_secs(args.interactive_wait_s),
    }
}

async fn run_interactive(
    args: &Cli,
    config: &WrapperConfig,
    env: &SearchEnv,
    run_config: &RunConfig,
    work_dir: &Path,
) -> Result<ExitCode> {
    let tmux = match TmuxCli::detect(env) {
        Ok(tmux) => tmux,
        Err(e @ TmuxError::NotFound) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::from(EXIT_NOT_FOUND));
        }
        Err(e) => return Err(e.into()),
    };

    let driver = SessionDriver::new(tmux, session_settings(args, config));

    driver
        .bootstrap(work_dir, &run_config.interactive_args())
        .await
        .context("Failed to start codex in tmux")?;

    if let Some(prompt) = run_config.prompt_text() {
        driver
            .feed_prompt(prompt)
            .await
            .context("Failed to send prompt to tmux")?;
    }

    let session = quote(driver.name());
    println!("Interactive Codex started in tmux session: {}", driver.name());
    println!("  Attach:   tmux attach -t {session}");
    println!(
        "  Snapshot: tmux capture-pane -p -J -t {} -S -{SNAPSHOT_LINES}",
        quote(driver.target())
    );

    if let Some(snapshot) = driver.snapshot().await {
        println!("\n--- tmux snapshot (last {SNAPSHOT_LINES} lines) ---\n");
        println!("{snapshot}");
    }

    Ok(ExitCode::SUCCESS)
}

fn quote(word: &str) -> String {
    shell_escape::unix::escape(std::borrow::Cow::Borrowed(word)).into_owned()
}
