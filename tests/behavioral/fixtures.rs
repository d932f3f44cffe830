// ABOUTME: Shared test fixtures and utilities for behavioral tests
//
// Provides:
// - TestRepo: Temporary git repository for testing
// - write_executable(): Drop a fake executable into a directory
// - tmux_available(): Check if tmux is installed
// - require_tmux!(): Skip test if tmux unavailable

#![allow(dead_code)]

use anyhow::Result;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Creates a temporary git repository with initial commit
pub struct TestRepo {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    /// Create a new temporary git repository with initial commit
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().to_path_buf();

        git(&path, &["init"])?;
        git(&path, &["config", "user.email", "test@test.com"])?;
        git(&path, &["config", "user.name", "Test User"])?;

        std::fs::write(path.join("README.md"), "# Test Repo\n")?;
        git(&path, &["add", "."])?;
        git(&path, &["commit", "-m", "Initial commit"])?;

        Ok(Self { dir, path })
    }

    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a nested directory inside the work tree
    pub fn subdir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.path.join(name);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

fn git(cwd: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git").args(args).current_dir(cwd).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

/// Check if git is available on the system
pub fn git_available() -> bool {
    Command::new("git")
        .args(["--version"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Write an executable shell script named `name` into `dir`
pub fn write_executable(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// Poll `check` until it returns true or `timeout` elapses
pub fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    check()
}

/// Check if tmux is available on the system
pub fn tmux_available() -> bool {
    Command::new("tmux")
        .args(["-V"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Macro to skip test if tmux is not available
#[macro_export]
macro_rules! require_tmux {
    () => {
        if !super::fixtures::tmux_available() {
            eprintln!("Skipping test: tmux not available");
            return Ok(());
        }
    };
}

/// Session name that will not collide with parallel test runs
pub fn unique_session_name(prefix: &str) -> String {
    format!("{}-{}", prefix, std::process::id())
}

/// Helper to clean up a tmux session by name
pub fn cleanup_tmux_session(name: &str) {
    let _ = Command::new("tmux")
        .args(["kill-session", "-t", name])
        .output();
}

/// Check if a tmux session exists
pub fn tmux_session_exists(name: &str) -> bool {
    Command::new("tmux")
        .args(["has-session", "-t", name])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_creation() -> Result<()> {
        if !git_available() {
            eprintln!("Skipping test: git not available");
            return Ok(());
        }
        let repo = TestRepo::new()?;
        assert!(repo.path().exists());
        assert!(repo.path().join(".git").exists());
        assert!(repo.path().join("README.md").exists());
        Ok(())
    }

    #[test]
    fn test_write_executable_sets_mode() -> Result<()> {
        let dir = TempDir::new()?;
        let path = write_executable(dir.path(), "tool", "exit 0")?;
        let mode = std::fs::metadata(&path)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        Ok(())
    }
}
