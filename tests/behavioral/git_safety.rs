// ABOUTME: Behavioral tests for the git repository safety default

use super::fixtures::{git_available, TestRepo};
use anyhow::Result;
use codex_headless::agent::{AgentBinary, RunConfig};
use codex_headless::git::is_inside_work_tree;
use std::path::PathBuf;
use tempfile::TempDir;

fn config_for(dir: PathBuf) -> RunConfig {
    RunConfig {
        cd: Some(dir),
        prompt: Some("task".to_string()),
        ..RunConfig::new(AgentBinary::Direct(PathBuf::from("codex")))
    }
}

#[test]
fn test_outside_repository_adds_skip_flag() -> Result<()> {
    let dir = TempDir::new()?;
    let inside = is_inside_work_tree(dir.path());
    assert!(!inside);

    let args = config_for(dir.path().to_path_buf())
        .with_repo_check(inside)
        .headless_args();
    assert!(args.contains(&"--skip-git-repo-check".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("task"));
    Ok(())
}

#[test]
fn test_inside_repository_keeps_codex_check() -> Result<()> {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return Ok(());
    }
    let repo = TestRepo::new()?;
    let nested = repo.subdir("crates/core")?;

    for dir in [repo.path().to_path_buf(), nested] {
        let inside = is_inside_work_tree(&dir);
        assert!(inside, "{} should be inside the work tree", dir.display());

        let args = config_for(dir).with_repo_check(inside).headless_args();
        assert!(!args.contains(&"--skip-git-repo-check".to_string()));
    }
    Ok(())
}

#[test]
fn test_explicit_skip_is_never_duplicated() -> Result<()> {
    let dir = TempDir::new()?;
    let config = RunConfig {
        skip_git_repo_check: true,
        ..config_for(dir.path().to_path_buf())
    };
    assert!(!config.needs_repo_check_skip(false));

    let args = config.with_repo_check(false).headless_args();
    let count = args.iter().filter(|a| *a == "--skip-git-repo-check").count();
    assert_eq!(count, 1);
    Ok(())
}
