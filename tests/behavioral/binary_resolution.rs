// ABOUTME: Behavioral tests for locating the codex binary

use super::fixtures::write_executable;
use anyhow::Result;
use codex_headless::agent::{resolve_agent_binary, AgentBinary, RunConfig, SearchEnv};
use tempfile::TempDir;

#[test]
fn test_codex_on_search_path_is_used_directly() -> Result<()> {
    let bin = TempDir::new()?;
    let codex = write_executable(bin.path(), "codex", "exit 0")?;
    write_executable(bin.path(), "npx", "exit 0")?;

    let env = SearchEnv::with_dirs(&[bin.path().to_path_buf()]);
    assert_eq!(resolve_agent_binary(None, &env), Some(AgentBinary::Direct(codex)));
    Ok(())
}

#[test]
fn test_npx_fallback_runs_the_codex_package() -> Result<()> {
    let bin = TempDir::new()?;
    let npx = write_executable(bin.path(), "npx", "exit 0")?;

    let env = SearchEnv::with_dirs(&[bin.path().to_path_buf()]);
    let agent = resolve_agent_binary(None, &env).expect("npx should be found");
    assert_eq!(agent, AgentBinary::PackageRunner(npx.clone()));

    let args = RunConfig {
        prompt: Some("hello".to_string()),
        ..RunConfig::new(agent)
    }
    .headless_args();
    assert_eq!(
        args,
        vec![
            npx.to_string_lossy().into_owned(),
            "-y".to_string(),
            "@openai/codex".to_string(),
            "exec".to_string(),
            "hello".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_existing_explicit_path_wins_over_search_path() -> Result<()> {
    let bin = TempDir::new()?;
    write_executable(bin.path(), "codex", "exit 0")?;
    let custom = TempDir::new()?;
    let pinned = write_executable(custom.path(), "codex-nightly", "exit 0")?;

    let env = SearchEnv::with_dirs(&[bin.path().to_path_buf()]);
    assert_eq!(
        resolve_agent_binary(Some(&pinned), &env),
        Some(AgentBinary::Direct(pinned))
    );
    Ok(())
}

#[test]
fn test_missing_explicit_path_falls_back_to_search() -> Result<()> {
    let bin = TempDir::new()?;
    let codex = write_executable(bin.path(), "codex", "exit 0")?;

    let env = SearchEnv::with_dirs(&[bin.path().to_path_buf()]);
    let missing = bin.path().join("does-not-exist");
    assert_eq!(
        resolve_agent_binary(Some(&missing), &env),
        Some(AgentBinary::Direct(codex))
    );
    Ok(())
}

#[test]
fn test_nothing_found() -> Result<()> {
    let empty = TempDir::new()?;
    let env = SearchEnv::with_dirs(&[empty.path().to_path_buf()]);
    assert_eq!(resolve_agent_binary(None, &env), None);
    Ok(())
}

#[test]
fn test_first_search_directory_wins() -> Result<()> {
    let first = TempDir::new()?;
    let second = TempDir::new()?;
    let preferred = write_executable(first.path(), "codex", "exit 0")?;
    write_executable(second.path(), "codex", "exit 0")?;

    let env = SearchEnv::with_dirs(&[first.path().to_path_buf(), second.path().to_path_buf()]);
    assert_eq!(
        resolve_agent_binary(None, &env),
        Some(AgentBinary::Direct(preferred))
    );
    Ok(())
}
