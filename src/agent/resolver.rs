// ABOUTME: Locates the codex executable from an explicit path, the search path, or npx
//
// Lookups go through SearchEnv instead of reading PATH directly so tests can
// supply their own directories without mutating process state.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Executable name searched for on the search path
pub const AGENT_BINARY_NAME: &str = "codex";

/// Package runner used when codex is not installed globally
pub const PACKAGE_RUNNER_NAME: &str = "npx";

/// npm package that provides the codex CLI
pub const AGENT_PACKAGE: &str = "@openai/codex";

/// Snapshot of the environment used for executable lookups
#[derive(Debug, Clone, Default)]
pub struct SearchEnv {
    /// Search path in `PATH` format, `None` disables searching
    pub path: Option<OsString>,
    /// Directory relative entries in the search path are resolved against
    pub cwd: PathBuf,
}

impl SearchEnv {
    /// Capture the current process `PATH` and working directory
    pub fn from_process() -> Self {
        Self {
            path: env::var_os("PATH"),
            cwd: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Build a search environment over a fixed list of directories
    pub fn with_dirs(dirs: &[PathBuf]) -> Self {
        Self {
            path: env::join_paths(dirs).ok(),
            cwd: PathBuf::from("/"),
        }
    }

    /// Find an executable by name, returning its full path
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        which::which_in(name, Some(path), &self.cwd).ok()
    }
}

/// How the agent is launched once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentBinary {
    /// A codex executable, invoked directly
    Direct(PathBuf),
    /// The npx package runner, invoked as `npx -y @openai/codex`
    PackageRunner(PathBuf),
}

impl AgentBinary {
    /// Path of the program that is actually executed
    pub fn program(&self) -> &Path {
        match self {
            Self::Direct(path) | Self::PackageRunner(path) => path,
        }
    }

    /// Leading words of every agent argument vector
    pub fn invocation(&self) -> Vec<String> {
        let program = self.program().to_string_lossy().into_owned();
        match self {
            Self::Direct(_) => vec![program],
            Self::PackageRunner(_) => vec![program, "-y".to_string(), AGENT_PACKAGE.to_string()],
        }
    }
}

impl fmt::Display for AgentBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.invocation().join(" "))
    }
}

/// Resolve the agent binary
///
/// Priority:
/// 1. `explicit`, verbatim, if it exists on disk
/// 2. `codex` on the search path
/// 3. `npx` on the search path
///
/// Returns `None` when nothing matches; callers treat that as fatal.
pub fn resolve_agent_binary(explicit: Option<&Path>, env: &SearchEnv) -> Option<AgentBinary> {
    if let Some(candidate) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        if candidate.exists() {
            return Some(AgentBinary::Direct(candidate.to_path_buf()));
        }
        tracing::debug!(
            "Explicit codex path {} does not exist, searching PATH",
            candidate.display()
        );
    }

    if let Some(found) = env.find(AGENT_BINARY_NAME) {
        return Some(AgentBinary::Direct(found));
    }

    env.find(PACKAGE_RUNNER_NAME).map(AgentBinary::PackageRunner)
}
