// ABOUTME: RunConfig and the argument-vector builders for headless and interactive codex
//
// Each optional field maps to zero or one flag in a fixed order, repeated
// fields expand to one flag per element, and the prompt is only ever the
// last positional argument of the headless form.

use clap::ValueEnum;
use std::path::{Path, PathBuf};

use super::resolver::AgentBinary;

/// Sandbox policy for shell commands run by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SandboxPolicy {
    ReadOnly,
    WorkspaceWrite,
    DangerFullAccess,
}

impl SandboxPolicy {
    /// Value passed to `--sandbox`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::WorkspaceWrite => "workspace-write",
            Self::DangerFullAccess => "danger-full-access",
        }
    }
}

/// Local model provider for `--oss` runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LocalProvider {
    Lmstudio,
    Ollama,
}

impl LocalProvider {
    /// Value passed to `--local-provider`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lmstudio => "lmstudio",
            Self::Ollama => "ollama",
        }
    }
}

/// Everything the wrapper forwards to the agent for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub agent: AgentBinary,
    pub model: Option<String>,
    pub sandbox: Option<SandboxPolicy>,
    pub full_auto: bool,
    pub profile: Option<String>,
    pub cd: Option<PathBuf>,
    pub images: Vec<PathBuf>,
    pub json_output: bool,
    pub output_file: Option<PathBuf>,
    pub output_schema: Option<PathBuf>,
    pub ephemeral: bool,
    pub skip_git_repo_check: bool,
    pub add_dirs: Vec<PathBuf>,
    pub yolo: bool,
    pub oss: bool,
    pub local_provider: Option<LocalProvider>,
    pub color: Option<String>,
    /// Raw arguments forwarded verbatim after the wrapper's own flags
    pub extra: Vec<String>,
    pub prompt: Option<String>,
}

impl RunConfig {
    /// A configuration with nothing set beyond the agent binary
    pub const fn new(agent: AgentBinary) -> Self {
        Self {
            agent,
            model: None,
            sandbox: None,
            full_auto: false,
            profile: None,
            cd: None,
            images: Vec::new(),
            json_output: false,
            output_file: None,
            output_schema: None,
            ephemeral: false,
            skip_git_repo_check: false,
            add_dirs: Vec::new(),
            yolo: false,
            oss: false,
            local_provider: None,
            color: None,
            extra: Vec::new(),
            prompt: None,
        }
    }

    /// Whether the git safety default has to be applied for this working directory
    pub const fn needs_repo_check_skip(&self, inside_repo: bool) -> bool {
        !self.skip_git_repo_check && !inside_repo
    }

    /// Force `--skip-git-repo-check` on when the working directory is not a repository
    #[must_use]
    pub fn with_repo_check(mut self, inside_repo: bool) -> Self {
        if self.needs_repo_check_skip(inside_repo) {
            self.skip_git_repo_check = true;
        }
        self
    }

    /// Working directory requested for the agent, if any
    pub fn work_dir(&self) -> Option<&Path> {
        self.cd.as_deref()
    }

    /// Non-empty prompt text
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }

    /// Argument vector for `codex exec`
    pub fn headless_args(&self) -> Vec<String> {
        let mut args = self.agent.invocation();
        args.push("exec".to_string());

        push_value(&mut args, "-m", self.model.as_deref());
        push_value(&mut args, "--sandbox", self.sandbox.map(SandboxPolicy::as_str));
        push_flag(&mut args, "--full-auto", self.full_auto);
        push_value(&mut args, "-p", self.profile.as_deref());
        push_path(&mut args, "--cd", self.cd.as_deref());
        for image in &self.images {
            push_path(&mut args, "-i", Some(image));
        }
        push_flag(&mut args, "--json", self.json_output);
        push_path(&mut args, "-o", self.output_file.as_deref());
        push_path(&mut args, "--output-schema", self.output_schema.as_deref());
        push_flag(&mut args, "--ephemeral", self.ephemeral);
        push_flag(&mut args, "--skip-git-repo-check", self.skip_git_repo_check);
        for dir in &self.add_dirs {
            push_path(&mut args, "--add-dir", Some(dir));
        }
        push_flag(&mut args, "--yolo", self.yolo);
        push_flag(&mut args, "--oss", self.oss);
        push_value(
            &mut args,
            "--local-provider",
            self.local_provider.map(LocalProvider::as_str),
        );
        push_value(&mut args, "--color", self.color.as_deref());
        args.extend(self.extra.iter().cloned());

        if let Some(prompt) = self.prompt_text() {
            args.push(prompt.to_string());
        }

        args
    }

    /// Argument vector that launches the interactive TUI
    ///
    /// The prompt is deliberately absent; interactive mode types it into the
    /// pane after the TUI has started.
    pub fn interactive_args(&self) -> Vec<String> {
        let mut args = self.agent.invocation();

        push_value(&mut args, "-m", self.model.as_deref());
        push_value(&mut args, "--sandbox", self.sandbox.map(SandboxPolicy::as_str));
        push_flag(&mut args, "--full-auto", self.full_auto);
        push_value(&mut args, "-p", self.profile.as_deref());
        args.extend(self.extra.iter().cloned());

        args
    }
}

fn push_flag(args: &mut Vec<String>, flag: &str, enabled: bool) {
    if enabled {
        args.push(flag.to_string());
    }
}

fn push_value(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

fn push_path(args: &mut Vec<String>, flag: &str, value: Option<&Path>) {
    if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value.to_string_lossy().into_owned());
    }
}
