// ABOUTME: Agent binary resolution and argument-vector construction for the codex CLI
//
// The wrapper never interprets what the agent does; it only needs to find
// the executable and translate a RunConfig into the two invocation forms
// the agent accepts (`codex exec ...` and the interactive TUI).

pub mod command;
pub mod resolver;

pub use command::{LocalProvider, RunConfig, SandboxPolicy};
pub use resolver::{resolve_agent_binary, AgentBinary, SearchEnv};
