// ABOUTME: Library crate for codex-headless exposing public API for testing and external use

#![allow(missing_docs)]

pub mod agent;
pub mod cli;
pub mod config;
pub mod desktop;
pub mod git;
pub mod process;
pub mod tmux;
