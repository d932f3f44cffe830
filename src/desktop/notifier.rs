// ABOUTME: Desktop notifications via osascript on macOS and notify-send elsewhere

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::ADAPTER_TIMEOUT;
use crate::agent::SearchEnv;

/// Sends a user-visible notification
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show `message` under `title`. Never fails.
    async fn notify(&self, title: &str, message: &str);
}

/// Notifier that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _title: &str, _message: &str) {}
}

/// Notifier backed by the platform's notification helper
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    helper: Option<PathBuf>,
}

impl DesktopNotifier {
    #[cfg(target_os = "macos")]
    const HELPER: &'static str = "osascript";
    #[cfg(not(target_os = "macos"))]
    const HELPER: &'static str = "notify-send";

    /// Locate the notification helper on the search path
    pub fn new(env: &SearchEnv) -> Self {
        Self {
            helper: env.find(Self::HELPER),
        }
    }

    #[cfg(target_os = "macos")]
    fn helper_args(title: &str, message: &str) -> Vec<String> {
        vec!["-e".to_string(), applescript_notification(title, message)]
    }

    #[cfg(not(target_os = "macos"))]
    fn helper_args(title: &str, message: &str) -> Vec<String> {
        vec![title.to_string(), message.to_string()]
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str) {
        let Some(helper) = &self.helper else {
            debug!("No notification helper available, skipping: {}", message);
            return;
        };

        let output = Command::new(helper)
            .args(Self::helper_args(title, message))
            .kill_on_drop(true)
            .output();

        match timeout(ADAPTER_TIMEOUT, output).await {
            Ok(Ok(output)) if output.status.success() => debug!("Sent notification: {}", message),
            Ok(Ok(output)) => warn!(
                "Notification helper failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ),
            Ok(Err(e)) => warn!("Failed to run notification helper: {}", e),
            Err(_) => warn!("Notification helper timed out after {:?}", ADAPTER_TIMEOUT),
        }
    }
}

/// Escape text for inclusion in an AppleScript string literal
fn applescript_string(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// AppleScript that displays a notification
pub fn applescript_notification(title: &str, message: &str) -> String {
    format!(
        "display notification {} with title {}",
        applescript_string(message),
        applescript_string(title)
    )
}
