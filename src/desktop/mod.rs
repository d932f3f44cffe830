// ABOUTME: Best-effort desktop integrations: completion notifications and clipboard
//
// Both adapters are fire-and-forget. Production implementations log and
// discard every failure so they can never change the exit status of a run.

pub mod clipboard;
pub mod notifier;

pub use clipboard::{ClipboardWriter, NoopClipboard, SystemClipboard};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{DesktopNotifier, NoopNotifier, Notifier};

use std::time::Duration;

/// Title used for every notification the wrapper sends
pub const NOTIFICATION_TITLE: &str = "Codex";

/// Upper bound on any single OS helper invocation
pub const ADAPTER_TIMEOUT: Duration = Duration::from_secs(5);
