// ABOUTME: Clipboard adapter used to copy headless output

use tracing::{debug, warn};

/// Places text on the clipboard
pub trait ClipboardWriter {
    /// Copy `text`. Never fails.
    fn write_text(&self, text: &str);
}

/// Clipboard writer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClipboard;

impl ClipboardWriter for NoopClipboard {
    fn write_text(&self, _text: &str) {}
}

/// The system clipboard (NSPasteboard on macOS)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) {
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));

        match result {
            Ok(()) => debug!("Copied {} bytes to clipboard", text.len()),
            Err(e) => warn!("Failed to copy output to clipboard: {}", e),
        }
    }
}
