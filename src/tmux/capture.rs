// ABOUTME: Tmux pane capture options
//
// Captures are always plain text (no escape sequences) so substring matching
// against pane content behaves the same as reading the terminal.

/// Number of scrollback lines used for snapshots and text polling
pub const SNAPSHOT_LINES: usize = 200;

/// Options for capturing tmux pane content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOptions {
    /// How many lines of history above the visible area to include
    pub history_lines: usize,
    /// Whether to join wrapped lines
    pub join_wrapped_lines: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            history_lines: SNAPSHOT_LINES,
            join_wrapped_lines: true,
        }
    }
}

impl CaptureOptions {
    /// The last `lines` lines of scrollback
    pub fn last_lines(lines: usize) -> Self {
        Self {
            history_lines: lines,
            ..Self::default()
        }
    }

    /// Arguments for `tmux capture-pane` targeting `target`
    pub fn to_args(&self, target: &str) -> Vec<String> {
        let mut args = vec![
            "capture-pane".to_string(),
            "-p".to_string(),
        ];

        if self.join_wrapped_lines {
            args.push("-J".to_string());
        }

        args.push("-t".to_string());
        args.push(target.to_string());
        args.push("-S".to_string());
        args.push(format!("-{}", self.history_lines));

        args
    }
}
