//! Key events delivered to the terminal.
//!
//! Front ends map their native keyboard input to these variants. The
//! terminal never sees raw platform input.

use serde::{Deserialize, Serialize};

/// A key event aimed at the terminal's live input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEvent {
    /// Printable character typed into the live buffer.
    Char(char),
    /// Delete the character left of the caret.
    Backspace,
    /// Request completion, or cycle an open candidate list.
    Tab,
    /// Commit a pending candidate, or submit the live line.
    Enter,
    /// Browse to an older history entry.
    Up,
    /// Browse to a newer history entry.
    Down,
    /// Give up input focus.
    Escape,
}

impl KeyEvent {
    /// Whether this key edits the live buffer directly.
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Char(_) | Self::Backspace)
    }
}
