//! Tab completion state machine.
//!
//! ```text
//!            Tab, 0 matches                 Tab, 1 match
//!   Idle ─────────────────▶ Idle      Idle ─────────────▶ Idle (buffer = match + " ")
//!    │
//!    │ Tab, 2+ matches
//!    ▼
//!  Listing ── Tab ──▶ Listing (selection advances, wraps)
//!    │  │
//!    │  └── Enter ──▶ Idle (buffer = selected + " ")
//!    └── typing ────▶ Idle (list discarded, buffer untouched)
//! ```
//!
//! Candidates come from history when the buffer's first word is a known
//! command, otherwise from the command namespace.

use crate::interpreter::CommandRegistry;

/// Most history entries offered as candidates.
pub const MAX_HISTORY_CANDIDATES: usize = 10;

/// What a Tab press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// Nothing matched; the buffer is unchanged.
    NoMatch,
    /// A unique match replaced the buffer.
    Applied(String),
    /// Several matches are now listed; the first is selected.
    Listed(usize),
    /// The selection moved within the open list.
    Cycled(usize),
}

/// Completion candidates and the current selection.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    candidates: Vec<String>,
    selected: usize,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a candidate list is open.
    pub fn is_active(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// The open candidate list (empty when idle).
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Index of the selected candidate, if a list is open.
    pub fn selected_index(&self) -> Option<usize> {
        self.is_active().then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&str> {
        self.candidates.get(self.selected).map(String::as_str)
    }

    /// Handle a Tab press against the live `buffer`.
    pub fn complete(
        &mut self,
        buffer: &mut String,
        registry: &CommandRegistry,
        history: &[String],
    ) -> CompletionResult {
        if self.candidates.len() > 1 {
            self.selected = (self.selected + 1) % self.candidates.len();
            return CompletionResult::Cycled(self.selected);
        }

        let candidates = candidates_for(buffer, registry, history);
        log::debug!("completion for {buffer:?}: {candidates:?}");
        match candidates.len() {
            0 => {
                self.dismiss();
                CompletionResult::NoMatch
            },
            1 => {
                self.dismiss();
                let mut applied = candidates.into_iter().next().unwrap_or_default();
                applied.push(' ');
                buffer.clone_from(&applied);
                CompletionResult::Applied(applied)
            },
            n => {
                self.candidates = candidates;
                self.selected = 0;
                CompletionResult::Listed(n)
            },
        }
    }

    /// Apply the selected candidate (plus a trailing space) to `buffer` and
    /// close the list. Returns `false` if no list was open.
    pub fn commit(&mut self, buffer: &mut String) -> bool {
        let Some(selected) = self.selected() else {
            return false;
        };
        *buffer = format!("{selected} ");
        self.dismiss();
        true
    }

    /// Close the list without touching the buffer.
    pub fn dismiss(&mut self) {
        self.candidates.clear();
        self.selected = 0;
    }
}

fn candidates_for(buffer: &str, registry: &CommandRegistry, history: &[String]) -> Vec<String> {
    let names_command = buffer
        .split_whitespace()
        .next()
        .is_some_and(|first| registry.contains(first));
    if names_command {
        history
            .iter()
            .filter(|entry| entry.starts_with(buffer))
            .take(MAX_HISTORY_CANDIDATES)
            .cloned()
            .collect()
    } else {
        registry.completions(buffer)
    }
}
