//! Line-oriented driver for a terminal session.
//!
//! Each input line is typed into the live buffer and submitted. A line
//! ending in TAB presses Tab instead; an empty line while a candidate list
//! is open commits the selection.

use homebase_terminal::Terminal;
use homebase_terminal::transcript::TranscriptEntry;
use homebase_types::input::KeyEvent;

/// Feeds stdin lines to a [`Terminal`] and reports new output.
pub struct LineFrontend {
    terminal: Terminal,
    /// Transcript entries already reported.
    printed: usize,
}

impl LineFrontend {
    pub fn new(terminal: Terminal) -> Self {
        Self {
            terminal,
            printed: 0,
        }
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// The live prompt followed by whatever is in the buffer.
    pub fn prompt_line(&self) -> String {
        format!(
            "{}{}",
            self.terminal.transcript().live_prompt().unwrap_or(""),
            self.terminal.buffer()
        )
    }

    /// Handle one input line and return the lines to print.
    pub fn feed(&mut self, line: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(text) = line.strip_suffix('\t') {
            self.terminal.type_str(text);
            self.terminal.handle_key(KeyEvent::Tab);
            let completion = self.terminal.completion();
            if let Some(selected) = completion.selected_index() {
                for (i, candidate) in completion.candidates().iter().enumerate() {
                    let marker = if i == selected { '*' } else { ' ' };
                    out.push(format!("{marker} {candidate}"));
                }
            }
        } else if line.is_empty() && self.terminal.completion().is_active() {
            self.terminal.handle_key(KeyEvent::Enter);
        } else {
            self.terminal.type_str(line);
            self.terminal.handle_key(KeyEvent::Enter);
        }

        self.collect_output(&mut out);
        if self.terminal.poll_deferred() > 0 {
            self.collect_output(&mut out);
        }
        out
    }

    /// Output from background commands that arrived since the last call.
    pub fn poll(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        if self.terminal.poll_deferred() > 0 {
            self.collect_output(&mut out);
        }
        out
    }

    fn collect_output(&mut self, out: &mut Vec<String>) {
        let entries = self.terminal.transcript().entries();
        // The transcript shrinks only when it was cleared.
        if entries.len() < self.printed {
            self.printed = 0;
        }
        for entry in &entries[self.printed..] {
            if let TranscriptEntry::Output(block) = entry {
                out.push(block.text.clone());
            }
        }
        self.printed = entries.len();
    }
}
