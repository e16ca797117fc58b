//! The session transcript: completed prompt lines and output blocks.
//!
//! Entries are only ever appended (or wiped by `clear`). The live prompt is
//! kept apart from the entries so that output arriving later is shown
//! above it.

/// A block of command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBlock {
    pub text: String,
    /// Multi-line output is rendered as a preformatted block; single lines
    /// render inline.
    pub multiline: bool,
}

impl OutputBlock {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let multiline = text.contains('\n');
        Self { text, multiline }
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// A submitted line with the prompt it was typed at.
    Input { prompt: String, line: String },
    /// Command output.
    Output(OutputBlock),
}

impl TranscriptEntry {
    /// Plain-text rendering of the entry.
    pub fn to_text(&self) -> String {
        match self {
            TranscriptEntry::Input { prompt, line } => format!("{prompt}{line}"),
            TranscriptEntry::Output(block) => block.text.clone(),
        }
    }
}

/// Session transcript.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    prompt: Option<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The prompt awaiting input, if one is shown.
    pub fn live_prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Show a fresh prompt for the next line.
    pub fn show_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = Some(prompt.into());
    }

    /// Turn the live prompt into a completed input entry.
    pub fn commit_input(&mut self, line: &str) {
        let prompt = self.prompt.take().unwrap_or_default();
        self.entries.push(TranscriptEntry::Input {
            prompt,
            line: line.to_string(),
        });
    }

    /// Append an output block.
    pub fn push_output(&mut self, text: impl Into<String>) {
        self.entries
            .push(TranscriptEntry::Output(OutputBlock::new(text)));
    }

    /// Remove every entry. The live prompt is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Last output block, if any.
    pub fn last_output(&self) -> Option<&OutputBlock> {
        self.entries.iter().rev().find_map(|e| match e {
            TranscriptEntry::Output(block) => Some(block),
            TranscriptEntry::Input { .. } => None,
        })
    }
}
