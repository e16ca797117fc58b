//! Line parser: command key, flags, and free-text argument.
//!
//! Grammar (no quoting, no pipes, no expansion):
//!
//! ```text
//! line     := command [method] flag* [argument]
//! flag     := "-" char*
//! argument := every token from the first non-flag onward
//! ```
//!
//! `method` is only consumed when the command declares it as a sub-method.
//! Flags appearing after the argument has started are part of the argument.
//! The argument is offered twice: words joined by single spaces, and the raw
//! tail of the line with its spacing intact.

use homebase_types::error::{HomebaseError, Result};

use crate::interpreter::{CommandRegistry, Options};

/// A submitted line, resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// One- or two-word command key (`"echo"`, `"bm set"`).
    pub key: String,
    /// Flags collected from the leading `-x` tokens.
    pub options: Options,
    /// Remaining tokens joined with single spaces.
    pub argument: String,
    /// The line from the first argument token to its trimmed end.
    pub raw_argument: String,
}

/// Whitespace-separated tokens paired with their byte offsets in `line`.
fn tokenize(line: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push((s, &line[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push((s, &line[s..]));
    }
    tokens
}

/// Parse `line` into a [`ParsedCommand`].
///
/// Returns `Ok(None)` for a blank line and
/// [`HomebaseError::UnknownCommand`] when the first word names no command.
pub fn parse_line(line: &str, registry: &CommandRegistry) -> Result<Option<ParsedCommand>> {
    let line = line.trim_end();
    let tokens = tokenize(line);
    let Some(&(_, first)) = tokens.first() else {
        return Ok(None);
    };

    let node = registry
        .node(first)
        .ok_or_else(|| HomebaseError::UnknownCommand(first.to_string()))?;

    let mut next = 1;
    let mut key = first.to_string();
    if let Some(&(_, second)) = tokens.get(next)
        && node.has_method(second)
    {
        key.push(' ');
        key.push_str(second);
        next += 1;
    }

    let mut options = Options::new();
    while let Some(flags) = tokens.get(next).and_then(|(_, t)| t.strip_prefix('-')) {
        for c in flags.chars() {
            options.insert(c);
        }
        next += 1;
    }

    let rest = &tokens[next..];
    let argument = rest.iter().map(|(_, t)| *t).collect::<Vec<_>>().join(" ");
    let raw_argument = rest
        .first()
        .map(|&(offset, _)| line[offset..].to_string())
        .unwrap_or_default();
    Ok(Some(ParsedCommand {
        key,
        options,
        argument,
        raw_argument,
    }))
}
