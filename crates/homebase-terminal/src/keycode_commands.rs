//! `keycode`: show the key codes for a sequence of characters.

use homebase_types::error::Result;

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, Options};

/// Register the keycode command.
pub fn register_keycode_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(KeycodeCmd));
}

/// DOM key code for a (lowercased) character on the main keyboard block.
fn keycode(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(48 + (c as u32 - '0' as u32)),
        'a'..='z' => Some(65 + (c as u32 - 'a' as u32)),
        ';' => Some(186),
        '=' => Some(187),
        ',' => Some(188),
        '-' => Some(189),
        '.' => Some(190),
        '/' => Some(191),
        '`' => Some(192),
        '[' => Some(219),
        '\\' => Some(220),
        ']' => Some(221),
        '\'' => Some(222),
        _ => None,
    }
}

/// Key code of a digit on the numeric keypad.
fn numpad_keycode(c: char) -> Option<u32> {
    c.to_digit(10).map(|d| 96 + d)
}

struct KeycodeCmd;
impl Command for KeycodeCmd {
    fn name(&self) -> &str {
        "keycode"
    }
    fn help(&self) -> &str {
        "return key codes for a string\nusage: keycode [-s] [-n] INPUT\n\
         spaces are ignored; -s prefixes each code with its character, \
         -n uses numpad codes for digits"
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn execute(&self, argument: &str, options: &Options, _: &mut Environment<'_>) -> Result<CommandOutput> {
        let source: String = argument
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        if source.is_empty() {
            return Ok(CommandOutput::Text(self.help().to_string()));
        }
        let numpad = options.contains('n');
        let with_source = options.contains('s');
        let codes: Vec<String> = source
            .chars()
            .map(|c| {
                let code = if numpad {
                    numpad_keycode(c).or_else(|| keycode(c))
                } else {
                    keycode(c)
                };
                let code = code.map_or_else(|| "?".to_string(), |code| code.to_string());
                if with_source {
                    format!("{c}:{code}")
                } else {
                    code
                }
            })
            .collect();
        Ok(CommandOutput::Text(codes.join(" ")))
    }
}
