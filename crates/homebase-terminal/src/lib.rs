//! Command interpreter and terminal session for homebase.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name, optionally with sub-methods.
//! The parser splits input lines into a command key, flags and a free-text
//! argument; the `Terminal` session ties dispatch to history, tab completion
//! and the transcript.

mod commands;
pub mod completion;
mod data_commands;
pub mod deferred;
pub mod history;
mod interpreter;
mod keycode_commands;
pub mod parser;
pub mod services;
pub mod settings;
mod terminal;
pub mod transcript;
mod weather_commands;
mod web_commands;

#[cfg(test)]
mod test_support;

/// Register all built-in commands into a registry.
pub use commands::register_builtins;
/// Register the backup and restore commands.
pub use data_commands::register_data_commands;
/// A single executable command trait.
pub use interpreter::Command;
/// A top-level command with its sub-methods.
pub use interpreter::CommandNode;
/// Output produced by a command (text, JSON, table, signals).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Outcome of dispatching one line.
pub use interpreter::Dispatch;
/// State passed to every command.
pub use interpreter::Environment;
/// Flags parsed from `-x` tokens.
pub use interpreter::Options;
pub use interpreter::RESTORE_COMMAND;
/// Register the keycode command.
pub use keycode_commands::register_keycode_commands;
/// The interactive session.
pub use terminal::{KeyOutcome, Terminal};
/// Register the weather command.
pub use weather_commands::register_weather_commands;
/// Register search, bookmark and site shortcut commands.
pub use web_commands::register_web_commands;
