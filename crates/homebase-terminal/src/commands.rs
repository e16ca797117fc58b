//! Built-in commands for the homebase terminal.

use std::collections::BTreeMap;
use std::time::Duration;

use homebase_types::error::Result;
use serde_json::Value;

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, Options};

/// Default notification lifetime.
const DEFAULT_NOTIFY_MS: u64 = 5000;

/// Register all built-in commands into a registry.
///
/// Registers the general commands defined here plus the data, web, keycode
/// and weather command modules.
pub fn register_builtins(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(ClearCmd));
    reg.register(Box::new(HelpCmd));
    reg.register(Box::new(SetCmd));
    reg.register(Box::new(GetCmd));
    reg.register(Box::new(HistoryCmd));
    reg.register(Box::new(NotifyCmd));
    crate::register_data_commands(reg);
    crate::register_web_commands(reg)?;
    crate::register_keycode_commands(reg);
    crate::register_weather_commands(reg);
    Ok(())
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn help(&self) -> &str {
        "display a line of text\nusage: echo STRING"
    }
    fn execute(&self, argument: &str, _: &Options, _: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(argument.to_string()))
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn help(&self) -> &str {
        "clear the terminal"
    }
    fn execute(&self, _: &str, _: &Options, _: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Clear)
    }
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn help(&self) -> &str {
        "display a program's help text\nusage: help [COMMAND]"
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if !argument.is_empty() {
            return Ok(CommandOutput::Text(match env.registry.get(argument) {
                Some(cmd) => cmd.help().to_string(),
                None => format!("Unknown module '{argument}'."),
            }));
        }

        // Group visible commands by category; BTreeMaps keep the listing
        // stable between calls.
        let mut categories: BTreeMap<&str, Vec<(String, &str)>> = BTreeMap::new();
        for (key, cmd) in env.registry.list_commands() {
            if !cmd.visible() {
                continue;
            }
            let description = cmd.help().lines().next().unwrap_or("");
            categories
                .entry(cmd.category())
                .or_default()
                .push((key, description));
        }

        let total: usize = categories.values().map(Vec::len).sum();
        let mut out = format!("Commands ({total}):\n");
        for (category, cmds) in &categories {
            out.push_str(&format!("\n  [{category}]\n"));
            for (name, desc) in cmds {
                out.push_str(&format!("    {name:10} {desc}\n"));
            }
        }
        out.push_str("\nType 'help <command>' for details.");
        Ok(CommandOutput::Text(out))
    }
}

// ---------------------------------------------------------------------------
// set / get
// ---------------------------------------------------------------------------

struct SetCmd;
impl Command for SetCmd {
    fn name(&self) -> &str {
        "set"
    }
    fn help(&self) -> &str {
        "change homepage settings\nusage: set SETTING [VALUE]\n\
         if no value is given, the setting will be deleted.\n\
         example: set terminal.name example"
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if argument.is_empty() {
            return Ok(CommandOutput::Text(self.help().to_string()));
        }
        match argument.split_once(' ') {
            Some((path, value)) => {
                env.settings.set(path, Value::String(value.to_string()));
            },
            None => {
                env.settings.delete(argument);
            },
        }
        if let Err(e) = env.save_settings() {
            log::warn!("settings not persisted: {e}");
        }
        Ok(CommandOutput::None)
    }
}

struct GetCmd;
impl Command for GetCmd {
    fn name(&self) -> &str {
        "get"
    }
    fn help(&self) -> &str {
        "get value of a setting\nusage: get [SETTING]\nexample: get terminal.name"
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if argument.is_empty() {
            return Ok(CommandOutput::Json(env.settings.to_value()));
        }
        Ok(match env.settings.get(argument) {
            None | Some(Value::Null) => {
                CommandOutput::Text("This setting does not exist / has no value".to_string())
            },
            Some(Value::String(s)) => CommandOutput::Text(s.clone()),
            Some(other) => CommandOutput::Json(other.clone()),
        })
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn help(&self) -> &str {
        "display (filtered) command history\nusage: history [-l LIMIT] [QUERY]"
    }
    fn execute(&self, argument: &str, options: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut query = argument;
        let mut limit = None;
        if options.contains('l') {
            let (n, rest) = argument.split_once(' ').unwrap_or((argument, ""));
            match n.parse::<usize>() {
                Ok(n) => limit = Some(n),
                Err(_) => {
                    return Ok(CommandOutput::Text(
                        "Invalid `limit` parameter; not a number.".to_string(),
                    ));
                },
            }
            query = rest;
        }

        let matches: Vec<&str> = env
            .history
            .iter()
            .filter(|entry| entry.contains(query))
            .map(String::as_str)
            .collect();
        // The limit keeps the tail of the newest-first list.
        let skip = match limit {
            Some(n) if n > 0 => matches.len().saturating_sub(n),
            _ => 0,
        };
        let lines = &matches[skip..];
        if lines.is_empty() {
            return Ok(CommandOutput::Text("(no history)".to_string()));
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// notify
// ---------------------------------------------------------------------------

struct NotifyCmd;
impl Command for NotifyCmd {
    fn name(&self) -> &str {
        "notify"
    }
    fn help(&self) -> &str {
        "show a notification\nusage: notify MESSAGE [;DURATION] [;ERROR]\n\
         duration: integer in milliseconds | error: \"true\" | \"false\"\n\
         example: notify Hello World!;5000;true"
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut parts = argument.split(';');
        let message = parts.next().unwrap_or("").trim();
        if message.is_empty() {
            return Ok(CommandOutput::Text(self.help().to_string()));
        }
        let duration = match parts.next().map(str::trim) {
            None | Some("") => DEFAULT_NOTIFY_MS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) => ms,
                Err(_) => {
                    return Ok(CommandOutput::Text(format!(
                        "Invalid duration '{raw}'; not a number."
                    )));
                },
            },
        };
        let error = parts.next().is_some_and(|e| e.trim() == "true");
        env.services
            .notifier
            .notify(message, Duration::from_millis(duration), error)?;
        Ok(CommandOutput::None)
    }
}
