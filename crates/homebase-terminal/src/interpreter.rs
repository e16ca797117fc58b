//! Command trait, registry, and dispatch logic.
//!
//! Commands are registered under a top-level name. A top-level command may
//! own sub-methods (`bm set`, `bm list`), which are resolved structurally
//! by the registry rather than by matching strings with embedded spaces.

use std::collections::BTreeMap;

use homebase_store::KvStore;
use homebase_types::error::{HomebaseError, Result};
use serde_json::Value;

use crate::deferred::DeferredSender;
use crate::parser::parse_line;
use crate::services::Services;
use crate::settings::Settings;

/// Name of the command whose lines are never recorded in history.
pub const RESTORE_COMMAND: &str = "restore";

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Structured value, shown in its compact JSON form.
    Json(Value),
    /// Tabular data (header row + data rows).
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Command performed a side effect and has nothing to print.
    None,
    /// Signal to clear the transcript.
    Clear,
    /// Signal to reload history and settings from the store.
    Reload,
}

impl CommandOutput {
    /// Text to append to the transcript, if any.
    pub fn to_display(&self) -> Option<String> {
        match self {
            CommandOutput::Text(text) => Some(text.clone()),
            CommandOutput::Json(value) => Some(value.to_string()),
            CommandOutput::Table { headers, rows } => {
                let mut out = headers.join(" | ");
                for row in rows {
                    out.push('\n');
                    out.push_str(&row.join(" | "));
                }
                Some(out)
            },
            CommandOutput::None | CommandOutput::Clear | CommandOutput::Reload => None,
        }
    }
}

/// Single-character flags given as `-x` tokens before the argument.
///
/// Order of first appearance is kept so commands that pick "the first
/// recognised flag" behave predictably; duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options(Vec<char>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag. Returns `false` if it was already present.
    pub fn insert(&mut self, flag: char) -> bool {
        if self.0.contains(&flag) {
            return false;
        }
        self.0.push(flag);
        true
    }

    pub fn contains(&self, flag: char) -> bool {
        self.0.contains(&flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<char> for Options {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut opts = Options::new();
        for c in iter {
            opts.insert(c);
        }
        opts
    }
}

/// Everything a command may read or change while it runs.
pub struct Environment<'a> {
    /// The registry the command was resolved from (used by `help`).
    pub registry: &'a CommandRegistry,
    /// History snapshot, newest first. The current line is not yet in it.
    pub history: &'a [String],
    /// User settings.
    pub settings: &'a mut Settings,
    /// The persistent store.
    pub store: &'a mut dyn KvStore,
    /// Widget collaborators (navigation, notifications, rendering, weather).
    pub services: &'a Services,
    /// Channel for output that arrives after the command has returned.
    pub deferred: &'a DeferredSender,
}

impl Environment<'_> {
    /// Persist the current settings.
    pub fn save_settings(&mut self) -> Result<()> {
        self.settings.save(&mut *self.store)
    }
}

/// A single executable command.
pub trait Command {
    /// The word the user types. For a sub-method this is the second word.
    fn name(&self) -> &str;

    /// Help text shown by `help <command>`. The first line doubles as the
    /// one-line description.
    fn help(&self) -> &str;

    /// Command category for grouping in `help` output.
    fn category(&self) -> &str {
        "general"
    }

    /// Whether the command is listed by a bare `help`.
    fn visible(&self) -> bool {
        true
    }

    /// Whether `execute` receives the argument exactly as typed rather than
    /// with its whitespace runs collapsed.
    fn raw_argument(&self) -> bool {
        false
    }

    /// Execute the command with its free-text argument and flags.
    fn execute(
        &self,
        argument: &str,
        options: &Options,
        env: &mut Environment<'_>,
    ) -> Result<CommandOutput>;
}

/// A top-level command plus its optional sub-methods.
pub struct CommandNode {
    command: Box<dyn Command>,
    methods: BTreeMap<String, Box<dyn Command>>,
}

impl CommandNode {
    fn new(command: Box<dyn Command>) -> Self {
        Self {
            command,
            methods: BTreeMap::new(),
        }
    }

    /// The top-level command itself.
    pub fn command(&self) -> &dyn Command {
        self.command.as_ref()
    }

    /// Look up a sub-method by name.
    pub fn method(&self, name: &str) -> Option<&dyn Command> {
        self.methods.get(name).map(|m| m.as_ref())
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Sub-method names, sorted.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(|k| k.as_str())
    }
}

/// Outcome of dispatching one submitted line.
#[derive(Debug)]
pub enum Dispatch {
    /// Blank line; nothing was resolved.
    Empty,
    /// The first word names no command.
    Unknown(String),
    /// The command ran and produced output (possibly `None`).
    Completed { key: String, output: CommandOutput },
    /// The command ran and failed.
    Failed { key: String, error: HomebaseError },
}

impl Dispatch {
    /// Resolved command key, if the line was not blank.
    pub fn key(&self) -> Option<&str> {
        match self {
            Dispatch::Empty => None,
            Dispatch::Unknown(key)
            | Dispatch::Completed { key, .. }
            | Dispatch::Failed { key, .. } => Some(key),
        }
    }

    /// Whether the submitted line belongs in history.
    pub fn records_history(&self) -> bool {
        match self.key() {
            None => false,
            Some(key) => key != RESTORE_COMMAND,
        }
    }
}

/// Registry of available commands with dispatch.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandNode>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level command. Replaces any existing command with the
    /// same name but keeps its registered sub-methods.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let name = cmd.name().to_string();
        match self.commands.get_mut(&name) {
            Some(node) => node.command = cmd,
            None => {
                self.commands.insert(name, CommandNode::new(cmd));
            },
        }
    }

    /// Register `cmd` as a sub-method of the top-level command `parent`.
    pub fn register_method(&mut self, parent: &str, cmd: Box<dyn Command>) -> Result<()> {
        let node = self.commands.get_mut(parent).ok_or_else(|| {
            HomebaseError::Command(format!(
                "cannot add method '{}' to unknown command '{parent}'",
                cmd.name()
            ))
        })?;
        node.methods.insert(cmd.name().to_string(), cmd);
        Ok(())
    }

    /// Look up a top-level node.
    pub fn node(&self, name: &str) -> Option<&CommandNode> {
        self.commands.get(name)
    }

    /// Whether `name` is a top-level command.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Resolve a one- or two-word command key.
    pub fn get(&self, key: &str) -> Option<&dyn Command> {
        match key.split_once(' ') {
            Some((parent, method)) => self.commands.get(parent)?.method(method),
            None => self.commands.get(key).map(|n| n.command()),
        }
    }

    /// Every command key (top-level and `parent method`), sorted.
    pub fn list_commands(&self) -> Vec<(String, &dyn Command)> {
        let mut out = Vec::new();
        for (name, node) in &self.commands {
            out.push((name.clone(), node.command()));
            for (method, cmd) in &node.methods {
                out.push((format!("{name} {method}"), cmd.as_ref()));
            }
        }
        out
    }

    /// Command keys that start with `partial`. Case-sensitive.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        self.list_commands()
            .into_iter()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(partial))
            .collect()
    }

    /// Parse a line and run the command it names.
    ///
    /// Handler failures are captured in the returned [`Dispatch`]; nothing
    /// a single command does can abort the caller.
    pub fn execute(&self, line: &str, env: &mut Environment<'_>) -> Dispatch {
        let parsed = match parse_line(line, self) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return Dispatch::Empty,
            Err(HomebaseError::UnknownCommand(key)) => {
                log::debug!("unknown command: {key}");
                return Dispatch::Unknown(key);
            },
            Err(error) => {
                return Dispatch::Failed {
                    key: String::new(),
                    error,
                };
            },
        };

        let Some(cmd) = self.get(&parsed.key) else {
            return Dispatch::Unknown(parsed.key);
        };

        let argument = if cmd.raw_argument() {
            &parsed.raw_argument
        } else {
            &parsed.argument
        };
        log::debug!(
            "dispatch '{}' options={:?} argument={:?}",
            parsed.key,
            parsed.options,
            argument
        );
        match cmd.execute(argument, &parsed.options, env) {
            Ok(output) => Dispatch::Completed {
                key: parsed.key,
                output,
            },
            Err(error) => Dispatch::Failed {
                key: parsed.key,
                error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use homebase_store::MemoryStore;
    use serde_json::json;

    use super::*;
    use crate::deferred;

    struct EchoCmd;
    impl Command for EchoCmd {
        fn name(&self) -> &str {
            "echo"
        }
        fn help(&self) -> &str {
            "display a line of text"
        }
        fn execute(
            &self,
            argument: &str,
            _: &Options,
            _: &mut Environment<'_>,
        ) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(argument.to_string()))
        }
    }

    struct FlagsCmd;
    impl Command for FlagsCmd {
        fn name(&self) -> &str {
            "flags"
        }
        fn help(&self) -> &str {
            "print flags"
        }
        fn execute(
            &self,
            argument: &str,
            options: &Options,
            _: &mut Environment<'_>,
        ) -> Result<CommandOutput> {
            let flags: String = options.iter().collect();
            Ok(CommandOutput::Text(format!("{flags}|{argument}")))
        }
    }

    struct FailCmd;
    impl Command for FailCmd {
        fn name(&self) -> &str {
            "fail"
        }
        fn help(&self) -> &str {
            "always fails"
        }
        fn execute(&self, _: &str, _: &Options, _: &mut Environment<'_>) -> Result<CommandOutput> {
            Err(HomebaseError::Command("boom".into()))
        }
    }

    struct RawCmd;
    impl Command for RawCmd {
        fn name(&self) -> &str {
            "raw"
        }
        fn help(&self) -> &str {
            "echo the argument as typed"
        }
        fn raw_argument(&self) -> bool {
            true
        }
        fn execute(
            &self,
            argument: &str,
            _: &Options,
            _: &mut Environment<'_>,
        ) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(argument.to_string()))
        }
    }

    struct Named(&'static str);
    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn help(&self) -> &str {
            "named"
        }
        fn visible(&self) -> bool {
            false
        }
        fn execute(&self, _: &str, _: &Options, _: &mut Environment<'_>) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(self.0.to_string()))
        }
    }

    fn registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        reg.register(Box::new(FlagsCmd));
        reg.register(Box::new(FailCmd));
        reg.register(Box::new(RawCmd));
        reg.register(Box::new(Named("bm")));
        reg.register_method("bm", Box::new(Named("set"))).unwrap();
        reg.register_method("bm", Box::new(Named("list"))).unwrap();
        reg
    }

    fn run(reg: &CommandRegistry, line: &str) -> Dispatch {
        let mut settings = Settings::new();
        let mut store = MemoryStore::new();
        let services = Services::offline();
        let (tx, _rx) = deferred::channel();
        let mut env = Environment {
            registry: reg,
            history: &[],
            settings: &mut settings,
            store: &mut store,
            services: &services,
            deferred: &tx,
        };
        reg.execute(line, &mut env)
    }

    fn text(d: Dispatch) -> String {
        match d {
            Dispatch::Completed {
                output: CommandOutput::Text(s),
                ..
            } => s,
            other => panic!("expected text output, got {other:?}"),
        }
    }

    #[test]
    fn echo_argument() {
        let reg = registry();
        assert_eq!(text(run(&reg, "echo hello world")), "hello world");
    }

    #[test]
    fn raw_commands_keep_spacing() {
        let reg = registry();
        assert_eq!(text(run(&reg, "echo a  b")), "a b");
        assert_eq!(text(run(&reg, "raw  a  b  ")), "a  b");
    }

    #[test]
    fn whitespace_only_is_empty() {
        let reg = registry();
        assert!(matches!(run(&reg, "   \t "), Dispatch::Empty));
    }

    #[test]
    fn unknown_command_reports_key() {
        let reg = registry();
        match run(&reg, "bogus arg") {
            Dispatch::Unknown(key) => assert_eq!(key, "bogus"),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn failure_is_captured() {
        let reg = registry();
        match run(&reg, "fail now") {
            Dispatch::Failed { key, error } => {
                assert_eq!(key, "fail");
                assert!(format!("{error}").contains("boom"));
            },
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn options_reach_handler() {
        let reg = registry();
        assert_eq!(text(run(&reg, "flags -ab -c rest of it")), "abc|rest of it");
    }

    #[test]
    fn sub_method_dispatch() {
        let reg = registry();
        let d = run(&reg, "bm set name url");
        assert_eq!(d.key(), Some("bm set"));
        assert_eq!(text(d), "set");
    }

    #[test]
    fn non_method_second_word_is_argument() {
        let reg = registry();
        let d = run(&reg, "bm github");
        assert_eq!(d.key(), Some("bm"));
    }

    #[test]
    fn records_history_rules() {
        assert!(!Dispatch::Empty.records_history());
        assert!(Dispatch::Unknown("x".into()).records_history());
        let restore = Dispatch::Completed {
            key: RESTORE_COMMAND.into(),
            output: CommandOutput::Reload,
        };
        assert!(!restore.records_history());
        let failed = Dispatch::Failed {
            key: "fail".into(),
            error: HomebaseError::Command("x".into()),
        };
        assert!(failed.records_history());
    }

    #[test]
    fn get_resolves_two_word_keys() {
        let reg = registry();
        assert_eq!(reg.get("bm list").map(|c| c.name()), Some("list"));
        assert!(reg.get("bm nope").is_none());
        assert!(reg.get("echo set").is_none());
        assert!(reg.get("nope").is_none());
    }

    #[test]
    fn list_commands_sorted_with_methods() {
        let reg = registry();
        let keys: Vec<String> = reg.list_commands().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["bm", "bm list", "bm set", "echo", "fail", "flags"]);
    }

    #[test]
    fn completions_prefix_includes_methods() {
        let reg = registry();
        assert_eq!(reg.completions("bm"), vec!["bm", "bm list", "bm set"]);
        assert_eq!(reg.completions("f"), vec!["fail", "flags"]);
        assert!(reg.completions("xyz").is_empty());
    }

    #[test]
    fn completions_are_case_sensitive() {
        let reg = registry();
        assert!(reg.completions("E").is_empty());
    }

    #[test]
    fn register_replaces_but_keeps_methods() {
        let mut reg = registry();
        reg.register(Box::new(Named("bm")));
        assert!(reg.node("bm").unwrap().has_method("set"));
    }

    #[test]
    fn register_method_on_unknown_parent_fails() {
        let mut reg = CommandRegistry::new();
        let err = reg.register_method("ghost", Box::new(Named("set"))).unwrap_err();
        assert!(format!("{err}").contains("ghost"));
    }

    #[test]
    fn output_display_forms() {
        assert_eq!(
            CommandOutput::Text("hi".into()).to_display().as_deref(),
            Some("hi")
        );
        assert_eq!(
            CommandOutput::Json(json!({"a": 1})).to_display().as_deref(),
            Some("{\"a\":1}")
        );
        let table = CommandOutput::Table {
            headers: vec!["name".into(), "url".into()],
            rows: vec![vec!["gh".into(), "https://github.com".into()]],
        };
        assert_eq!(
            table.to_display().as_deref(),
            Some("name | url\ngh | https://github.com")
        );
        assert!(CommandOutput::None.to_display().is_none());
        assert!(CommandOutput::Clear.to_display().is_none());
        assert!(CommandOutput::Reload.to_display().is_none());
    }

    #[test]
    fn options_dedup_keeps_order() {
        let opts: Options = "bab".chars().collect();
        assert_eq!(opts.iter().collect::<String>(), "ba");
        assert_eq!(opts.len(), 2);
        assert!(opts.contains('a'));
        assert!(!opts.contains('z'));
    }
}
