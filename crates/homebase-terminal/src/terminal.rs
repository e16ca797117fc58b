//! The terminal session: wires key events to history, completion, the
//! registry and the transcript.

use homebase_store::KvStore;
use homebase_types::config::TerminalConfig;
use homebase_types::error::{HomebaseError, Result};
use homebase_types::input::KeyEvent;

use crate::completion::{Completion, CompletionResult};
use crate::deferred::{self, DeferredOutput, DeferredReceiver, DeferredSender};
use crate::history::History;
use crate::interpreter::{CommandOutput, CommandRegistry, Dispatch, Environment};
use crate::services::Services;
use crate::settings::{MACHINE_SETTING, NAME_SETTING, Settings};
use crate::transcript::Transcript;

/// What the caller should do after a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep feeding keys.
    Continue,
    /// The terminal gave up focus.
    Blur,
}

/// An interactive terminal session.
pub struct Terminal {
    registry: CommandRegistry,
    history: History,
    completion: Completion,
    transcript: Transcript,
    settings: Settings,
    store: Box<dyn KvStore>,
    services: Services,
    config: TerminalConfig,
    buffer: String,
    deferred_tx: DeferredSender,
    deferred_rx: DeferredReceiver,
}

impl Terminal {
    /// Start a session. Settings and history are loaded from `store`.
    pub fn new(
        registry: CommandRegistry,
        store: Box<dyn KvStore>,
        services: Services,
        config: TerminalConfig,
    ) -> Self {
        let settings = Settings::load(store.as_ref());
        let history = History::load(store.as_ref(), settings.max_history(config.max_history));
        let (deferred_tx, deferred_rx) = deferred::channel();
        let mut terminal = Self {
            registry,
            history,
            completion: Completion::new(),
            transcript: Transcript::new(),
            settings,
            store,
            services,
            config,
            buffer: String::new(),
            deferred_tx,
            deferred_rx,
        };
        let prompt = terminal.prompt();
        terminal.transcript.show_prompt(prompt);
        terminal
    }

    /// Start a session with every built-in command registered.
    pub fn with_builtins(
        store: Box<dyn KvStore>,
        services: Services,
        config: TerminalConfig,
    ) -> Result<Self> {
        let mut registry = CommandRegistry::new();
        crate::register_builtins(&mut registry)?;
        log::info!("registered {} commands", registry.list_commands().len());
        Ok(Self::new(registry, store, services, config))
    }

    /// `<name>@<machine> $ `, from settings with config fallbacks.
    pub fn prompt(&self) -> String {
        let name = self
            .settings
            .get_text(NAME_SETTING)
            .unwrap_or_else(|| self.config.name.clone());
        let machine = self
            .settings
            .get_text(MACHINE_SETTING)
            .unwrap_or_else(|| self.config.machine.clone());
        format!("{name}@{machine} $ ")
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    /// Feed one key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.is_edit() {
            self.completion.dismiss();
        }
        match key {
            KeyEvent::Char(c) => self.buffer.push(c),
            KeyEvent::Backspace => {
                self.buffer.pop();
            },
            KeyEvent::Tab => {
                self.complete();
            },
            KeyEvent::Enter => {
                if !self.completion.commit(&mut self.buffer) {
                    let line = std::mem::take(&mut self.buffer);
                    self.submit(&line);
                }
            },
            KeyEvent::Up => {
                self.completion.dismiss();
                self.history.navigate_older(&mut self.buffer);
            },
            KeyEvent::Down => {
                self.completion.dismiss();
                self.history.navigate_newer(&mut self.buffer);
            },
            KeyEvent::Escape => return KeyOutcome::Blur,
        }
        KeyOutcome::Continue
    }

    /// Type each character of `text` into the live buffer.
    pub fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            self.handle_key(KeyEvent::Char(c));
        }
    }

    /// Tab: complete the live buffer or cycle the open candidate list.
    pub fn complete(&mut self) -> CompletionResult {
        self.completion
            .complete(&mut self.buffer, &self.registry, self.history.entries())
    }

    /// Run one line and record the outcome in the transcript and history.
    pub fn submit(&mut self, line: &str) -> Dispatch {
        let line = line.trim();
        self.transcript.commit_input(line);
        self.completion.dismiss();

        let dispatch = {
            let mut env = Environment {
                registry: &self.registry,
                history: self.history.entries(),
                settings: &mut self.settings,
                store: self.store.as_mut(),
                services: &self.services,
                deferred: &self.deferred_tx,
            };
            self.registry.execute(line, &mut env)
        };

        match &dispatch {
            Dispatch::Empty => self.transcript.push_output(""),
            Dispatch::Unknown(key) => self.transcript.push_output(format!(
                "Command '{key}' not found. Type 'help' for available commands."
            )),
            Dispatch::Failed { key, error } => {
                log::error!("command '{key}' failed: {error}");
                let message = match error {
                    HomebaseError::Command(message) => message.clone(),
                    other => other.to_string(),
                };
                self.transcript.push_output(format!(
                    "Something went wrong while executing the command: \"{message}\""
                ));
            },
            Dispatch::Completed { output, .. } => match output {
                CommandOutput::Clear => self.transcript.clear(),
                CommandOutput::Reload => self.reload(),
                other => {
                    if let Some(text) = other.to_display() {
                        self.transcript.push_output(text);
                    }
                },
            },
        }

        if dispatch.records_history() {
            let bound = self.settings.max_history(self.config.max_history);
            self.history.set_max_entries(bound);
            self.history.submit(line, self.store.as_mut());
        }
        self.history.reset_cursor();
        let prompt = self.prompt();
        self.transcript.show_prompt(prompt);
        dispatch
    }

    /// Re-read settings and history from the store.
    pub fn reload(&mut self) {
        self.settings = Settings::load(self.store.as_ref());
        let bound = self.settings.max_history(self.config.max_history);
        self.history = History::load(self.store.as_ref(), bound);
        self.completion.dismiss();
        log::info!("reloaded settings and {} history entries", self.history.len());
    }

    /// Append any output that background commands have posted since the
    /// last poll. Returns how many blocks arrived.
    pub fn poll_deferred(&mut self) -> usize {
        let arrived = self.deferred_rx.drain();
        let count = arrived.len();
        for output in arrived {
            let text = match output {
                DeferredOutput::Text(text) => text,
                DeferredOutput::Render { template, data } => {
                    match self.services.renderer.render(&template, &data) {
                        Ok(text) => text,
                        Err(e) => {
                            log::warn!("render of '{template}' failed: {e}");
                            format!("Something went wrong while executing the command: \"{e}\"")
                        },
                    }
                },
            };
            self.transcript.push_output(text);
        }
        count
    }
}
