//! Test doubles and a command harness shared by the command tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use homebase_store::{KvStore, MemoryStore};
use homebase_types::error::Result;
use serde_json::Value;

use crate::deferred::{self, DeferredReceiver, DeferredSender};
use crate::interpreter::{CommandOutput, CommandRegistry, Dispatch, Environment};
use crate::services::{Navigator, Notifier, Services};
use crate::settings::Settings;

/// Navigator that records every URL it is asked to open.
pub struct RecordingNavigator(pub Rc<RefCell<Vec<String>>>);

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        self.0.borrow_mut().push(url.to_string());
        Ok(())
    }
}

/// Notifier that records `(message, duration, error)` triples.
pub struct RecordingNotifier(pub Rc<RefCell<Vec<(String, Duration, bool)>>>);

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, duration: Duration, error: bool) -> Result<()> {
        self.0
            .borrow_mut()
            .push((message.to_string(), duration, error));
        Ok(())
    }
}

/// A registry with every built-in command plus the state commands touch.
pub struct Harness {
    pub registry: CommandRegistry,
    pub settings: Settings,
    pub store: MemoryStore,
    pub services: Services,
    pub history: Vec<String>,
    pub tx: DeferredSender,
    pub rx: DeferredReceiver,
    pub urls: Rc<RefCell<Vec<String>>>,
    pub notes: Rc<RefCell<Vec<(String, Duration, bool)>>>,
}

impl Harness {
    pub fn new() -> Self {
        let mut registry = CommandRegistry::new();
        crate::register_builtins(&mut registry).unwrap();
        let urls = Rc::new(RefCell::new(Vec::new()));
        let notes = Rc::new(RefCell::new(Vec::new()));
        let mut services = Services::offline();
        services.navigator = Box::new(RecordingNavigator(Rc::clone(&urls)));
        services.notifier = Box::new(RecordingNotifier(Rc::clone(&notes)));
        let (tx, rx) = deferred::channel();
        Self {
            registry,
            settings: Settings::new(),
            store: MemoryStore::new(),
            services,
            history: Vec::new(),
            tx,
            rx,
            urls,
            notes,
        }
    }

    pub fn run(&mut self, line: &str) -> Dispatch {
        let mut env = Environment {
            registry: &self.registry,
            history: &self.history,
            settings: &mut self.settings,
            store: &mut self.store,
            services: &self.services,
            deferred: &self.tx,
        };
        self.registry.execute(line, &mut env)
    }

    /// Run a line that must complete, returning its output (`None` for
    /// `CommandOutput::None`).
    pub fn output(&mut self, line: &str) -> Option<CommandOutput> {
        match self.run(line) {
            Dispatch::Completed {
                output: CommandOutput::None,
                ..
            } => None,
            Dispatch::Completed { output, .. } => Some(output),
            other => panic!("'{line}' did not complete: {other:?}"),
        }
    }

    /// Run a line that must complete with displayable output.
    pub fn text(&mut self, line: &str) -> String {
        match self.output(line).and_then(|out| out.to_display()) {
            Some(text) => text,
            None => panic!("'{line}' produced no text"),
        }
    }

    pub fn stored(&self, key: &str) -> Option<Value> {
        self.store.get(key).unwrap()
    }
}
