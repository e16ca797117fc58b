//! Output delivered after a command has already returned.
//!
//! Commands that wait on the network hand their work to a background
//! thread and return immediately. The thread posts its result here and the
//! session picks it up on its next poll.

use std::sync::mpsc;
use std::thread;

use serde_json::Value;

/// A late result from a background command.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredOutput {
    /// Text to append as-is.
    Text(String),
    /// Data to pass through the renderer first.
    Render { template: String, data: Value },
}

/// Sending half, handed to commands through their environment.
#[derive(Debug, Clone)]
pub struct DeferredSender(mpsc::Sender<DeferredOutput>);

impl DeferredSender {
    /// Post a result. A closed session silently drops it.
    pub fn send(&self, output: DeferredOutput) {
        if self.0.send(output).is_err() {
            log::debug!("deferred output dropped: session closed");
        }
    }

    /// Run `work` on a background thread and post what it returns.
    pub fn spawn<F>(&self, work: F)
    where
        F: FnOnce() -> DeferredOutput + Send + 'static,
    {
        let tx = self.clone();
        thread::spawn(move || tx.send(work()));
    }
}

/// Receiving half, owned by the session.
#[derive(Debug)]
pub struct DeferredReceiver(mpsc::Receiver<DeferredOutput>);

impl DeferredReceiver {
    /// Everything that has arrived so far, in arrival order. Never blocks.
    pub fn drain(&self) -> Vec<DeferredOutput> {
        self.0.try_iter().collect()
    }

    /// Block until the next result arrives or every sender is gone.
    pub fn recv(&self) -> Option<DeferredOutput> {
        self.0.recv().ok()
    }
}

/// Create a connected sender/receiver pair.
pub fn channel() -> (DeferredSender, DeferredReceiver) {
    let (tx, rx) = mpsc::channel();
    (DeferredSender(tx), DeferredReceiver(rx))
}
