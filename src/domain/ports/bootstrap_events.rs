//! Bootstrap Event Port
//!
//! Provides an observable interface for the bootstrap pipeline.
//! The console sink renders colored log lines, the JSON sink writes NDJSON.

use std::path::PathBuf;

/// Event emitted while bootstrapping a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapEvent {
    /// A pipeline step started
    StepStarted { step: String },

    /// A step was skipped because its work is already done
    StepSkipped { step: String, reason: String },

    /// A command is about to run
    CommandStarted { command: String },

    /// A tolerated command failed; the run continues
    CommandTolerated {
        command: String,
        code: Option<i32>,
        note: String,
    },

    /// Informational message
    Info { message: String },

    /// Warning message
    Warning { message: String },

    /// A datastore directory was provisioned
    DirectoryReady {
        path: PathBuf,
        owner: String,
        mode: String,
    },

    /// Tailscale needs the operator to open this URL
    LoginUrl { url: String },

    /// `tailscale up` produced no recognizable URL
    UnexpectedOutput { output: String },

    /// The whole pipeline finished
    Completed,
}

/// Trait for receiving bootstrap events
pub trait BootstrapEventSink {
    fn on_event(&self, event: BootstrapEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BootstrapEventSink for NoopEventSink {
    fn on_event(&self, _event: BootstrapEvent) {}
}

impl<T: BootstrapEventSink + ?Sized> BootstrapEventSink for &T {
    fn on_event(&self, event: BootstrapEvent) {
        (**self).on_event(event)
    }
}
