//! Structured log events and pluggable sinks.
//!
//! Every entity in the simulation reports through an injected [`Logger`]
//! handle rather than a process-wide global, so tests can capture the exact
//! event stream and batch runs can silence it. Emission is synchronous and
//! ordered: a sink observes events in the order the simulation produced them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Severity of a simulation log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational progress output.
    Message,
    /// A rejected or skipped operation; the simulation continues.
    Warning,
    /// A configuration or invariant violation; still non-fatal for the run.
    Error,
}

/// A single structured log event emitted by the simulation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub severity: Severity,
    pub text: String,
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Message => write!(f, "{}", self.text),
            Severity::Warning => write!(f, "[WARNING] {}", self.text),
            Severity::Error => write!(f, "[ERROR] {}", self.text),
        }
    }
}

/// Consumer of simulation log events.
pub trait EventSink {
    fn emit(&self, event: LogEvent);
}

/// Cheap cloneable handle to an [`EventSink`], passed to every simulation
/// entity at construction.
#[derive(Clone)]
pub struct Logger {
    sink: Rc<dyn EventSink>,
}

impl Logger {
    pub fn new(sink: Rc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Logger forwarding each event to the matching `tracing` macro.
    pub fn to_tracing() -> Self {
        Self::new(Rc::new(TracingSink))
    }

    /// Logger that drops every event.
    pub fn disabled() -> Self {
        Self::new(Rc::new(NullSink))
    }

    /// Logger capturing events in memory, together with the capture handle.
    pub fn capturing() -> (Self, Rc<MemorySink>) {
        let sink = Rc::new(MemorySink::default());
        (Self::new(sink.clone()), sink)
    }

    pub fn message(&self, text: impl Into<String>) {
        self.emit(Severity::Message, text);
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.emit(Severity::Warning, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.emit(Severity::Error, text);
    }

    fn emit(&self, severity: Severity, text: impl Into<String>) {
        self.sink.emit(LogEvent {
            severity,
            text: text.into(),
        });
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::to_tracing()
    }
}

/// Sink forwarding events to `tracing` at the matching level.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: LogEvent) {
        match event.severity {
            Severity::Message => tracing::info!("{}", event.text),
            Severity::Warning => tracing::warn!("{}", event.text),
            Severity::Error => tracing::error!("{}", event.text),
        }
    }
}

/// Sink that discards everything.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: LogEvent) {}
}

/// Sink retaining events in insertion order, for assertions in tests.
#[derive(Default)]
pub struct MemorySink {
    events: RefCell<Vec<LogEvent>>,
}

impl MemorySink {
    /// Snapshot of all captured events, oldest first.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.borrow().clone()
    }

    /// Texts of all captured events with the given severity, oldest first.
    pub fn texts_with(&self, severity: Severity) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.severity == severity)
            .map(|e| e.text.clone())
            .collect()
    }

    /// Returns `true` when some event of the given severity contains `needle`.
    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.events
            .borrow()
            .iter()
            .any(|e| e.severity == severity && e.text.contains(needle))
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: LogEvent) {
        self.events.borrow_mut().push(event);
    }
}
