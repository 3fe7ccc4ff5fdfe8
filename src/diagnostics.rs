use std::sync::{Mutex, PoisonError};

/// Sink for non-fatal problems found while parsing a declaration, such as a
/// `$`-prefixed key that matches no registered implementation.
pub trait Diagnostics: Send + Sync {
    fn warn(&self, message: &str);
}

/// Discards every warning. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn warn(&self, _message: &str) {}
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "exclaim", "{}", message);
    }
}

/// Keeps warnings in memory so a host can inspect them after parsing.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
