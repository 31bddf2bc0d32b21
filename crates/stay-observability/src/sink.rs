//! Log output destinations.

use std::sync::Mutex;

use crate::logging::LogEntry;

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync {
    /// Write one entry; `line` is the entry already formatted.
    fn write(&self, entry: &LogEntry, line: &str);
}

/// Writes lines to stderr (the host captures this).
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, _entry: &LogEntry, line: &str) {
        eprintln!("{}", line);
    }
}

/// Keeps entries in memory.
#[derive(Debug, Default)]
pub struct CaptureSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured entries in emission order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        // A poisoned buffer still holds valid entries.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for CaptureSink {
    fn write(&self, entry: &LogEntry, _line: &str) {
        self.lock().push(entry.clone());
    }
}
