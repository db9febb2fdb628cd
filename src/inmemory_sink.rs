// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! A sink that keeps formatted records in memory instead of writing them anywhere.
//! This is what tests use to assert on logger output:
//!
//! - exactly how many records a call produced
//! - the exact text of each record
//!
//! The buffer is a `Mutex<Vec<String>>`, so one sink can be shared through `Arc` by
//! loggers on different threads.

use crate::sink::Sink;
use std::sync::Mutex;

/// A sink that stores each record as one `String`.
///
/// # Example
///
/// ```rust
/// use scopelog::{InMemorySink, Logger, LoggerConfig, JsonFormatter};
/// use std::sync::Arc;
///
/// let sink = Arc::new(InMemorySink::new());
/// let logger = Logger::new(
///     LoggerConfig::new()
///         .formatter(JsonFormatter::compact())
///         .sink_arc(sink.clone()),
/// );
///
/// logger.info("hello");
///
/// assert_eq!(sink.records(), vec![r#"{"level":20,"message":"hello"}"#.to_string()]);
/// ```
#[derive(Debug)]
pub struct InMemorySink {
    logs: Mutex<Vec<String>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: Derived for diagnostic purposes and required by Sink
// - Default: Implemented with obvious zero-value (empty buffer)
// - Clone: NOT implemented - a clone would silently split the captured records
// - PartialEq/Eq/Hash: NOT implemented - mutex state comparison is problematic
// - Send/Sync: Automatically implemented due to Mutex usage (required for Sink)

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Drains all records into a single string joined by newlines, clearing the buffer.
    ///
    /// ```rust
    /// use scopelog::{InMemorySink, Sink};
    ///
    /// let sink = InMemorySink::new();
    /// sink.write("first");
    /// sink.write("second");
    /// assert_eq!(sink.drain_logs(), "first\nsecond");
    /// assert_eq!(sink.drain_logs(), "");
    /// ```
    pub fn drain_logs(&self) -> String {
        let mut logs = self.lock();
        let result = logs.join("\n");
        logs.clear();
        result
    }

    /// A copy of the captured records, oldest first.
    pub fn records(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Writes every captured record to stderr and clears the buffer.
    pub fn drain_to_console(&self) {
        let mut logs = self.lock();
        for log in logs.iter() {
            eprintln!("{}", log);
        }
        logs.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock leaves the Vec intact; keep using it.
        self.logs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Sink for InMemorySink {
    fn write(&self, text: &str) {
        self.lock().push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn records_are_kept_in_order() {
        let sink = InMemorySink::new();
        sink.write("a");
        sink.write("b");
        assert_eq!(sink.records(), vec!["a", "b"]);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn concurrent_writes_are_all_captured() {
        let sink = Arc::new(InMemorySink::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        sink.write(&format!("{i}-{j}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sink.len(), 100);
        sink.drain_to_console();
        assert!(sink.is_empty());
    }
}
