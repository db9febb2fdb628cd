// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering values and records to text.
//!
//! Rendering never fails. The building blocks are plain functions so that any
//! formatter can reuse them:
//!
//! - [`json::render`] walks a [`Value`] into JSON, substituting the values JSON cannot
//!   represent, and falls back to [`inspect::inspect`] when the walk faults (cycles,
//!   failing getters).
//! - [`error_map::error_to_object`] turns an [`ErrorValue`] and its cause chain into a
//!   plain [`Object`].
//! - [`inspect::inspect`] is a bounded-depth, cycle-safe human-readable renderer.
//!
//! Two [`Formatter`]s are provided. [`JsonFormatter`] writes one JSON document per
//! record. [`PrettyFormatter`] wraps a `JsonFormatter` and replaces only the
//! record-to-text step with colorized, multi-line output.
//!
//! ```rust
//! use scopelog::format::{Formatter, JsonFormatter};
//! use scopelog::{LogRecord, Severity};
//!
//! let record = LogRecord::new(Severity::Info, "hello");
//! let text = JsonFormatter::compact().format(&record);
//! assert_eq!(text, r#"{"level":20,"message":"hello"}"#);
//! ```

pub mod error_map;
pub mod inspect;
pub mod json;
pub mod pretty;

pub use json::JsonFormatter;
pub use pretty::PrettyFormatter;

use crate::log_record::LogRecord;
use crate::value::{ErrorValue, Object, Value};
use std::fmt::Debug;

/// Turns records into the text handed to a [`Sink`](crate::Sink).
pub trait Formatter: Debug + Send + Sync {
    /// Renders a whole record. Must not panic for any record.
    fn format(&self, record: &LogRecord) -> String;

    /// Renders a single value.
    fn render(&self, value: &Value) -> String;

    /// Converts an error into a plain object. `key` names where the error was found.
    fn render_error(&self, key: &str, error: &ErrorValue) -> Object {
        error_map::error_to_object(key, error)
    }
}
