// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide default logger.
//!
//! Code that does not want to thread a [`Logger`] through its call sites can use the
//! default one. It is built lazily from [`LoggerConfig::default`] the first time it is
//! asked for: threshold from `LOG_LEVEL`, indented JSON, stdout, ambient context.
//!
//! # Examples
//!
//! ## Using the default logger
//!
//! ```
//! use scopelog::global_logger::global_logger;
//!
//! let logger = global_logger();
//! logger.debug("written to stdout unless LOG_LEVEL filters it");
//! ```
//!
//! ## Replacing it
//!
//! ```
//! use scopelog::global_logger::{global_logger, set_global_logger};
//! use scopelog::{InMemorySink, JsonFormatter, Logger, LoggerConfig, Severity};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! set_global_logger(Logger::new(
//!     LoggerConfig::new()
//!         .level(Severity::Warn)
//!         .formatter(JsonFormatter::compact())
//!         .sink_arc(sink.clone())
//!         .without_context(),
//! ));
//!
//! global_logger().warn("captured");
//! assert_eq!(sink.records(), vec![r#"{"level":30,"message":"captured"}"#.to_string()]);
//! ```
//!
//! # Implementation Notes
//!
//! The slot is a `parking_lot::RwLock` inside a `OnceLock`. Readers clone the logger out
//! and release the lock before emitting, so a sink that is slow, or that logs itself,
//! never holds up a replacement.

use crate::logger::{Logger, LoggerConfig};
use parking_lot::RwLock;
use std::sync::OnceLock;

static GLOBAL_LOGGER: OnceLock<RwLock<Logger>> = OnceLock::new();

fn slot() -> &'static RwLock<Logger> {
    GLOBAL_LOGGER.get_or_init(|| RwLock::new(Logger::new(LoggerConfig::default())))
}

/// A handle to the current default logger.
///
/// Later calls to [`set_global_logger`] do not affect handles already returned.
pub fn global_logger() -> Logger {
    slot().read().clone()
}

/// Replaces the default logger for every subsequent [`global_logger`] call.
pub fn set_global_logger(logger: Logger) {
    *slot().write() = logger;
}
