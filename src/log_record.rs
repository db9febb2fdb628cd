// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type.
//!
//! A [`LogRecord`] is built fresh for every emitted call, handed by reference to a
//! [`Formatter`](crate::format::Formatter), and dropped once the text reaches the sink.
//!
//! # Example
//!
//! ```rust
//! use scopelog::{LogRecord, Object, Severity};
//!
//! let data = Object::new();
//! data.insert("attempt", 3);
//! let record = LogRecord::new(Severity::Warn, "retrying").with_data(data);
//! assert_eq!(record.to_string(), r#"{"level":30,"message":"retrying","data":{"attempt":3}}"#);
//! ```

use crate::Severity;
use crate::context::ContextMap;
use crate::format::Formatter;
use crate::format::json::JsonFormatter;
use crate::value::{Object, Value};
use std::fmt::Display;

/**
One log event: severity, message, optional data, optional ambient context.

`data` holds whatever the logger assembled from its scope and the call site. `context`
is kept apart from `data` so tracing metadata stays distinguishable from business data.
*/
#[derive(Debug, Clone)]
pub struct LogRecord {
    level: Severity,
    message: String,
    data: Option<Value>,
    context: Option<ContextMap>,
}

impl LogRecord {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            data: None,
            context: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_context(mut self, context: ContextMap) -> Self {
        self.context = Some(context);
        self
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn context(&self) -> Option<&ContextMap> {
        self.context.as_ref()
    }

    /// The record as an object with keys `level, message, data?, context?`.
    pub fn to_value(&self) -> Value {
        let object = Object::new();
        object.insert("level", self.level.as_u8());
        object.insert("message", self.message.as_str());
        if let Some(data) = &self.data {
            object.insert("data", data.clone());
        }
        if let Some(context) = &self.context {
            let context: Object = context.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            object.insert("context", context);
        }
        object.into()
    }
}

impl Display for LogRecord {
    /// Compact JSON.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&JsonFormatter::compact().format(self))
    }
}

/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug, Clone: Derived. Clone copies the data handle, not the data.
- Display: compact JSON, the same text a compact JsonFormatter produces.

NOT IMPLEMENTED:
- PartialEq/Eq/Hash: Value compares composites by identity, so record equality would
  be surprising.
- Default: a record without a message or level is meaningless.
- Copy: owns heap data.
*/
