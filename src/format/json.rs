// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured (JSON) rendering.

use super::Formatter;
use super::error_map;
use super::inspect::{self, InspectOptions};
use crate::error::ScopelogError;
use crate::log_record::LogRecord;
use crate::value::{Property, Value};
use serde_json::{Map, Number, Value as Json};

/// Largest integer a JSON consumer can be expected to read back exactly.
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Stand-in for a missing value, which JSON cannot express.
pub const UNDEFINED_SENTINEL: &str = "FakeValue { undefined }";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    /// Single line output. Otherwise two-space indentation.
    pub compact: bool,
}

/**
Renders any value to text.

Primitives are stringified directly. Everything else is walked into JSON; if that
walk faults the value is rendered by the inspection renderer instead, so the result
is always some text, though not always valid JSON.
*/
pub fn render(value: &Value, options: &JsonOptions) -> String {
    render_within(value, options, &[])
}

/// Renders a value reached while the containers in `ancestors` are being walked.
pub(crate) fn render_within(
    value: &Value,
    options: &JsonOptions,
    ancestors: &[usize],
) -> String {
    if let Some(text) = stringify_primitive(value) {
        return text;
    }
    let mut walker = JsonWalker {
        ancestors: ancestors.to_vec(),
    };
    match walker.walk("", value) {
        Ok(json) => write_json(&json, options),
        Err(_) => inspect::inspect(
            value,
            &InspectOptions {
                compact: options.compact,
                ..InspectOptions::default()
            },
        ),
    }
}

/// Walks a value into a [`serde_json::Value`], applying the substitution rules.
///
/// Fails on reference cycles and on getters that fail.
pub fn to_json(value: &Value) -> Result<Json, ScopelogError> {
    JsonWalker::default().walk("", value)
}

fn write_json(json: &Json, options: &JsonOptions) -> String {
    let written = if options.compact {
        serde_json::to_string(json)
    } else {
        serde_json::to_string_pretty(json)
    };
    // Serializing an in-memory serde_json::Value with string keys cannot fail.
    written.unwrap_or_default()
}

fn stringify_primitive(value: &Value) -> Option<String> {
    Some(match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => inspect::format_float(*f),
        Value::String(s) => s.clone(),
        _ => return None,
    })
}

/// Warning payload written in place of an unresolved future.
pub fn pending_warning(key: &str) -> String {
    let key = if key.is_empty() { "<root>" } else { key };
    format!(
        "Warning: \"{key}\" is a pending future. Loggers must never depend on unresolved values; await it first."
    )
}

#[derive(Default)]
struct JsonWalker {
    /// Identities of the containers currently being walked.
    ancestors: Vec<usize>,
}

impl JsonWalker {
    fn walk(&mut self, key: &str, value: &Value) -> Result<Json, ScopelogError> {
        Ok(match value {
            Value::Undefined => Json::String(UNDEFINED_SENTINEL.to_string()),
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => {
                if i.unsigned_abs() > MAX_SAFE_INTEGER {
                    Json::String(i.to_string())
                } else {
                    Json::Number((*i).into())
                }
            }
            Value::UInt(u) => {
                if *u > MAX_SAFE_INTEGER {
                    Json::String(u.to_string())
                } else {
                    Json::Number((*u).into())
                }
            }
            Value::Float(f) => float_to_json(*f),
            Value::BigInt(i) => Json::String(i.to_string()),
            Value::String(s) => Json::String(s.clone()),
            Value::Regex { source, flags } => {
                Json::String(format!("Regexp {{ /{source}/{flags} }}"))
            }
            Value::Pending => Json::String(pending_warning(key)),
            Value::Function { .. } => Json::String(inspect::inspect_compact(value)),
            Value::Array(array) => {
                self.enter(array.addr(), key)?;
                let mut items = Vec::with_capacity(array.len());
                for (index, item) in array.items().iter().enumerate() {
                    items.push(self.walk(&index.to_string(), item)?);
                }
                self.ancestors.pop();
                Json::Array(items)
            }
            Value::Object(object) => {
                self.enter(object.addr(), key)?;
                let mut map = Map::new();
                for (k, property) in object.entries() {
                    let v = match property {
                        Property::Value(v) => v,
                        Property::Getter(getter) => getter().map_err(|reason| {
                            ScopelogError::Getter {
                                key: k.clone(),
                                reason,
                            }
                        })?,
                    };
                    let json = self.walk(&k, &v)?;
                    map.insert(k, json);
                }
                self.ancestors.pop();
                Json::Object(map)
            }
            Value::Error(error) => {
                self.enter(error.addr(), key)?;
                let mapped = error_map::error_to_object_within(key, error, &self.ancestors);
                let json = self.walk(key, &Value::Object(mapped))?;
                self.ancestors.pop();
                json
            }
        })
    }

    fn enter(&mut self, addr: usize, key: &str) -> Result<(), ScopelogError> {
        if self.ancestors.contains(&addr) {
            return Err(ScopelogError::Circular(key.to_string()));
        }
        self.ancestors.push(addr);
        Ok(())
    }
}

fn float_to_json(f: f64) -> Json {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER as f64 {
        return Json::Number((f as i64).into());
    }
    Number::from_f64(f).map(Json::Number).unwrap_or(Json::Null)
}

/**
Writes each record as one JSON object with keys `level`, `message`, `data`, `context`.

`data` and `context` are omitted when the record has none.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonFormatter {
    options: JsonOptions,
}

impl JsonFormatter {
    /// Two-space indented output.
    pub const fn new() -> Self {
        JsonFormatter {
            options: JsonOptions { compact: false },
        }
    }

    /// Single line output.
    pub const fn compact() -> Self {
        JsonFormatter {
            options: JsonOptions { compact: true },
        }
    }

    pub const fn with_options(options: JsonOptions) -> Self {
        JsonFormatter { options }
    }

    pub fn options(&self) -> &JsonOptions {
        &self.options
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> String {
        render(&record.to_value(), &self.options)
    }

    fn render(&self, value: &Value) -> String {
        render(value, &self.options)
    }
}
