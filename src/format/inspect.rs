// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable inspection of arbitrary values.
//!
//! This renderer accepts every [`Value`], including cyclic graphs and objects whose
//! getters fail. It is the fallback for the JSON path and the main renderer of the
//! pretty formatter.
//!
//! - Composites nested deeper than [`InspectOptions::depth`] collapse to `[Object]`,
//!   `[Array]` or `[Name: message]`.
//! - A container that is reached again while it is still being rendered is written as
//!   `[Circular *N]`, and the container itself is prefixed with `<ref *N>`.
//! - A getter that fails is written as `[Getter]`.
//! - Functions are written as `[Function: name]`.
//!
//! In compact mode everything is written on one line. Otherwise a container that does
//! not fit the line-width budget is broken up, one entry per line, indented by
//! [`INDENT_UNIT`] spaces per level.

use crate::value::{Array, ErrorValue, Object, Property, Value};
use console::Style;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const INDENT_UNIT: usize = 2;
pub const DEFAULT_BREAK_LENGTH: usize = 80;
pub const DEFAULT_DEPTH: usize = 2;
/// Arrays longer than this are truncated with a `... N more items` entry.
pub const MAX_ARRAY_LENGTH: usize = 100;

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\x1b\\[[0-9;]*m").expect("static pattern"));
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOptions {
    /// How many levels of nesting to render. `None` is unbounded.
    pub depth: Option<usize>,
    /// Write everything on a single line.
    pub compact: bool,
    /// Line-width budget for non-compact output.
    pub break_length: usize,
    /// Color tokens with ANSI escapes.
    pub colors: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        InspectOptions {
            depth: Some(DEFAULT_DEPTH),
            compact: false,
            break_length: DEFAULT_BREAK_LENGTH,
            colors: false,
        }
    }
}

/// Renders `value` for humans. Never fails and always terminates.
pub fn inspect(value: &Value, options: &InspectOptions) -> String {
    Inspector::new(options).format_value(value, 0)
}

/// Single line, uncolored inspection with the default depth.
pub fn inspect_compact(value: &Value) -> String {
    inspect(
        value,
        &InspectOptions {
            compact: true,
            ..InspectOptions::default()
        },
    )
}

/// Number formatting shared with the JSON renderer.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        f.to_string()
    }
}

/// Quotes a string the way inspection output does: single quotes unless the text
/// contains them, with control characters escaped.
pub fn quote(s: &str) -> String {
    let quote = if !s.contains('\'') {
        '\''
    } else if !s.contains('"') {
        '"'
    } else if !s.contains('`') && !s.contains("${") {
        '`'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Length of `s` as it appears on a terminal.
pub fn visible_len(s: &str) -> usize {
    ANSI_ESCAPE.replace_all(s, "").chars().count()
}

#[derive(Clone, Copy)]
enum Token {
    String,
    Number,
    Boolean,
    Undefined,
    Null,
    Regexp,
    Special,
}

enum Composite<'a> {
    Array(&'a Array),
    Object(&'a Object),
    Error(&'a ErrorValue),
}

struct Inspector<'o> {
    options: &'o InspectOptions,
    /// Containers on the current path.
    seen: Vec<usize>,
    /// Containers found to be the target of a back-reference, with their marker id.
    circular: HashMap<usize, usize>,
    indentation: usize,
}

impl<'o> Inspector<'o> {
    fn new(options: &'o InspectOptions) -> Self {
        Inspector {
            options,
            seen: Vec::new(),
            circular: HashMap::new(),
            indentation: 0,
        }
    }

    fn stylize(&self, text: &str, token: Token) -> String {
        if !self.options.colors {
            return text.to_string();
        }
        let style = match token {
            Token::String => Style::new().green(),
            Token::Number | Token::Boolean => Style::new().yellow(),
            Token::Undefined => Style::new().black().bright(),
            Token::Null => Style::new().bold(),
            Token::Regexp => Style::new().red(),
            Token::Special => Style::new().cyan(),
        };
        style.force_styling(true).apply_to(text).to_string()
    }

    fn format_value(&mut self, value: &Value, recurse_times: usize) -> String {
        match value {
            Value::Undefined => self.stylize("undefined", Token::Undefined),
            Value::Null => self.stylize("null", Token::Null),
            Value::Bool(b) => self.stylize(&b.to_string(), Token::Boolean),
            Value::Int(i) => self.stylize(&i.to_string(), Token::Number),
            Value::UInt(u) => self.stylize(&u.to_string(), Token::Number),
            Value::Float(f) => self.stylize(&format_float(*f), Token::Number),
            Value::BigInt(i) => self.stylize(&format!("{i}n"), Token::Number),
            Value::String(s) => self.stylize(&quote(s), Token::String),
            Value::Regex { source, flags } => {
                self.stylize(&format!("/{source}/{flags}"), Token::Regexp)
            }
            Value::Pending => format!("Promise {{ {} }}", self.stylize("<pending>", Token::Special)),
            Value::Function { name } => {
                let label = match name {
                    Some(name) => format!("[Function: {name}]"),
                    None => "[Function (anonymous)]".to_string(),
                };
                self.stylize(&label, Token::Special)
            }
            Value::Array(array) => {
                self.format_composite(array.addr(), recurse_times, Composite::Array(array))
            }
            Value::Object(object) => {
                self.format_composite(object.addr(), recurse_times, Composite::Object(object))
            }
            Value::Error(error) => {
                self.format_composite(error.addr(), recurse_times, Composite::Error(error))
            }
        }
    }

    fn format_composite(
        &mut self,
        addr: usize,
        recurse_times: usize,
        composite: Composite<'_>,
    ) -> String {
        if self.seen.contains(&addr) {
            let next = self.circular.len() + 1;
            let id = *self.circular.entry(addr).or_insert(next);
            return self.stylize(&format!("[Circular *{id}]"), Token::Special);
        }
        if self.options.depth.is_some_and(|depth| recurse_times > depth) {
            let placeholder = match &composite {
                Composite::Array(_) => "[Array]".to_string(),
                Composite::Object(_) => "[Object]".to_string(),
                Composite::Error(e) => format!("[{}: {}]", e.name(), e.message()),
            };
            return self.stylize(&placeholder, Token::Special);
        }

        self.seen.push(addr);
        self.indentation += INDENT_UNIT;
        let (open, close, entries) = match composite {
            Composite::Array(array) => ("[".to_string(), "]", self.array_entries(array, recurse_times)),
            Composite::Object(object) => ("{".to_string(), "}", self.object_entries(object, recurse_times)),
            Composite::Error(error) => {
                let base = if error.stack().is_empty() {
                    format!("[{}: {}]", error.name(), error.message())
                } else {
                    error.stack().to_string()
                };
                let entries = self.error_entries(error, recurse_times);
                if entries.is_empty() {
                    self.indentation -= INDENT_UNIT;
                    self.seen.pop();
                    return self.with_ref_prefix(addr, base);
                }
                (format!("{base} {{"), "}", entries)
            }
        };
        self.indentation -= INDENT_UNIT;
        self.seen.pop();

        let out = self.reduce_to_single_string(&open, close, &entries);
        self.with_ref_prefix(addr, out)
    }

    fn with_ref_prefix(&self, addr: usize, out: String) -> String {
        match self.circular.get(&addr) {
            Some(id) => format!("{} {out}", self.stylize(&format!("<ref *{id}>"), Token::Special)),
            None => out,
        }
    }

    fn array_entries(&mut self, array: &Array, recurse_times: usize) -> Vec<String> {
        let items = array.items();
        let mut entries: Vec<String> = items
            .iter()
            .take(MAX_ARRAY_LENGTH)
            .map(|item| self.format_value(item, recurse_times + 1))
            .collect();
        if items.len() > MAX_ARRAY_LENGTH {
            let remaining = items.len() - MAX_ARRAY_LENGTH;
            let plural = if remaining > 1 { "s" } else { "" };
            entries.push(format!("... {remaining} more item{plural}"));
        }
        entries
    }

    fn object_entries(&mut self, object: &Object, recurse_times: usize) -> Vec<String> {
        object
            .entries()
            .into_iter()
            .map(|(key, property)| {
                let rendered = match property {
                    Property::Value(v) => self.format_value(&v, recurse_times + 1),
                    Property::Getter(getter) => match getter() {
                        Ok(v) => self.format_value(&v, recurse_times + 1),
                        Err(_) => self.stylize("[Getter]", Token::Special),
                    },
                };
                format!("{}: {rendered}", self.format_key(&key))
            })
            .collect()
    }

    fn error_entries(&mut self, error: &ErrorValue, recurse_times: usize) -> Vec<String> {
        let mut entries: Vec<String> = error
            .fields()
            .into_iter()
            .map(|(key, v)| {
                let rendered = self.format_value(&v, recurse_times + 1);
                format!("{}: {rendered}", self.format_key(&key))
            })
            .collect();
        if let Some(cause) = error.cause() {
            let rendered = self.format_value(&cause, recurse_times + 1);
            entries.push(format!("[cause]: {rendered}"));
        }
        entries
    }

    fn format_key(&self, key: &str) -> String {
        if IDENTIFIER.is_match(key) {
            key.to_string()
        } else {
            self.stylize(&quote(key), Token::String)
        }
    }

    fn reduce_to_single_string(&self, open: &str, close: &str, entries: &[String]) -> String {
        if entries.is_empty() {
            return format!("{open}{close}");
        }
        if self.options.compact || self.fits_on_one_line(open, entries) {
            return format!("{open} {} {close}", entries.join(", "));
        }
        let indentation = " ".repeat(self.indentation);
        let inner = format!("{indentation}{}", " ".repeat(INDENT_UNIT));
        format!(
            "{open}\n{inner}{}\n{indentation}{close}",
            entries.join(&format!(",\n{inner}"))
        )
    }

    fn fits_on_one_line(&self, open: &str, entries: &[String]) -> bool {
        if open.contains('\n') || entries.iter().any(|e| e.contains('\n')) {
            return false;
        }
        let start = entries.len() + self.indentation + open.len() + 10;
        let total = start + entries.iter().map(|e| visible_len(e)).sum::<usize>();
        total <= self.options.break_length
    }
}
