// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-oriented record rendering.

use super::Formatter;
use super::inspect::{self, InspectOptions};
use super::json::JsonFormatter;
use crate::Severity;
use crate::log_record::LogRecord;
use crate::value::{Property, Value};
use chrono::{DateTime, SecondsFormat, Utc};
use console::Style;

const LINE_INDENT: &str = "  ";

/**
Multi-line, colorized output for terminals.

```text
2026-01-01T12:00:00.000Z [INFO] request finished
  context.requestId: 'r-1'
  data.status: 200
```

The header carries the timestamp, the bracketed severity and the message. Each context
entry and each data entry follows on its own indented line, rendered by the inspection
renderer. Data that is not an object is written as a single indented line.

Everything else is delegated to the wrapped [`JsonFormatter`]. Colors are decided once,
at construction.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyFormatter {
    base: JsonFormatter,
    colors: bool,
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        PrettyFormatter::new(JsonFormatter::new(), true)
    }
}

impl PrettyFormatter {
    pub const fn new(base: JsonFormatter, colors: bool) -> Self {
        PrettyFormatter { base, colors }
    }

    /// A formatter that never emits ANSI escapes.
    pub const fn plain() -> Self {
        PrettyFormatter::new(JsonFormatter::new(), false)
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    pub fn base(&self) -> &JsonFormatter {
        &self.base
    }

    /// Renders `record` with a fixed timestamp.
    pub fn format_at(&self, record: &LogRecord, timestamp: DateTime<Utc>) -> String {
        let mut lines = vec![self.header(record, timestamp)];

        if let Some(context) = record.context() {
            for (key, value) in context {
                let rendered = self.inspect(&Value::from(value));
                lines.push(self.entry_line("context", key, &rendered));
            }
        }

        match record.data() {
            None => {}
            Some(Value::Object(data)) => {
                for (key, property) in data.entries() {
                    let rendered = match property {
                        Property::Value(v) => self.inspect(&v),
                        Property::Getter(getter) => match getter() {
                            Ok(v) => self.inspect(&v),
                            Err(_) => "[Getter]".to_string(),
                        },
                    };
                    lines.push(self.entry_line("data", &key, &rendered));
                }
            }
            Some(other) => {
                let rendered = self.inspect(other);
                lines.push(format!("{LINE_INDENT}{}", indent_continuation(&rendered)));
            }
        }

        lines.join("\n")
    }

    fn header(&self, record: &LogRecord, timestamp: DateTime<Utc>) -> String {
        let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        let label = format!("[{}]", record.level().label());
        if !self.colors {
            return format!("{timestamp} {label} {}", record.message());
        }
        let label_style = match record.level() {
            Severity::Debug => Style::new().blue(),
            Severity::Info => Style::new().green(),
            Severity::Warn => Style::new().yellow(),
            Severity::Error => Style::new().red(),
            Severity::Fatal => Style::new().white().on_red().bold(),
            Severity::Silent => Style::new(),
        };
        format!(
            "{} {} {}",
            paint(Style::new().black().bright(), &timestamp),
            paint(label_style, &label),
            paint(Style::new().bold(), record.message())
        )
    }

    fn entry_line(&self, prefix: &str, key: &str, rendered: &str) -> String {
        let name = format!("{prefix}.{key}");
        let name = if self.colors {
            paint(Style::new().cyan(), &name)
        } else {
            name
        };
        format!("{LINE_INDENT}{name}: {}", indent_continuation(rendered))
    }

    fn inspect(&self, value: &Value) -> String {
        inspect::inspect(
            value,
            &InspectOptions {
                colors: self.colors,
                ..InspectOptions::default()
            },
        )
    }
}

/// Styles `text` regardless of where the process's stdout points.
fn paint(style: Style, text: &str) -> String {
    style.force_styling(true).apply_to(text).to_string()
}

fn indent_continuation(text: &str) -> String {
    text.replace('\n', &format!("\n{LINE_INDENT}"))
}

impl Formatter for PrettyFormatter {
    fn format(&self, record: &LogRecord) -> String {
        self.format_at(record, Utc::now())
    }

    fn render(&self, value: &Value) -> String {
        self.base.render(value)
    }
}
