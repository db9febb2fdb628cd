// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logger: severity filtering, scope merging and delivery to a sink.
//!
//! A [`Logger`] is immutable once built. Adding scope produces a new logger through
//! [`Logger::child`]; the parent is never touched.
//!
//! ```rust
//! use scopelog::{InMemorySink, JsonFormatter, Logger, LoggerConfig, Severity, object};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let logger = Logger::new(
//!     LoggerConfig::new()
//!         .level(Severity::Info)
//!         .formatter(JsonFormatter::compact())
//!         .sink_arc(sink.clone())
//!         .scope(object! { "service" => "billing" }),
//! );
//!
//! logger.debug("filtered out");
//! logger.info_with("charged", object! { "amount" => 12 });
//!
//! assert_eq!(
//!     sink.records(),
//!     vec![r#"{"level":20,"message":"charged","data":{"service":"billing","amount":12}}"#.to_string()]
//! );
//! ```

use crate::context::{self, ContextMap};
use crate::format::{Formatter, JsonFormatter};
use crate::level::Severity;
use crate::log_record::LogRecord;
use crate::sink::Sink;
use crate::stdout_sink::StdoutSink;
use crate::value::{Object, Value};
use std::fmt::Debug;
use std::sync::Arc;

/// Reads the ambient context at emission time.
pub type ContextAccessor = Arc<dyn Fn() -> Option<ContextMap> + Send + Sync>;

/**
Construction parameters for a [`Logger`].

Every setter consumes and returns the builder.

| Setting | Default |
|---------|---------|
| scope | empty |
| threshold | `LOG_LEVEL`, else `debug` |
| formatter | [`JsonFormatter::new`] (indented JSON) |
| sink | [`StdoutSink`] |
| context | [`current_context`](crate::context::current_context) |
*/
#[derive(Clone)]
pub struct LoggerConfig {
    scope: Object,
    level: Option<Severity>,
    level_name: Option<String>,
    formatter: Arc<dyn Formatter>,
    sink: Arc<dyn Sink>,
    context: Option<ContextAccessor>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            scope: Object::new(),
            level: None,
            level_name: None,
            formatter: Arc::new(JsonFormatter::new()),
            sink: Arc::new(StdoutSink::new()),
            context: Some(Arc::new(context::current_context)),
        }
    }
}

impl Debug for LoggerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("scope", &self.scope)
            .field("level", &self.level)
            .field("level_name", &self.level_name)
            .field("formatter", &self.formatter)
            .field("sink", &self.sink)
            .field("context", &self.context.is_some())
            .finish()
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial scope, copied into the logger.
    pub fn scope(mut self, scope: Object) -> Self {
        self.scope = scope;
        self
    }

    /// Explicit threshold. Takes precedence over `LOG_LEVEL`.
    pub fn level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self.level_name = None;
        self
    }

    /// Threshold by name. An unrecognized name resolves to `debug`.
    pub fn level_name(mut self, name: impl Into<String>) -> Self {
        self.level_name = Some(name.into());
        self.level = None;
        self
    }

    pub fn formatter(self, formatter: impl Formatter + 'static) -> Self {
        self.formatter_arc(Arc::new(formatter))
    }

    pub fn formatter_arc(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn sink(self, sink: impl Sink + 'static) -> Self {
        self.sink_arc(Arc::new(sink))
    }

    /// Shares a sink with the caller, e.g. an [`InMemorySink`](crate::InMemorySink) a test
    /// keeps a handle to.
    pub fn sink_arc(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn context_accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn() -> Option<ContextMap> + Send + Sync + 'static,
    {
        self.context = Some(Arc::new(accessor));
        self
    }

    /// Records carry no `context` field.
    pub fn without_context(mut self) -> Self {
        self.context = None;
        self
    }

    fn resolve_level(&self) -> Severity {
        match (&self.level, &self.level_name) {
            (Some(level), _) => *level,
            (None, Some(name)) => Severity::resolve_name(Some(name.as_str()), None),
            (None, None) => Severity::from_env(None),
        }
    }
}

/**
Emits [`LogRecord`]s at or above a threshold.

Cloning is cheap; clones share formatter, sink and scope. The scope is never written
after construction.

Each emitted call writes exactly one formatted string to the sink. Rendering never
fails, so no method here returns an error.
*/
#[derive(Clone)]
pub struct Logger {
    scope: Object,
    level: Severity,
    formatter: Arc<dyn Formatter>,
    sink: Arc<dyn Sink>,
    context: Option<ContextAccessor>,
}

impl Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("scope", &self.scope)
            .field("level", &self.level)
            .field("formatter", &self.formatter)
            .field("sink", &self.sink)
            .field("context", &self.context.is_some())
            .finish()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new(LoggerConfig::default())
    }
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Logger {
        let level = config.resolve_level();
        let scope = Object::new();
        scope.extend_from(&config.scope);
        Logger {
            scope,
            level,
            formatter: config.formatter,
            sink: config.sink,
            context: config.context,
        }
    }

    /// A logger whose scope is this one's overlaid with `additions`.
    ///
    /// ```rust
    /// use scopelog::{Logger, object};
    ///
    /// let parent = Logger::default().child(object! { "a" => 1 });
    /// let child = parent.child(object! { "b" => 2 });
    /// assert_eq!(parent.scope().keys(), vec!["a"]);
    /// assert_eq!(child.scope().keys(), vec!["a", "b"]);
    /// ```
    pub fn child(&self, additions: Object) -> Logger {
        let scope = Object::new();
        scope.extend_from(&self.scope);
        scope.extend_from(&additions);
        Logger {
            scope,
            ..self.clone()
        }
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    /// Whether a call at `level` would be emitted.
    pub fn enabled(&self, level: Severity) -> bool {
        level != Severity::Silent && level >= self.level
    }

    /// A copy of this logger's scope. Changing the copy does not affect the logger.
    pub fn scope(&self) -> Object {
        let copy = Object::new();
        copy.extend_from(&self.scope);
        copy
    }

    pub fn formatter(&self) -> &Arc<dyn Formatter> {
        &self.formatter
    }

    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message, None);
    }

    pub fn debug_with(&self, message: &str, data: impl Into<Value>) {
        self.log(Severity::Debug, message, Some(data.into()));
    }

    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message, None);
    }

    pub fn info_with(&self, message: &str, data: impl Into<Value>) {
        self.log(Severity::Info, message, Some(data.into()));
    }

    pub fn warn(&self, message: &str) {
        self.log(Severity::Warn, message, None);
    }

    pub fn warn_with(&self, message: &str, data: impl Into<Value>) {
        self.log(Severity::Warn, message, Some(data.into()));
    }

    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message, None);
    }

    pub fn error_with(&self, message: &str, data: impl Into<Value>) {
        self.log(Severity::Error, message, Some(data.into()));
    }

    pub fn fatal(&self, message: &str) {
        self.log(Severity::Fatal, message, None);
    }

    pub fn fatal_with(&self, message: &str, data: impl Into<Value>) {
        self.log(Severity::Fatal, message, Some(data.into()));
    }

    /// Never emits.
    pub fn silent(&self, _message: &str) {}

    /// Never emits; `data` is not inspected.
    pub fn silent_with(&self, _message: &str, _data: impl Into<Value>) {}

    pub fn log(&self, level: Severity, message: &str, data: Option<Value>) {
        if !self.enabled(level) {
            return;
        }
        let mut record = LogRecord::new(level, message);
        if let Some(data) = self.assemble_data(data) {
            record = record.with_data(data);
        }
        if let Some(context) = self.context.as_ref().and_then(|accessor| accessor()) {
            record = record.with_context(context);
        }
        self.sink.write(&self.formatter.format(&record));
    }

    /// Scope first, call-site data second.
    fn assemble_data(&self, data: Option<Value>) -> Option<Value> {
        if data.is_none() && self.scope.is_empty() {
            return None;
        }
        let merged = Object::new();
        merged.extend_from(&self.scope);
        match data {
            None | Some(Value::Undefined) => {}
            Some(Value::Error(error)) => {
                merged.extend_from(&self.formatter.render_error("data", &error));
            }
            Some(Value::Object(object)) => merged.extend_from(&object),
            Some(other) => merged.insert("data", other),
        }
        Some(merged.into())
    }
}

/*
Boilerplate notes.

# LoggerConfig / Logger

Clone: yes, both hold only Arcs and shared handles.
PartialEq/Eq/Hash: no. Formatter and sink are trait objects; equality would have to mean
identity, which is not what a caller comparing loggers expects.
Default: yes, the documented defaults.
Display: no.
Send/Sync: yes, every field is Send + Sync.
*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory_sink::InMemorySink;
    use crate::value::ErrorValue;

    fn capture(level: Severity) -> (Logger, Arc<InMemorySink>) {
        let sink = Arc::new(InMemorySink::new());
        let logger = Logger::new(
            LoggerConfig::new()
                .level(level)
                .formatter(JsonFormatter::compact())
                .sink_arc(sink.clone())
                .without_context(),
        );
        (logger, sink)
    }

    #[test]
    fn threshold_filters_lower_severities() {
        let (logger, sink) = capture(Severity::Warn);
        logger.debug("d");
        logger.info("i");
        assert_eq!(sink.len(), 0);
        logger.warn("w");
        assert_eq!(sink.len(), 1);
        logger.error("e");
        assert_eq!(sink.len(), 2);
        logger.fatal("f");
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn silent_never_emits() {
        let (logger, sink) = capture(Severity::Debug);
        logger.silent("quiet");
        logger.silent_with("quiet", 1);
        logger.log(Severity::Silent, "quiet", None);
        assert!(sink.is_empty());

        let (muted, sink) = capture(Severity::Silent);
        muted.fatal("nothing");
        assert!(sink.is_empty());
    }

    #[test]
    fn call_site_data_overrides_scope() {
        let (root, sink) = capture(Severity::Debug);
        let child = root
            .child(object! { "a" => 1 })
            .child(object! { "b" => 2 });
        child.info_with("merged", object! { "b" => 3, "c" => 4 });
        assert_eq!(
            sink.drain_logs(),
            r#"{"level":20,"message":"merged","data":{"a":1,"b":3,"c":4}}"#
        );
    }

    #[test]
    fn children_are_independent() {
        let (root, sink) = capture(Severity::Debug);
        let parent = root.child(object! { "a" => 1 });
        let _child = parent.child(object! { "a" => 2, "b" => 3 });
        parent.info("parent");
        assert_eq!(
            sink.drain_logs(),
            r#"{"level":20,"message":"parent","data":{"a":1}}"#
        );
    }

    #[test]
    fn scope_copies_do_not_leak_into_the_logger() {
        let (root, sink) = capture(Severity::Debug);
        let logger = root.child(object! { "a" => 1 });
        let clone = logger.clone();
        clone.scope().insert("leak", true);
        logger.scope().insert("leak", true);
        logger.info("x");
        clone.info("y");
        assert_eq!(
            sink.records(),
            vec![
                r#"{"level":20,"message":"x","data":{"a":1}}"#,
                r#"{"level":20,"message":"y","data":{"a":1}}"#,
            ]
        );
    }

    #[test]
    fn scalar_data_is_wrapped() {
        let (logger, sink) = capture(Severity::Debug);
        logger.info_with("count", 7);
        assert_eq!(
            sink.drain_logs(),
            r#"{"level":20,"message":"count","data":{"data":7}}"#
        );
    }

    #[test]
    fn error_data_is_mapped_and_merged() {
        let (logger, sink) = capture(Severity::Debug);
        let error = ErrorValue::with_parts("TypeError", "bad input", "TypeError: bad input")
            .with_field("code", "E_BAD");
        logger.error_with("failed", error);
        assert_eq!(
            sink.drain_logs(),
            r#"{"level":40,"message":"failed","data":{"name":"TypeError","message":"bad input","stack":"TypeError: bad input","code":"E_BAD"}}"#
        );
    }

    #[test]
    fn no_data_without_scope_or_call_data() {
        let (logger, sink) = capture(Severity::Debug);
        logger.info("bare");
        assert_eq!(sink.drain_logs(), r#"{"level":20,"message":"bare"}"#);
    }

    #[test]
    fn context_comes_from_the_accessor() {
        let sink = Arc::new(InMemorySink::new());
        let logger = Logger::new(
            LoggerConfig::new()
                .level(Severity::Debug)
                .formatter(JsonFormatter::compact())
                .sink_arc(sink.clone())
                .context_accessor(|| {
                    let mut map = ContextMap::new();
                    map.insert("requestId".into(), "fixed".into());
                    Some(map)
                }),
        );
        logger.info_with("hi", object! { "x" => true });
        assert_eq!(
            sink.drain_logs(),
            r#"{"level":20,"message":"hi","data":{"x":true},"context":{"requestId":"fixed"}}"#
        );
    }

    #[test]
    fn level_name_is_resolved_totally() {
        let logger = Logger::new(LoggerConfig::new().level_name("error"));
        assert_eq!(logger.level(), Severity::Error);
        let logger = Logger::new(LoggerConfig::new().level_name("LOUD"));
        assert_eq!(logger.level(), Severity::Debug);
    }

    #[test]
    fn enabled_matches_emission() {
        let (logger, _) = capture(Severity::Info);
        assert!(!logger.enabled(Severity::Debug));
        assert!(logger.enabled(Severity::Info));
        assert!(logger.enabled(Severity::Fatal));
        assert!(!logger.enabled(Severity::Silent));
    }
}
