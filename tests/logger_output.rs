// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end checks of what a logger hands to its sink.

use scopelog::{
    ErrorValue, InMemorySink, JsonFormatter, Logger, LoggerConfig, PrettyFormatter, Severity,
    Sink, Value, object,
};
use std::sync::{Arc, Mutex};

fn logger_at(level: Severity) -> (Logger, Arc<InMemorySink>) {
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

fn parse(record: &str) -> serde_json::Value {
    serde_json::from_str(record).expect("record is JSON")
}

#[test]
fn warn_threshold_counts() {
    let (logger, sink) = logger_at(Severity::Warn);
    logger.debug("no");
    logger.info_with("no", object! { "x" => 1 });
    assert_eq!(sink.len(), 0);

    logger.warn("yes");
    assert_eq!(sink.len(), 1);
    logger.error("yes");
    assert_eq!(sink.len(), 2);
    logger.fatal("yes");
    assert_eq!(sink.len(), 3);
}

#[test]
fn scope_merge_precedence() {
    let (root, sink) = logger_at(Severity::Debug);
    let child = root.child(object! { "a" => 1 }).child(object! { "b" => 2 });
    child.warn_with("merged", object! { "b" => 3, "c" => 4 });

    let record = parse(&sink.drain_logs());
    assert_eq!(record["level"], 30);
    assert_eq!(record["message"], "merged");
    assert_eq!(record["data"], serde_json::json!({ "a": 1, "b": 3, "c": 4 }));
}

#[test]
fn error_causes_reach_the_record() {
    let (logger, sink) = logger_at(Severity::Debug);
    let root = ErrorValue::with_parts("Error", "Root cause", "Error: Root cause");
    let middle = ErrorValue::with_parts("Error", "Middle", "Error: Middle").with_cause(root);
    let top = ErrorValue::with_parts("Error", "Top", "Error: Top").with_cause(middle);
    logger.error_with("request failed", top);

    let record = parse(&sink.drain_logs());
    assert_eq!(record["data"]["message"], "Top");
    assert_eq!(record["data"]["cause"]["message"], "Middle");
    assert_eq!(record["data"]["cause"]["cause"]["message"], "Root cause");
}

#[test]
fn std_errors_convert_with_their_sources() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    let (logger, sink) = logger_at(Severity::Debug);
    logger.error_with("startup failed", Value::error(&io));

    let record = parse(&sink.drain_logs());
    assert_eq!(record["data"]["message"], "config.toml missing");
    assert!(record["data"]["stack"].as_str().unwrap().contains("config.toml missing"));
}

#[test]
fn cyclic_data_still_produces_one_record() {
    let (logger, sink) = logger_at(Severity::Debug);
    let data = object! { "name" => "circular" };
    data.insert("self", data.clone());
    logger.info_with("cycle", data);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].contains("[Circular *1]"));
}

#[test]
fn pretty_records_through_a_logger() {
    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::new(
        LoggerConfig::new()
            .level(Severity::Debug)
            .formatter(PrettyFormatter::plain())
            .sink_arc(sink.clone())
            .context_accessor(|| None),
    );
    logger.info_with("ready", object! { "port" => 8080 });

    let text = sink.drain_logs();
    let (header, rest) = text.split_once('\n').unwrap();
    assert!(header.ends_with("Z [INFO] ready"));
    assert_eq!(rest, "  data.port: 8080");
}

#[derive(Debug, Default)]
struct RecordingSink {
    writes: Mutex<Vec<String>>,
}

impl Sink for RecordingSink {
    fn write(&self, text: &str) {
        self.writes.lock().unwrap().push(text.to_owned());
    }
}

#[test]
fn custom_sinks_receive_exactly_one_write() {
    let sink = Arc::new(RecordingSink::default());
    let logger = Logger::new(
        LoggerConfig::new()
            .level(Severity::Info)
            .sink_arc(sink.clone())
            .without_context(),
    );
    logger.info("indented by default");
    let writes = sink.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0],
        "{\n  \"level\": 20,\n  \"message\": \"indented by default\"\n}"
    );
}
