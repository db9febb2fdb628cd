// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# scopelog

scopelog is a structured logging library built around two ideas: any value can be
logged without the logger ever failing, and metadata reaches a record without being
passed to the call site.

# The problem

Structured loggers are asked to serialize whatever the application hands them. Sooner or
later that is a cyclic object graph, an error with a chain of causes, a property whose
getter fails, or a future nobody awaited. A logger that throws (or panics) on these is
a logger nobody trusts in an error path.

Metadata has the opposite problem. A request id has to reach every record emitted while
serving that request, including from code that has never heard of requests.

# Records

Each emitted call produces one [`LogRecord`]: a [`Severity`], a message, optional
`data` and optional `context`.

| Severity | Value |
|----------|-------|
| debug    | 10    |
| info     | 20    |
| warn     | 30    |
| error    | 40    |
| fatal    | 50    |
| silent   | 100   |

A record is emitted iff its severity is at or above the logger's threshold. `silent` is
only a threshold; nothing is ever logged at it.

# Scope and context

*Scope* is static: [`Logger::child`] derives a logger whose records carry extra keys.

*Context* is dynamic: [`context::run_with_context`] makes keys ambient for the extent of
a block, and every record emitted inside it picks them up under a separate `context`
field.

```rust
use scopelog::context::run_with_context;
use scopelog::{InMemorySink, JsonFormatter, Logger, LoggerConfig, Severity, object};
use std::sync::Arc;

let sink = Arc::new(InMemorySink::new());
let logger = Logger::new(
    LoggerConfig::new()
        .level(Severity::Debug)
        .formatter(JsonFormatter::compact())
        .sink_arc(sink.clone()),
)
.child(object! { "service" => "api" });

run_with_context([("requestId", "r-1")], || {
    logger.info_with("served", object! { "status" => 200 });
});

assert_eq!(
    sink.drain_logs(),
    r#"{"level":20,"message":"served","data":{"service":"api","status":200},"context":{"requestId":"r-1"}}"#
);
```

Async code uses [`context::with_context`], which binds the context to the future rather
than to the thread polling it.

# Serialization

Values are [`Value`]s: primitives, shared [`Object`]s and [`Array`]s (which may form
cycles), [`ErrorValue`]s with causes, and a few runtime markers. The
[`JsonFormatter`] renders them as JSON, substituting text for whatever JSON cannot
express. If the structure cannot be walked at all it falls back to a bounded, cycle-safe
inspection rendering. The [`PrettyFormatter`] renders records for humans.

# Configuration

The threshold comes from [`LoggerConfig::level`], else the `LOG_LEVEL` environment
variable, else `debug`. An unrecognized name never fails; it resolves to `debug`.
*/

#[macro_use]
mod macros;

mod error;
mod level;
mod log_record;
mod sink;
mod stdout_sink;
mod inmemory_sink;
mod logger;
pub mod value;
pub mod format;
pub mod context;
pub mod global_logger;

pub use error::ScopelogError;
pub use level::{LOG_LEVEL_ENV, Severity};
pub use log_record::LogRecord;
pub use sink::Sink;
pub use stdout_sink::StdoutSink;
pub use inmemory_sink::InMemorySink;
pub use logger::{ContextAccessor, Logger, LoggerConfig};
pub use value::{Array, ErrorValue, Object, Property, Value};
pub use format::{Formatter, JsonFormatter, PrettyFormatter};
pub use context::{current_context, mutate_current, run_with_context, with_context};
pub use global_logger::{global_logger, set_global_logger};
