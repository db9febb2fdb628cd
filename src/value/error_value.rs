// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error-like values.

use super::Value;
use parking_lot::RwLock;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::Debug;
use std::sync::Arc;

/// Custom serialization hook for an error. Its keys take precedence over the defaults.
pub type ToJson = Arc<dyn Fn() -> Value + Send + Sync>;

struct ErrorInner {
    name: String,
    message: String,
    stack: String,
    fields: RwLock<Vec<(String, Value)>>,
    cause: RwLock<Option<Value>>,
    to_json: RwLock<Option<ToJson>>,
}

/**
A shared error-like value: name, message, stack, extra fields and an optional cause.

The cause can be set after construction, so cause chains (including pathological
cyclic ones) can be built from handles.

```rust
use scopelog::ErrorValue;

let root = ErrorValue::new("Error", "Root cause");
let top = ErrorValue::new("Error", "Top").with_cause(root);
assert!(top.cause().is_some());
```
*/
#[derive(Clone)]
pub struct ErrorValue {
    inner: Arc<ErrorInner>,
}

impl ErrorValue {
    /// Creates an error whose stack begins with `name: message`.
    ///
    /// A backtrace is appended when the process has backtraces enabled.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();
        let stack = default_stack(&name, &message);
        Self::with_parts(name, message, stack)
    }

    pub fn with_parts(
        name: impl Into<String>,
        message: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        ErrorValue {
            inner: Arc::new(ErrorInner {
                name: name.into(),
                message: message.into(),
                stack: stack.into(),
                fields: RwLock::new(Vec::new()),
                cause: RwLock::new(None),
                to_json: RwLock::new(None),
            }),
        }
    }

    /**
    Converts a `std::error::Error`, following `source()` as the cause chain.

    The outermost error is named after its type; sources are only reachable as
    trait objects and are named `Error`.
    */
    pub fn from_std<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let converted = ErrorValue::new(short_type_name::<E>(), err.to_string());
        let mut tail = converted.clone();
        let mut source = err.source();
        while let Some(s) = source {
            let next = ErrorValue::new("Error", s.to_string());
            tail.set_cause(next.clone());
            tail = next;
            source = s.source();
        }
        converted
    }

    pub fn with_field(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(key, value);
        self
    }

    pub fn with_cause(self, cause: impl Into<Value>) -> Self {
        self.set_cause(cause);
        self
    }

    pub fn with_to_json<F>(self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        *self.inner.to_json.write() = Some(Arc::new(f));
        self
    }

    pub fn set_field(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut fields = self.inner.fields.write();
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => fields.push((key, value)),
        }
    }

    pub fn set_cause(&self, cause: impl Into<Value>) {
        *self.inner.cause.write() = Some(cause.into());
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn message(&self) -> &str {
        &self.inner.message
    }

    pub fn stack(&self) -> &str {
        &self.inner.stack
    }

    /// Extra own fields in insertion order.
    pub fn fields(&self) -> Vec<(String, Value)> {
        self.inner.fields.read().clone()
    }

    pub fn cause(&self) -> Option<Value> {
        self.inner.cause.read().clone()
    }

    pub fn to_json(&self) -> Option<ToJson> {
        self.inner.to_json.read().clone()
    }

    pub fn ptr_eq(&self, other: &ErrorValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl Debug for ErrorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorValue")
            .field("name", &self.inner.name)
            .field("message", &self.inner.message)
            .finish_non_exhaustive()
    }
}

fn default_stack(name: &str, message: &str) -> String {
    let header = if message.is_empty() {
        name.to_string()
    } else {
        format!("{name}: {message}")
    };
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => format!("{header}\n{backtrace}"),
        _ => header,
    }
}

fn short_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    if full.starts_with("dyn ") {
        return "Error".to_string();
    }
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
