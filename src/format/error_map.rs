// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error-to-object conversion.

use super::json::{self, JsonOptions};
use crate::value::{ErrorValue, Object, Value};

/// Attached in place of a cause that already appears earlier in the same chain.
pub const CIRCULAR_CAUSE: &str = "[Circular cause]";

const RESERVED: [&str; 4] = ["name", "message", "stack", "cause"];

/**
Converts an error into a plain object.

The object always starts with `name`, `message` and `stack`. If the error carries a
custom serialization hook its result is merged over those keys; otherwise the error's
extra fields follow in insertion order. A cause is attached last: error causes are
converted recursively, anything else is rendered to text.

Cause chains are cycle-checked. A cause that is already being converted further up
the chain becomes [`CIRCULAR_CAUSE`]. A non-error cause that leads back into the chain
is rendered by the inspection renderer.

```rust
use scopelog::ErrorValue;
use scopelog::format::error_map::error_to_object;

let err = ErrorValue::new("Error", "top")
    .with_cause(ErrorValue::new("Error", "middle").with_cause(ErrorValue::new("Error", "Root cause")));
let mapped = error_to_object("err", &err);
let cause = mapped.get("cause").unwrap().unwrap();
let inner = cause.as_object().unwrap().get("cause").unwrap().unwrap();
assert_eq!(
    inner.as_object().unwrap().get("message"),
    Some(Ok("Root cause".into()))
);
```
*/
pub fn error_to_object(key: &str, error: &ErrorValue) -> Object {
    error_to_object_within(key, error, &[])
}

/// Like [`error_to_object`], for an error reached while `ancestors` are being walked.
///
/// Anything on that path, or on the cause chain, counts as a cycle when reached again.
pub(crate) fn error_to_object_within(
    key: &str,
    error: &ErrorValue,
    ancestors: &[usize],
) -> Object {
    let mut chain = ancestors.to_vec();
    convert(key, error, &mut chain)
}

fn convert(key: &str, error: &ErrorValue, chain: &mut Vec<usize>) -> Object {
    chain.push(error.addr());

    let object = Object::new();
    object.insert("name", error.name());
    object.insert("message", error.message());
    object.insert("stack", error.stack());

    match error.to_json() {
        Some(to_json) => match to_json() {
            Value::Object(custom) => object.extend_from(&custom),
            other => object.insert("json", other),
        },
        None => {
            for (field, value) in error.fields() {
                if RESERVED.contains(&field.as_str()) || object.contains_key(&field) {
                    continue;
                }
                object.insert(field, value);
            }
        }
    }

    match error.cause() {
        None | Some(Value::Undefined) => {}
        Some(Value::Error(cause)) => {
            if chain.contains(&cause.addr()) {
                object.insert("cause", CIRCULAR_CAUSE);
            } else {
                let cause_key = format!("{key}.cause");
                object.insert("cause", convert(&cause_key, &cause, chain));
            }
        }
        Some(other) => {
            let text = json::render_within(&other, &JsonOptions { compact: true }, chain);
            object.insert("cause", text);
        }
    }

    chain.pop();
    object
}
