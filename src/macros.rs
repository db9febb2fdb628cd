// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction macros.

/**
Builds an [`Object`](crate::Object) from `key => value` pairs.

Keys are anything convertible into `String`; values anything convertible into
[`Value`](crate::Value). Entries keep the order they are written in, and a repeated key
replaces the earlier value in place.

```rust
use scopelog::{object, Value};

let user = object! {
    "id" => 42,
    "name" => "ada",
    "roles" => vec!["admin", "ops"],
    "manager" => Value::Null,
};
assert_eq!(user.keys(), vec!["id", "name", "roles", "manager"]);

let empty = object! {};
assert!(empty.is_empty());
```
*/
#[macro_export]
macro_rules! object {
    () => {
        $crate::Object::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let object = $crate::Object::new();
        $(
            object.insert($key, $value);
        )+
        object
    }};
}

#[cfg(test)]
mod tests {
    use crate::value::Value;

    #[test]
    fn nested_objects() {
        let outer = object! {
            "inner" => object! { "x" => 1 },
            "flag" => true,
        };
        let inner = outer.get("inner").unwrap().unwrap();
        let inner = inner.as_object().unwrap();
        assert_eq!(inner.get("x").unwrap().unwrap(), Value::Int(1));
        assert_eq!(outer.get("flag").unwrap().unwrap(), Value::Bool(true));
    }

    #[test]
    fn later_keys_replace_in_place() {
        let obj = object! { "a" => 1, "b" => 2, "a" => 3 };
        assert_eq!(obj.keys(), vec!["a", "b"]);
        assert_eq!(obj.get("a").unwrap().unwrap(), Value::Int(3));
    }

    #[test]
    fn owned_keys() {
        let key = String::from("dynamic");
        let obj = object! { key.clone() => "v" };
        assert!(obj.contains_key(&key));
    }
}
