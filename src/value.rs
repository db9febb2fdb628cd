// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dynamic value model accepted by loggers.
//!
//! Log data is arbitrary: primitives, nested objects, errors with cause chains, and
//! values that have no faithful machine-readable form at all (functions, pending
//! futures, regular expressions, properties whose getter fails). [`Value`] can express
//! every one of these so that the formatters have something concrete to render.
//!
//! [`Object`], [`Array`] and [`ErrorValue`] are shared handles. Cloning one clones the
//! handle, not the contents, which is what makes shared and cyclic graphs possible:
//!
//! ```rust
//! use scopelog::{Object, Value};
//!
//! let obj = Object::new();
//! obj.insert("name", "circular");
//! obj.insert("self", obj.clone());
//! assert_eq!(
//!     scopelog::format::inspect::inspect_compact(&Value::Object(obj)),
//!     "<ref *1> { name: 'circular', self: [Circular *1] }"
//! );
//! ```

mod error_value;

pub use error_value::ErrorValue;

use crate::error::ScopelogError;
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;

/// A fallible accessor. Returning `Err` is how a getter "raises".
pub type Getter = Arc<dyn Fn() -> Result<Value, String> + Send + Sync>;

/// Any value that can be logged.
#[derive(Clone, Default)]
pub enum Value {
    /// A missing value, distinct from [`Value::Null`].
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// An integer that does not fit the machine-readable number range.
    BigInt(i128),
    String(String),
    Regex {
        source: String,
        flags: String,
    },
    /// A computation that has not finished yet.
    Pending,
    Function {
        name: Option<String>,
    },
    Array(Array),
    Object(Object),
    Error(ErrorValue),
}

impl Value {
    /// Strings, numbers, booleans, null and undefined.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Undefined
                | Value::Null
                | Value::Bool(_)
                | Value::Int(_)
                | Value::UInt(_)
                | Value::Float(_)
                | Value::String(_)
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn regex(source: impl Into<String>, flags: impl Into<String>) -> Value {
        Value::Regex {
            source: source.into(),
            flags: flags.into(),
        }
    }

    pub fn function(name: impl Into<String>) -> Value {
        let name = name.into();
        Value::Function {
            name: (!name.is_empty()).then_some(name),
        }
    }

    /// Wraps a `std::error::Error` and its `source()` chain.
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Value {
        Value::Error(ErrorValue::from_std(err))
    }

    /// Converts anything serde can serialize.
    pub fn from_serialize<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value, ScopelogError> {
        Ok(serde_json::to_value(value)?.into())
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::format::inspect::inspect_compact(self))
    }
}

impl PartialEq for Value {
    /// Composite values compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Pending, Value::Pending) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (
                Value::Regex { source, flags },
                Value::Regex {
                    source: s2,
                    flags: f2,
                },
            ) => source == s2 && flags == f2,
            (Value::Function { name }, Value::Function { name: n2 }) => name == n2,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Error(a), Value::Error(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// One own property of an [`Object`].
#[derive(Clone)]
pub enum Property {
    Value(Value),
    Getter(Getter),
}

impl Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Property::Value(v) => v.fmt(f),
            Property::Getter(_) => f.write_str("[Getter]"),
        }
    }
}

/**
An insertion-ordered, shared, mutable key/value object.

Inserting an existing key replaces its property in place and keeps its position.
*/
#[derive(Clone, Default)]
pub struct Object {
    inner: Arc<RwLock<Vec<(String, Property)>>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.insert_property(key.into(), Property::Value(value.into()));
    }

    pub fn insert_getter<F>(&self, key: impl Into<String>, getter: F)
    where
        F: Fn() -> Result<Value, String> + Send + Sync + 'static,
    {
        self.insert_property(key.into(), Property::Getter(Arc::new(getter)));
    }

    pub fn insert_property(&self, key: String, property: Property) {
        let mut entries = self.inner.write();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = property,
            None => entries.push((key, property)),
        }
    }

    /// Returns the value for `key`, invoking a getter if there is one.
    pub fn get(&self, key: &str) -> Option<Result<Value, String>> {
        let property = self
            .inner
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| p.clone())?;
        Some(match property {
            Property::Value(v) => Ok(v),
            Property::Getter(g) => g(),
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().iter().any(|(k, _)| k == key)
    }

    /// A snapshot of the entries, in insertion order.
    ///
    /// The lock is released before returning, so renderers can walk cycles freely.
    pub fn entries(&self) -> Vec<(String, Property)> {
        self.inner.read().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.read().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Copies every entry of `other` into `self`; later keys win.
    pub fn extend_from(&self, other: &Object) {
        for (key, property) in other.entries() {
            self.insert_property(key, property);
        }
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identity used for cycle detection.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::format::inspect::inspect_compact(&Value::Object(
            self.clone(),
        )))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let object = Object::new();
        for (k, v) in iter {
            object.insert(k, v);
        }
        object
    }
}

/// A shared, mutable list.
#[derive(Clone, Default)]
pub struct Array {
    inner: Arc<RwLock<Vec<Value>>>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.inner.write().push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.inner.read().get(index).cloned()
    }

    pub fn items(&self) -> Vec<Value> {
        self.inner.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl Debug for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::format::inspect::inspect_compact(&Value::Array(
            self.clone(),
        )))
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        let array = Array::new();
        for v in iter {
            array.push(v);
        }
        array
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self { Value::Int(v as i64) }
        }
    )*};
}
macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self { Value::UInt(v as u64) }
        }
    )*};
}
from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<i128> for Value {
    fn from(v: i128) -> Self {
        Value::BigInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<ErrorValue> for Value {
    fn from(v: ErrorValue) -> Self {
        Value::Error(v)
    }
}

impl From<regex::Regex> for Value {
    fn from(re: regex::Regex) -> Self {
        Value::regex(re.as_str(), "")
    }
}

impl From<&regex::Regex> for Value {
    fn from(re: &regex::Regex) -> Self {
        Value::regex(re.as_str(), "")
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Undefined)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match v {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Object(map.into_iter().collect()),
        }
    }
}
