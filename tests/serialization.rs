// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialization behavior through the public rendering entry points.

use proptest::prelude::*;
use scopelog::format::inspect::{InspectOptions, inspect};
use scopelog::format::json::{JsonOptions, MAX_SAFE_INTEGER, render};
use scopelog::{Array, ErrorValue, Formatter, JsonFormatter, Value, object};
use serde_json::Value as Json;

fn compact(value: &Value) -> String {
    render(value, &JsonOptions { compact: true })
}

fn json_value() -> impl Strategy<Value = Json> {
    let safe = MAX_SAFE_INTEGER as i64;
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        (-safe..=safe).prop_map(Json::from),
        "[a-zA-Z0-9 _\\-\"\\\\]{0,12}".prop_map(Json::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Json::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(|entries| Json::Object(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn json_representable_values_survive_rendering(value in json_value()) {
        let wrapped = Json::Array(vec![value]);
        let rendered = compact(&Value::from(wrapped.clone()));
        let reparsed: Json = serde_json::from_str(&rendered).unwrap();
        prop_assert_eq!(reparsed, wrapped);
    }

    #[test]
    fn out_of_range_integers_become_decimal_strings(n in (MAX_SAFE_INTEGER + 1)..=u64::MAX) {
        let rendered = compact(&Value::from(vec![n]));
        prop_assert_eq!(rendered, format!("[\"{n}\"]"));
    }
}

#[test]
fn undefined_is_a_labelled_sentinel() {
    let value = object! { "defined" => "value", "notDefined" => Value::Undefined };
    let reparsed: Json = serde_json::from_str(&compact(&value.into())).unwrap();
    assert_eq!(reparsed["notDefined"], "FakeValue { undefined }");
    assert_ne!(reparsed["notDefined"], Json::Null);
}

#[test]
fn self_reference_renders_as_a_circular_marker() {
    let value = object! { "name" => "circular" };
    value.insert("self", value.clone());
    assert_eq!(
        compact(&value.into()),
        "<ref *1> { name: 'circular', self: [Circular *1] }"
    );
}

#[test]
fn cycles_through_arrays_are_caught() {
    let list = Array::new();
    list.push(1);
    list.push(list.clone());
    let rendered = compact(&list.into());
    assert_eq!(rendered, "<ref *1> [ 1, [Circular *1] ]");
}

#[test]
fn two_level_cause_chain() {
    let root = ErrorValue::with_parts("Error", "Root cause", "Error: Root cause");
    let middle = ErrorValue::with_parts("Error", "Middle", "Error: Middle").with_cause(root);
    let top = ErrorValue::with_parts("Error", "Top", "Error: Top").with_cause(middle);
    let reparsed: Json = serde_json::from_str(&compact(&top.into())).unwrap();
    assert_eq!(reparsed["cause"]["cause"]["message"], "Root cause");
}

#[test]
fn mutual_causes_terminate() {
    let a = ErrorValue::with_parts("Error", "A", "Error: A");
    let b = ErrorValue::with_parts("Error", "B", "Error: B").with_cause(a.clone());
    a.set_cause(b);
    let reparsed: Json = serde_json::from_str(&compact(&a.into())).unwrap();
    assert_eq!(reparsed["cause"]["message"], "B");
    assert_eq!(reparsed["cause"]["cause"], "[Circular cause]");
}

#[test]
fn inspection_is_depth_bounded() {
    let deep = object! {
        "a" => object! { "b" => object! { "c" => object! { "d" => 1 } } },
    };
    assert_eq!(
        inspect(&deep.into(), &InspectOptions::default()),
        "{ a: { b: { c: [Object] } } }"
    );
}

#[test]
fn formatter_render_matches_free_function() {
    let value: Value = object! { "k" => vec![1, 2] }.into();
    assert_eq!(JsonFormatter::compact().render(&value), compact(&value));
}
