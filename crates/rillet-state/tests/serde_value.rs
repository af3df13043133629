//! JSON round-trips for `Value`, the representation state snapshots use.
//!
//! Requires the `serde` feature.

use std::collections::BTreeMap;

use rillet_state::Value;

fn roundtrip(value: &Value) -> Value {
    let json = serde_json::to_string(value).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn scalars_round_trip() {
    for value in [
        Value::Null,
        Value::Bool(true),
        Value::Int(-42),
        Value::Float(2.75),
        Value::Str("état".into()),
    ] {
        assert_eq!(roundtrip(&value), value);
    }
}

#[test]
fn nested_structures_round_trip() {
    let mut row = BTreeMap::new();
    row.insert("name".to_owned(), Value::Str("Alice".into()));
    row.insert("score".to_owned(), Value::Int(87));
    let value = Value::List(vec![Value::Map(row), Value::Null]);
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn serialized_form_is_externally_tagged() {
    assert_eq!(serde_json::to_string(&Value::Int(5)).unwrap(), r#"{"Int":5}"#);
    assert_eq!(serde_json::to_string(&Value::Null).unwrap(), r#""Null""#);
}
