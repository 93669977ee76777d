//! JSON ↔ protobuf `Struct` conversions
//!
//! Object properties cross the REST surface as JSON and the gRPC surface as
//! `google.protobuf.Struct`. The client works in `serde_json::Value`
//! throughout; this module translates at the gRPC boundary.

use prost_types::value::Kind;
use prost_types::{ListValue, Struct, Value};

/// Convert a JSON object into a protobuf Struct
///
/// Returns None for non-object values; object properties are always a JSON
/// map at the API surface.
pub fn json_to_struct(value: &serde_json::Value) -> Option<Struct> {
    match value {
        serde_json::Value::Object(map) => Some(Struct {
            fields: map
                .iter()
                .map(|(key, val)| (key.clone(), json_to_value(val)))
                .collect(),
        }),
        _ => None,
    }
}

/// Convert a protobuf Struct back into a JSON object
pub fn struct_to_json(value: &Struct) -> serde_json::Value {
    serde_json::Value::Object(
        value
            .fields
            .iter()
            .map(|(key, val)| (key.clone(), value_to_json(val)))
            .collect(),
    )
}

pub fn json_to_value(value: &serde_json::Value) -> Value {
    let kind = match value {
        serde_json::Value::Null => Kind::NullValue(0),
        serde_json::Value::Bool(b) => Kind::BoolValue(*b),
        serde_json::Value::Number(n) => {
            // protobuf Struct has a single number kind
            Kind::NumberValue(n.as_f64().unwrap_or(0.0))
        }
        serde_json::Value::String(s) => Kind::StringValue(s.clone()),
        serde_json::Value::Array(items) => Kind::ListValue(ListValue {
            values: items.iter().map(json_to_value).collect(),
        }),
        serde_json::Value::Object(map) => Kind::StructValue(Struct {
            fields: map
                .iter()
                .map(|(key, val)| (key.clone(), json_to_value(val)))
                .collect(),
        }),
    };
    Value { kind: Some(kind) }
}

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match &value.kind {
        Some(Kind::NullValue(_)) | None => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(*b),
        Some(Kind::NumberValue(f)) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s.clone()),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.iter().map(value_to_json).collect())
        }
        Some(Kind::StructValue(s)) => struct_to_json(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_round_trip() {
        let original = json!({
            "title": "alpha",
            "count": 3.0,
            "active": true,
            "tags": ["a", "b"],
            "nested": {"inner": "value"},
            "missing": null,
        });

        let proto = json_to_struct(&original).unwrap();
        assert_eq!(struct_to_json(&proto), original);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(json_to_struct(&json!("just a string")).is_none());
        assert!(json_to_struct(&json!(42)).is_none());
    }

    #[test]
    fn test_integer_becomes_number() {
        let proto = json_to_value(&json!(7));
        assert_eq!(proto.kind, Some(Kind::NumberValue(7.0)));
    }
}
