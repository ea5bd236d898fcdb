//! OTLP utility functions
//!
//! Attribute flattening for OTLP protobuf types. Every attribute value is coerced
//! to a display string; the original typing is discarded.
//!
//! Coercion contract (`any_value_to_string`):
//!
//! | OTLP value    | String                                                    |
//! |---------------|-----------------------------------------------------------|
//! | string        | unchanged                                                 |
//! | bool          | `true` / `false`                                          |
//! | int           | base-10 (`-42`)                                           |
//! | double        | shortest round-trip decimal, no exponent (`12.7`, `1`), `NaN`, `+Inf`, `-Inf` |
//! | bytes         | standard base64                                           |
//! | array, kvlist | compact JSON of the typed values                          |
//! | empty         | empty string                                              |

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
use serde_json::Value as JsonValue;

// ============================================================================
// SHARED ATTRIBUTE KEYS
// ============================================================================

/// Well-known resource attribute keys
pub mod keys {
    pub const SERVICE_NAME: &str = "service.name";
    pub const HOST_NAME: &str = "host.name";
}

// ============================================================================
// ATTRIBUTE EXTRACTION
// ============================================================================

/// Flatten a KeyValue list into a string map.
///
/// Duplicate keys resolve to the last value in iteration order.
pub fn extract_attributes(attrs: &[KeyValue]) -> HashMap<String, String> {
    let mut result = HashMap::with_capacity(attrs.len());
    for kv in attrs {
        let value = kv.value.as_ref().map(any_value_to_string).unwrap_or_default();
        result.insert(kv.key.clone(), value);
    }
    result
}

/// Look up a single attribute as a string (last occurrence wins, absent is empty)
pub fn get_attribute(attrs: &[KeyValue], key: &str) -> String {
    attrs
        .iter()
        .rev()
        .find(|kv| kv.key == key)
        .and_then(|kv| kv.value.as_ref())
        .map(any_value_to_string)
        .unwrap_or_default()
}

/// Convert AnyValue to string representation
pub fn any_value_to_string(value: &AnyValue) -> String {
    match &value.value {
        Some(any_value::Value::StringValue(s)) => s.clone(),
        Some(any_value::Value::BoolValue(b)) => b.to_string(),
        Some(any_value::Value::IntValue(i)) => i.to_string(),
        Some(any_value::Value::DoubleValue(d)) => format_double(*d),
        Some(any_value::Value::BytesValue(b)) => BASE64.encode(b),
        Some(any_value::Value::ArrayValue(_)) | Some(any_value::Value::KvlistValue(_)) => {
            serde_json::to_string(&any_value_to_json(value)).unwrap_or_default()
        }
        None => String::new(),
    }
}

/// Format a double without exponent notation
fn format_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        if d.is_sign_positive() { "+Inf" } else { "-Inf" }.to_string()
    } else {
        d.to_string()
    }
}

/// Convert AnyValue to JSON value (preserves native types)
fn any_value_to_json(value: &AnyValue) -> JsonValue {
    match &value.value {
        Some(any_value::Value::StringValue(s)) => serde_json::json!(s),
        Some(any_value::Value::BoolValue(b)) => serde_json::json!(b),
        Some(any_value::Value::IntValue(i)) => serde_json::json!(i),
        Some(any_value::Value::DoubleValue(d)) => serde_json::json!(d),
        Some(any_value::Value::ArrayValue(arr)) => {
            JsonValue::Array(arr.values.iter().map(any_value_to_json).collect())
        }
        Some(any_value::Value::KvlistValue(kvlist)) => {
            let map: serde_json::Map<String, JsonValue> = kvlist
                .values
                .iter()
                .map(|kv| {
                    let v = kv.value.as_ref().map(any_value_to_json).unwrap_or(JsonValue::Null);
                    (kv.key.clone(), v)
                })
                .collect();
            JsonValue::Object(map)
        }
        Some(any_value::Value::BytesValue(b)) => serde_json::json!(BASE64.encode(b)),
        None => JsonValue::Null,
    }
}
