//! Canonical request forms.
//!
//! Fingerprinting is only deterministic when two semantically equal requests
//! serialize to the same string. This module provides the key ordering and the
//! insignificant-value predicate the fingerprint generator relies on.

use serde_json::{Map, Value};

/// Returns a copy of `map` with its keys sorted lexicographically.
///
/// Values that are themselves objects get their keys sorted too, one level
/// deep. Deeper nesting is serialized as-is.
///
/// # Examples
///
/// ```
/// use replaykit::canonical::sort_keys;
/// use serde_json::{Map, Value, json};
///
/// let mut params = Map::new();
/// params.insert("expiryYear".to_string(), json!("2030"));
/// params.insert("cvc".to_string(), json!("737"));
///
/// let sorted = sort_keys(&params);
/// let keys: Vec<&String> = sorted.keys().collect();
/// assert_eq!(keys, ["cvc", "expiryYear"]);
/// ```
pub fn sort_keys(map: &Map<String, Value>) -> Map<String, Value> {
	sort_level(map, true)
}

fn sort_level(map: &Map<String, Value>, recurse: bool) -> Map<String, Value> {
	let mut keys: Vec<&String> = map.keys().collect();
	keys.sort();

	let mut sorted = Map::new();
	for key in keys {
		let value = match &map[key.as_str()] {
			Value::Object(inner) if recurse => Value::Object(sort_level(inner, false)),
			other => other.clone(),
		};
		sorted.insert(key.clone(), value);
	}
	sorted
}

/// Whether a parameter value carries no fingerprint-relevant information.
///
/// Insignificant values are dropped from the parameter mapping before it is
/// serialized into a cache id: null, numeric zero, and the empty string.
/// `false` is significant and kept.
pub fn is_insignificant(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(text) => text.is_empty(),
		Value::Number(number) => number.as_f64() == Some(0.0),
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn to_map(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			_ => panic!("expected object"),
		}
	}

	#[test]
	fn test_sort_keys_orders_top_level() {
		let map = to_map(json!({ "b": 2, "a": 1, "c": 3 }));
		let sorted = sort_keys(&map);
		let keys: Vec<&String> = sorted.keys().collect();
		assert_eq!(keys, ["a", "b", "c"]);
	}

	#[test]
	fn test_sort_keys_orders_one_nested_level() {
		let map = to_map(json!({ "outer": { "z": 1, "a": 2 } }));
		let sorted = sort_keys(&map);
		let nested = sorted["outer"].as_object().expect("nested object");
		let keys: Vec<&String> = nested.keys().collect();
		assert_eq!(keys, ["a", "z"]);
	}

	#[test]
	fn test_sort_keys_preserves_values() {
		let map = to_map(json!({ "b": [1, 2], "a": "x" }));
		let sorted = sort_keys(&map);
		assert_eq!(sorted["a"], json!("x"));
		assert_eq!(sorted["b"], json!([1, 2]));
	}

	#[test]
	fn test_insignificant_values() {
		assert!(is_insignificant(&json!(null)));
		assert!(is_insignificant(&json!("")));
		assert!(is_insignificant(&json!(0)));
		assert!(is_insignificant(&json!(0.0)));
	}

	#[test]
	fn test_significant_values() {
		assert!(!is_insignificant(&json!(false)));
		assert!(!is_insignificant(&json!("0")));
		assert!(!is_insignificant(&json!(1)));
		assert!(!is_insignificant(&json!({})));
		assert!(!is_insignificant(&json!([])));
	}
}
