//! Cache-id derivation.
//!
//! A cache id (fingerprint) is the deterministic string key a request resolves
//! to in the fixture store. Two requests that are field-for-field equal after
//! canonicalization produce the same id regardless of key insertion order or
//! session timing.

use crate::canonical::{is_insignificant, sort_keys};
use md5::{Digest, Md5};
use serde_json::{Map, Value};

/// Endpoints containing this marker fingerprint identically for every caller:
/// the public-id component is forced empty so that all identities share one
/// fixture for the login flow itself.
pub(crate) const MAGIC_LOGIN_MARKER: &str = "magic-login";

const COMPONENT_SEPARATOR: &str = "_";

/// Hex-encoded MD5 digest of a string.
pub fn md5_hex(input: &str) -> String {
	hex::encode(Md5::digest(input.as_bytes()))
}

/// Semantic fields and scoping that feed one cache-id derivation.
#[derive(Debug, Clone, Copy)]
pub struct FingerprintInput<'a> {
	pub endpoint: &'a str,
	pub method: &'a str,
	pub params: Option<&'a Map<String, Value>>,
	pub body: Option<&'a Value>,
	/// Test-name-derived prefix scoping a unique fixture; `None` for the
	/// shared ("classic") id.
	pub scope_prefix: Option<&'a str>,
	pub public_id: Option<&'a str>,
	pub login_preset: Option<&'a str>,
}

/// Derives the cache id for a request.
///
/// Components are joined in a fixed order — scope prefix, public id, login
/// preset, endpoint, uppercased method, filtered parameter JSON, body JSON —
/// and empty or absent components are omitted so optional parts never
/// introduce stray separators.
///
/// # Examples
///
/// ```
/// use replaykit::fingerprint::{FingerprintInput, generate_cache_id};
///
/// let input = FingerprintInput {
///     endpoint: "v1/sessions/setup",
///     method: "post",
///     params: None,
///     body: None,
///     scope_prefix: None,
///     public_id: None,
///     login_preset: None,
/// };
/// assert_eq!(generate_cache_id(&input), "v1/sessions/setup_POST");
/// ```
pub fn generate_cache_id(input: &FingerprintInput<'_>) -> String {
	let public_id = if input.endpoint.contains(MAGIC_LOGIN_MARKER) {
		None
	} else {
		input.public_id
	};

	let params_json = input.params.map(|params| {
		let filtered: Map<String, Value> = sort_keys(params)
			.into_iter()
			.filter(|(_, value)| !is_insignificant(value))
			.collect();
		Value::Object(filtered).to_string()
	});
	let body_json = input.body.map(|body| match body {
		Value::Object(map) => Value::Object(sort_keys(map)).to_string(),
		other => other.to_string(),
	});

	let components = [
		input.scope_prefix.map(str::to_owned),
		public_id.map(str::to_owned),
		input.login_preset.map(str::to_owned),
		Some(input.endpoint.to_owned()),
		Some(input.method.to_uppercase()),
		params_json,
		body_json,
	];

	components
		.into_iter()
		.flatten()
		.filter(|component| !component.is_empty())
		.collect::<Vec<String>>()
		.join(COMPONENT_SEPARATOR)
}

/// Derives the scope prefix for unique fixtures from a test name.
///
/// Only the last `/`-separated segment of the test name contributes, so the
/// same test file keeps its prefix stable when the suite is moved.
pub fn scope_prefix_for_test(test_name: &str) -> String {
	let segment = test_name.rsplit('/').next().unwrap_or(test_name);
	md5_hex(segment)
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

	fn base_input<'a>(params: Option<&'a Map<String, Value>>) -> FingerprintInput<'a> {
		FingerprintInput {
			endpoint: "v1/payments",
			method: "post",
			params,
			body: None,
			scope_prefix: None,
			public_id: None,
			login_preset: None,
		}
	}

	#[test]
	fn test_deterministic_under_key_permutation() {
		let forward = to_map(json!({ "a": 1, "b": 2, "c": { "y": 1, "x": 2 } }));
		let mut reversed = Map::new();
		reversed.insert("c".to_string(), json!({ "x": 2, "y": 1 }));
		reversed.insert("b".to_string(), json!(2));
		reversed.insert("a".to_string(), json!(1));

		assert_eq!(
			generate_cache_id(&base_input(Some(&forward))),
			generate_cache_id(&base_input(Some(&reversed))),
		);
	}

	#[test]
	fn test_method_uppercased_and_components_joined() {
		let params = to_map(json!({ "clientKey": "test_key" }));
		let id = generate_cache_id(&base_input(Some(&params)));
		assert_eq!(id, "v1/payments_POST_{\"clientKey\":\"test_key\"}");
	}

	#[test]
	fn test_insignificant_params_dropped() {
		let sparse = to_map(json!({ "a": "x", "b": null, "c": "", "d": 0 }));
		let dense = to_map(json!({ "a": "x" }));
		assert_eq!(
			generate_cache_id(&base_input(Some(&sparse))),
			generate_cache_id(&base_input(Some(&dense))),
		);
	}

	#[test]
	fn test_absent_components_do_not_add_separators() {
		let id = generate_cache_id(&FingerprintInput {
			endpoint: "v1/payments",
			method: "get",
			params: None,
			body: None,
			scope_prefix: None,
			public_id: Some(""),
			login_preset: None,
		});
		assert_eq!(id, "v1/payments_GET");
	}

	#[test]
	fn test_scope_and_session_components_included() {
		let id = generate_cache_id(&FingerprintInput {
			endpoint: "v1/payments",
			method: "get",
			params: None,
			body: None,
			scope_prefix: Some("prefix"),
			public_id: Some("merchant"),
			login_preset: Some("admin"),
		});
		assert_eq!(id, "prefix_merchant_admin_v1/payments_GET");
	}

	#[test]
	fn test_magic_login_ignores_public_id() {
		let for_public_id = |public_id: Option<&str>| {
			generate_cache_id(&FingerprintInput {
				endpoint: "v1/magic-login/start",
				method: "post",
				params: None,
				body: None,
				scope_prefix: None,
				public_id,
				login_preset: None,
			})
		};
		assert_eq!(for_public_id(Some("merchant-a")), for_public_id(Some("merchant-b")));
		assert_eq!(for_public_id(Some("merchant-a")), for_public_id(None));
	}

	#[test]
	fn test_body_serialized_with_sorted_keys() {
		let body = json!({ "z": 1, "a": 2 });
		let id = generate_cache_id(&FingerprintInput {
			endpoint: "v1/payments",
			method: "post",
			params: None,
			body: Some(&body),
			scope_prefix: None,
			public_id: None,
			login_preset: None,
		});
		assert_eq!(id, "v1/payments_POST_{\"a\":2,\"z\":1}");
	}

	#[test]
	fn test_scope_prefix_uses_last_test_name_segment() {
		assert_eq!(
			scope_prefix_for_test("suites/checkout/cards"),
			scope_prefix_for_test("cards"),
		);
		assert_ne!(
			scope_prefix_for_test("suites/checkout/cards"),
			scope_prefix_for_test("suites/checkout/ideal"),
		);
	}

	#[test]
	fn test_md5_hex_known_digest() {
		assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
		assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
	}
}
