//! Request descriptors.

use serde_json::{Map, Value};

/// The semantic fields of one outbound API call, immutable per call.
///
/// Parameters and body are JSON-shaped; their key order is irrelevant, the
/// canonicalizer sorts them before fingerprinting.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
	pub endpoint: String,
	pub method: String,
	pub params: Option<Map<String, Value>>,
	pub body: Option<Value>,
}

impl RequestDescriptor {
	pub fn new(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			method: method.into(),
			params: None,
			body: None,
		}
	}

	pub fn with_params(mut self, params: Map<String, Value>) -> Self {
		self.params = Some(params);
		self
	}

	pub fn with_body(mut self, body: Value) -> Self {
		self.body = Some(body);
		self
	}

	/// Endpoint with empty segments removed and `/` joined by `-`; the store
	/// groups fixtures per endpoint under this id.
	pub fn request_id(&self) -> String {
		self.endpoint
			.split('/')
			.filter(|segment| !segment.is_empty())
			.collect::<Vec<_>>()
			.join("-")
	}
}
