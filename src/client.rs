//! Live transport collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{ response, error }` envelope shared by live calls and replay
/// outcomes.
///
/// A completed call always yields a value: transport failures arrive as
/// `error` payloads, never as panics or propagated errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallOutcome {
	pub response: Option<Value>,
	pub error: Option<Value>,
}

impl CallOutcome {
	pub fn success(response: Value) -> Self {
		Self {
			response: Some(response),
			error: None,
		}
	}

	pub fn failure(error: Value) -> Self {
		Self {
			response: None,
			error: Some(error),
		}
	}

	/// Whether this outcome is the synthetic playback-mode cancellation.
	pub fn is_canceled(&self) -> bool {
		self.error
			.as_ref()
			.and_then(|error| error.get("canceled"))
			.and_then(Value::as_bool)
			.unwrap_or(false)
	}
}

/// Live transport client, already bound to its target endpoint, method and
/// payload. External collaborator; transport mechanics (and their timeouts)
/// live behind this boundary.
#[async_trait]
pub trait LiveClient: Send + Sync {
	async fn call(&self) -> CallOutcome;
}
