//! Error types for fixture store operations.
//!
//! No error in this subsystem is fatal: a missing fixture falls back to the
//! next lookup stage or a live call, and a failed save is logged and
//! swallowed. The orchestrator itself always resolves to a result value.

use thiserror::Error;

/// Fixture store operation errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
	/// Fixture absent from the index, or the backend answered not-found.
	#[error("fixture not found: {0}")]
	NotFound(String),

	/// Backend failure (network, filesystem, remote store).
	#[error("fixture store backend error: {0}")]
	Backend(String),

	/// Fixture payload (de)serialization failure.
	#[error("fixture serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl StoreError {
	/// Whether this error means the fixture simply does not exist.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound(_))
	}
}
