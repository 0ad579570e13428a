//! Replay mode configuration.

use serde::{Deserialize, Serialize};

/// Mode configuration, read once per call and never mutated by the core.
///
/// `enabled` is the master switch: when off, every call passes straight
/// through to the live transport with no caching side effects. `recording`
/// selects capture (live calls and fixture writes allowed) over playback
/// (replay only). `indexing` turns on per-call uniqueness suffixing of cache
/// ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
	#[serde(default)]
	pub enabled: bool,
	#[serde(default)]
	pub recording: bool,
	#[serde(default)]
	pub indexing: bool,
}

impl ReplayConfig {
	/// Pass-through configuration: no replay, no caching.
	pub fn disabled() -> Self {
		Self::default()
	}

	/// Playback-only configuration: replay fixtures, never call live.
	pub fn playback() -> Self {
		Self {
			enabled: true,
			recording: false,
			indexing: false,
		}
	}

	/// Recording configuration: replay when possible, otherwise call live and
	/// persist.
	pub fn recording() -> Self {
		Self {
			enabled: true,
			recording: true,
			indexing: false,
		}
	}

	/// Enables per-call uniqueness suffixing.
	pub fn with_indexing(mut self) -> Self {
		self.indexing = true;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_presets() {
		assert!(!ReplayConfig::disabled().enabled);
		assert!(ReplayConfig::playback().enabled);
		assert!(!ReplayConfig::playback().recording);
		assert!(ReplayConfig::recording().recording);
		assert!(ReplayConfig::recording().with_indexing().indexing);
	}

	#[test]
	fn test_missing_fields_deserialize_disabled() {
		let config: ReplayConfig = serde_json::from_str("{}").expect("empty config");
		assert_eq!(config, ReplayConfig::disabled());
	}
}
