//! Fixture store collaborator.
//!
//! The store owns the fixture index and fixture bodies; the orchestrator only
//! reads the index and appends on save. A remote backend typically sits
//! behind this trait; [`MemoryFixtureStore`] is a ready-made in-process
//! implementation for tests and local runs.

use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Per-fixture bookkeeping held in the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureMeta {
	/// Test names that have exercised this fixture.
	#[serde(default)]
	pub tests: Vec<String>,
}

/// Mapping from fixture name to its metadata.
pub type FixtureIndex = HashMap<String, FixtureMeta>;

/// Request metadata persisted alongside a fixture payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureMetadata {
	pub endpoint: String,
	pub method: String,
	#[serde(default)]
	pub params: Option<Map<String, Value>>,
	#[serde(default)]
	pub body: Option<Value>,
	/// Test-name-derived scope prefix active when the fixture was captured.
	pub scope_prefix: String,
}

/// A fixture persistence request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFixture {
	/// Endpoint-derived grouping id (see
	/// [`RequestDescriptor::request_id`](crate::request::RequestDescriptor::request_id)).
	pub request_id: String,
	pub cache_id: String,
	/// Sanitized fixture name the payload is stored under.
	pub name: String,
	pub test_name: String,
	pub metadata: FixtureMetadata,
	/// Normalized `{ isError, ... }` response envelope.
	pub response: Value,
	/// Raw live-side error payload, when the capture failed.
	pub error: Option<Value>,
	pub is_unique: bool,
}

/// Remote fixture index and body storage. External collaborator boundary.
#[async_trait]
pub trait FixtureStore: Send + Sync {
	/// Lists all known fixtures and the tests that exercised them.
	async fn list_fixtures(&self) -> Result<FixtureIndex, StoreError>;

	/// Fetches a fixture body by name.
	///
	/// `update_index` asks the backend to record `test_name` against the
	/// fixture (recording mode only). Absent fixtures and backend 404s both
	/// surface as [`StoreError::NotFound`].
	async fn fetch_fixture(
		&self,
		request_id: &str,
		name: &str,
		test_name: &str,
		update_index: bool,
	) -> Result<Value, StoreError>;

	/// Persists a fixture body with its metadata.
	async fn save_fixture(&self, request: SaveFixture) -> Result<(), StoreError>;

	/// Emits a diagnostic message to the store's log.
	async fn log_diagnostic(&self, message: &str);
}

#[derive(Debug, Clone)]
struct StoredFixture {
	payload: Value,
	tests: Vec<String>,
}

/// In-memory [`FixtureStore`] for tests and local runs.
///
/// Stores fixtures in a `HashMap`, records every save and diagnostic for
/// inspection, and can be configured to fail fetches or saves for testing
/// error paths.
#[derive(Debug, Default)]
pub struct MemoryFixtureStore {
	fixtures: Mutex<HashMap<String, StoredFixture>>,
	saves: Mutex<Vec<SaveFixture>>,
	diagnostics: Mutex<Vec<String>>,
	list_calls: Mutex<usize>,
	fail_fetches: Mutex<bool>,
	fail_saves: Mutex<bool>,
}

impl MemoryFixtureStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds a fixture under `name` with the given payload and test history.
	pub async fn insert_fixture(&self, name: impl Into<String>, payload: Value, tests: Vec<String>) {
		self.fixtures
			.lock()
			.await
			.insert(name.into(), StoredFixture { payload, tests });
	}

	/// Configures whether fetches should fail as not-found.
	pub async fn set_fail_fetches(&self, fail: bool) {
		*self.fail_fetches.lock().await = fail;
	}

	/// Configures whether saves should fail.
	pub async fn set_fail_saves(&self, fail: bool) {
		*self.fail_saves.lock().await = fail;
	}

	/// All save requests accepted so far, in order.
	pub async fn saves(&self) -> Vec<SaveFixture> {
		self.saves.lock().await.clone()
	}

	/// All diagnostics logged so far, in order.
	pub async fn diagnostics(&self) -> Vec<String> {
		self.diagnostics.lock().await.clone()
	}

	/// Number of times the index has been listed.
	pub async fn list_calls(&self) -> usize {
		*self.list_calls.lock().await
	}

	/// Test history recorded for a fixture, if it exists.
	pub async fn tests_for(&self, name: &str) -> Option<Vec<String>> {
		self.fixtures
			.lock()
			.await
			.get(name)
			.map(|fixture| fixture.tests.clone())
	}
}

#[async_trait]
impl FixtureStore for MemoryFixtureStore {
	async fn list_fixtures(&self) -> Result<FixtureIndex, StoreError> {
		*self.list_calls.lock().await += 1;
		let fixtures = self.fixtures.lock().await;
		Ok(fixtures
			.iter()
			.map(|(name, fixture)| {
				(
					name.clone(),
					FixtureMeta {
						tests: fixture.tests.clone(),
					},
				)
			})
			.collect())
	}

	async fn fetch_fixture(
		&self,
		_request_id: &str,
		name: &str,
		test_name: &str,
		update_index: bool,
	) -> Result<Value, StoreError> {
		if *self.fail_fetches.lock().await {
			return Err(StoreError::NotFound(name.to_owned()));
		}
		let mut fixtures = self.fixtures.lock().await;
		let fixture = fixtures
			.get_mut(name)
			.ok_or_else(|| StoreError::NotFound(name.to_owned()))?;
		if update_index && !fixture.tests.iter().any(|test| test == test_name) {
			fixture.tests.push(test_name.to_owned());
		}
		Ok(fixture.payload.clone())
	}

	async fn save_fixture(&self, request: SaveFixture) -> Result<(), StoreError> {
		if *self.fail_saves.lock().await {
			return Err(StoreError::Backend("save rejected".to_string()));
		}
		{
			let mut fixtures = self.fixtures.lock().await;
			fixtures.insert(
				request.name.clone(),
				StoredFixture {
					payload: request.response.clone(),
					tests: vec![request.test_name.clone()],
				},
			);
		}
		self.saves.lock().await.push(request);
		Ok(())
	}

	async fn log_diagnostic(&self, message: &str) {
		self.diagnostics.lock().await.push(message.to_owned());
	}
}
