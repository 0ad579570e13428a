//! # Replaykit
//!
//! HTTP record-and-replay fixture cache for automated tests.
//!
//! Replaykit intercepts outbound API calls made during a test run and
//! resolves them to deterministic fixtures keyed by a canonical fingerprint
//! of the request. A previously recorded response is replayed when one
//! matches; otherwise, in recording mode, the live backend is called, the
//! result is compared against history, and a new fixture is persisted. In
//! playback mode a call with no matching fixture is canceled instead of
//! silently hitting the network.
//!
//! # Architecture
//!
//! - [`fingerprint`] — deterministic cache ids from canonicalized requests
//! - [`sanitize`] — bounded, path-safe fixture names
//! - [`ledger`] — per-run uniqueness suffixing of repeated fingerprints
//! - [`compare`] — structural drift detection between fixture and live data
//! - [`store`] — the external fixture store boundary
//! - [`orchestrator`] — the record/replay control flow tying it together
//!
//! # Quick Start
//!
//! ```
//! use replaykit::{
//!     CallOutcome, LiveClient, MemoryFixtureStore, ReplayCache, ReplayConfig,
//!     RequestDescriptor, SessionContext,
//! };
//! use async_trait::async_trait;
//! use serde_json::json;
//!
//! struct Backend;
//!
//! #[async_trait]
//! impl LiveClient for Backend {
//!     async fn call(&self) -> CallOutcome {
//!         CallOutcome::success(json!({ "resultCode": "Authorised" }))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let cache = ReplayCache::new(
//!     MemoryFixtureStore::new(),
//!     SessionContext::new("suites/checkout"),
//! );
//! let request = RequestDescriptor::new("v1/payments", "POST")
//!     .with_body(json!({ "amount": 1000 }));
//!
//! // First call records, second call replays.
//! let recorded = cache.resolve(&request, &Backend, &ReplayConfig::recording()).await;
//! assert_eq!(recorded.response, Some(json!({ "resultCode": "Authorised" })));
//!
//! let replayed = cache.resolve(&request, &Backend, &ReplayConfig::playback()).await;
//! assert_eq!(
//!     replayed.response,
//!     Some(json!({ "isError": false, "resultCode": "Authorised" })),
//! );
//! # });
//! ```

pub mod canonical;
pub mod client;
pub mod compare;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod ledger;
pub mod orchestrator;
pub mod request;
pub mod sanitize;
pub mod session;
pub mod store;

pub use client::{CallOutcome, LiveClient};
pub use config::ReplayConfig;
pub use error::StoreError;
pub use ledger::UsedIdLedger;
pub use orchestrator::ReplayCache;
pub use request::RequestDescriptor;
pub use session::SessionContext;
pub use store::{
	FixtureIndex, FixtureMeta, FixtureMetadata, FixtureStore, MemoryFixtureStore, SaveFixture,
};
