//! Per-run cache-id uniqueness.

use tokio::sync::Mutex;

/// Append-only log of cache ids allocated during the current test run.
///
/// When indexing mode is enabled, every call must receive a fresh,
/// collision-free id even when it repeats an earlier fingerprint. The ledger
/// suffixes repeated bases with `~N` and records every returned id. The
/// read-modify-append sequence holds one lock for its whole duration, so
/// concurrent allocations of the same base still produce distinct suffixes.
///
/// The log grows monotonically within a run and is never pruned here.
#[derive(Debug, Default)]
pub struct UsedIdLedger {
	entries: Mutex<Vec<String>>,
}

impl UsedIdLedger {
	pub fn new() -> Self {
		Self {
			entries: Mutex::new(Vec::new()),
		}
	}

	/// Returns an id distinct from every previously allocated one.
	///
	/// An unused base is returned unchanged. A repeated base gets the suffix
	/// `~(max(N) + 1)` over all recorded `base~N` entries, starting at `~1`.
	/// The returned id is appended to the log exactly once per call, never
	/// deduplicated, so repeat calls with the same base always advance the
	/// counter.
	pub async fn allocate(&self, base: &str) -> String {
		let mut entries = self.entries.lock().await;

		let id = if entries.iter().any(|entry| entry == base) {
			let prefix = format!("{base}~");
			let mut suffix: u64 = 1;
			for entry in entries.iter() {
				if let Some(tail) = entry.strip_prefix(&prefix) {
					if let Ok(used) = tail.parse::<u64>() {
						if used >= suffix {
							suffix = used + 1;
						}
					}
				}
			}
			format!("{base}~{suffix}")
		} else {
			base.to_owned()
		};

		entries.push(id.clone());
		id
	}

	/// Snapshot of all allocated ids, in allocation order.
	pub async fn entries(&self) -> Vec<String> {
		self.entries.lock().await.clone()
	}
}
