//! Session context.

/// Read-only, per-test-run context the fingerprint generator scopes by.
///
/// The login preset and public id identify the session the test runs under;
/// the test name scopes unique fixtures. All three are owned by the host test
/// harness and only read here.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
	pub login_preset: Option<String>,
	pub public_id: Option<String>,
	pub test_name: String,
}

impl SessionContext {
	pub fn new(test_name: impl Into<String>) -> Self {
		Self {
			login_preset: None,
			public_id: None,
			test_name: test_name.into(),
		}
	}

	pub fn with_login_preset(mut self, login_preset: impl Into<String>) -> Self {
		self.login_preset = Some(login_preset.into());
		self
	}

	pub fn with_public_id(mut self, public_id: impl Into<String>) -> Self {
		self.public_id = Some(public_id.into());
		self
	}
}
