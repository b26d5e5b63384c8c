use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_APP_ID: &str = "eventmanage";
pub const DEFAULT_CONTRACT_VERSION: &str = "1.0";

/// Everything a [`super::ProtocolClient`] needs besides its transport and token supplier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
	/// Service root, e.g. `https://api.example.com`. A trailing slash is ignored.
	pub base_url: String,
	/// Sent as `x-app-id`.
	pub app_id: String,
	/// Sent as `x-contract-version`.
	pub contract_version: String,
	/// Graph owner the event's people and relationships are filed under.
	pub owner_id: String,
	/// Enables endpoints outside the published contract.
	pub internal_endpoints: bool,
}

impl Default for ProtocolConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			app_id: DEFAULT_APP_ID.to_string(),
			contract_version: DEFAULT_CONTRACT_VERSION.to_string(),
			owner_id: String::new(),
			internal_endpoints: false,
		}
	}
}

impl ProtocolConfig {
	/// Defaults pointed at `base_url`.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			..Self::default()
		}
	}

	/// Sets the graph owner.
	pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
		self.owner_id = owner_id.into();
		self
	}

	/// Opts into the internal endpoints.
	pub fn with_internal_endpoints(mut self, enabled: bool) -> Self {
		self.internal_endpoints = enabled;
		self
	}

	/// Base address without its trailing slash.
	pub fn normalized_base_url(&self) -> &str {
		self.base_url.trim_end_matches('/')
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn trailing_slashes_are_stripped() {
		assert_eq!(
			ProtocolConfig::new("https://api.example.com/").normalized_base_url(),
			"https://api.example.com"
		);
		assert_eq!(ProtocolConfig::new("http://h:1").normalized_base_url(), "http://h:1");
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let config: ProtocolConfig =
			serde_json::from_str(r#"{"owner_id":"org-1","internal_endpoints":true}"#).unwrap();
		assert_eq!(config.base_url, DEFAULT_BASE_URL);
		assert_eq!(config.app_id, DEFAULT_APP_ID);
		assert_eq!(config.owner_id, "org-1");
		assert!(config.internal_endpoints);
	}
}
