use super::client::{ApiRequest, ProtocolClient};
use super::error::Result;
use super::types::{
	Capabilities, GraphSummary, ProtocolIdentity, RegistryModuleList, SubscriptionPlan,
};

const ME: &str = "/v1/protocol/me";
const GRAPH_SUMMARY: &str = "/v1/protocol/graph/summary";
const SUBSCRIPTION_PLAN: &str = "/v1/subscriptions/plan";
const CAPABILITIES: &str = "/v1/subscriptions/capabilities";
const REGISTRY_MODULES: &str = "/v1/registry/modules";

/// Account level calls of the launch contract: who am I, what may I use.
#[derive(Clone)]
pub struct ContractClient {
	client: ProtocolClient,
}

impl ContractClient {
	/// Client sharing `client`'s contract.
	pub fn new(client: ProtocolClient) -> Self {
		Self { client }
	}

	/// Who the token belongs to.
	pub async fn get_protocol_me(&self) -> Result<ProtocolIdentity> {
		self.client.send(ApiRequest::get(ME)).await
	}

	/// Counts across the caller's graph.
	pub async fn graph_summary(&self) -> Result<GraphSummary> {
		self.client.send(ApiRequest::get(GRAPH_SUMMARY)).await
	}

	/// The caller's current plan.
	pub async fn subscription_plan(&self) -> Result<SubscriptionPlan> {
		self.client.send(ApiRequest::get(SUBSCRIPTION_PLAN)).await
	}

	/// Capabilities the plan grants.
	pub async fn capabilities(&self) -> Result<Capabilities> {
		self.client.send(ApiRequest::get(CAPABILITIES)).await
	}

	/// Modules installed for the caller.
	pub async fn registry_modules(&self) -> Result<RegistryModuleList> {
		self.client.send(ApiRequest::get(REGISTRY_MODULES)).await
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::protocol::client::{APP_ID_HEADER, CONTRACT_VERSION_HEADER};
	use crate::protocol::client::testing::{FakeTransport, client};

	#[test]
	fn me_carries_contract_headers() {
		let transport = FakeTransport::new();
		transport.reply(200, r#"{"owner_id":"owner-1","person_id":"p-self"}"#);
		let contract = ContractClient::new(client(&transport));
		let me = block_on(contract.get_protocol_me()).unwrap();
		assert_eq!(me.person_id.as_deref(), Some("p-self"));
		let request = transport.last_request();
		assert_eq!(request.url.path(), "/v1/protocol/me");
		assert_eq!(request.headers[APP_ID_HEADER], "eventmanage");
		assert_eq!(request.headers[CONTRACT_VERSION_HEADER], "1.0");
	}

	#[test]
	fn account_paths() {
		let transport = FakeTransport::new();
		transport
			.reply(200, r#"{"people_count":12,"relationship_count":30}"#)
			.reply(200, r#"{"plan_id":"pro","tier":"paid"}"#)
			.reply(200, r#"{"capabilities":["matchmaking","export"]}"#)
			.reply(200, r#"{"modules":[{"module_id":"events","enabled":true}]}"#);
		let contract = ContractClient::new(client(&transport));

		let summary = block_on(contract.graph_summary()).unwrap();
		assert_eq!(summary.people_count, 12);
		let plan = block_on(contract.subscription_plan()).unwrap();
		assert_eq!(plan.plan_id.as_deref(), Some("pro"));
		let capabilities = block_on(contract.capabilities()).unwrap();
		assert!(capabilities.has("matchmaking"));
		assert!(!capabilities.has("zk"));
		let modules = block_on(contract.registry_modules()).unwrap();
		assert!(modules.modules[0].enabled);

		let paths: Vec<String> = transport
			.requests
			.borrow()
			.iter()
			.map(|r| r.url.path().to_string())
			.collect();
		assert_eq!(paths, vec![
			"/v1/protocol/graph/summary",
			"/v1/subscriptions/plan",
			"/v1/subscriptions/capabilities",
			"/v1/registry/modules",
		]);
	}
}
