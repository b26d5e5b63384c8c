use serde::Serialize;

use super::client::{ApiRequest, ProtocolClient};
use super::error::Result;
use super::types::{AgentChatRequest, AgentChatResponse, DidAgentProfile, GoalTaskResponse};

const AGENTS: &str = "/v1/agents";
const CAPABILITY: &str = "agents";

#[derive(Serialize)]
struct GoalTaskPreview<'a> {
	goal_id: &'a str,
}

/// Agents addressed by DID. Internal, like [`super::ProcessesClient`].
#[derive(Clone)]
pub struct AgentsClient {
	client: ProtocolClient,
}

impl AgentsClient {
	/// Client sharing `client`'s contract.
	pub fn new(client: ProtocolClient) -> Self {
		Self { client }
	}

	/// Profile of the agent behind a DID.
	pub async fn agent_profile(&self, did: &str) -> Result<DidAgentProfile> {
		self.client.require_internal(CAPABILITY)?;
		self.client
			.send(ApiRequest::get(AGENTS).segment(did).segment("profile"))
			.await
	}

	/// Sends one chat message to an agent.
	pub async fn chat_with_agent(
		&self,
		did: &str,
		request: &AgentChatRequest,
	) -> Result<AgentChatResponse> {
		self.client.require_internal(CAPABILITY)?;
		let call = ApiRequest::post(AGENTS).segment(did).segment("chat").json(request)?;
		self.client.send(call).await
	}

	/// Steps the agent would take toward a goal, without running them.
	pub async fn preview_goal_task(&self, did: &str, goal_id: &str) -> Result<GoalTaskResponse> {
		self.client.require_internal(CAPABILITY)?;
		let call = ApiRequest::post(AGENTS)
			.segment(did)
			.segment("goal-task-preview")
			.json(&GoalTaskPreview { goal_id })?;
		self.client.send(call).await
	}
}
