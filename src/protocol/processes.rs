use super::client::{ApiRequest, ProtocolClient};
use super::error::Result;
use super::pagination::{Paginated, Pagination, QueryParams};
use super::types::{
	ProcessCreate, ProcessDetailResponse, ProcessExecutionRequest, ProcessExecutionResponse,
	ProcessListResponse, ProcessStepCreate, ProcessStepView, ProcessUpdate, ProcessView,
};

const PROCESSES: &str = "/v1/agentic/processes";
const CAPABILITY: &str = "processes";

/// Filters for [`ProcessesClient::list_processes`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessesQuery {
	/// Process owner.
	pub owner_person_id: Option<String>,
	/// Goal the process serves.
	pub goal_id: Option<String>,
	/// Process kind.
	pub process_type: Option<String>,
	/// E.g. `active`.
	pub status: Option<String>,
	/// Field to sort on.
	pub sort_by: Option<String>,
	/// `asc` or `desc`.
	pub sort_order: Option<String>,
	/// Sent as `limit`/`offset` on this route.
	pub pagination: Option<Pagination>,
}

impl ProcessesQuery {
	fn to_query(&self) -> QueryParams {
		let mut query = QueryParams::new();
		query
			.push_opt("owner_person_id", self.owner_person_id.as_deref())
			.push_opt("goal_id", self.goal_id.as_deref())
			.push_opt("process_type", self.process_type.as_deref())
			.push_opt("status", self.status.as_deref());
		// This route predates page numbers and still pages by limit/offset.
		if let Some(pagination) = &self.pagination {
			let (page, page_size) = pagination.normalize();
			let offset = pagination.offset.unwrap_or((page - 1) * page_size);
			query.push("limit", page_size).push("offset", offset);
		}
		query
			.push_opt("sort_by", self.sort_by.as_deref())
			.push_opt("sort_order", self.sort_order.as_deref());
		query
	}
}

/// Multi-step agentic processes. Internal: every call requires the
/// internal capability and fails before touching the network without it.
#[derive(Clone)]
pub struct ProcessesClient {
	client: ProtocolClient,
}

impl ProcessesClient {
	/// Client sharing `client`'s contract.
	pub fn new(client: ProtocolClient) -> Self {
		Self { client }
	}

	/// Files a new process.
	pub async fn create_process(&self, process: &ProcessCreate) -> Result<ProcessView> {
		self.client.require_internal(CAPABILITY)?;
		self.client.send(ApiRequest::post(PROCESSES).json(process)?).await
	}

	/// A process with its steps.
	pub async fn get_process(&self, process_id: &str) -> Result<ProcessDetailResponse> {
		self.client.require_internal(CAPABILITY)?;
		self.client
			.send(ApiRequest::get(PROCESSES).segment(process_id))
			.await
	}

	/// Partial update.
	pub async fn update_process(
		&self,
		process_id: &str,
		updates: &ProcessUpdate,
	) -> Result<ProcessView> {
		self.client.require_internal(CAPABILITY)?;
		let request = ApiRequest::patch(PROCESSES).segment(process_id).json(updates)?;
		self.client.send(request).await
	}

	/// One page of processes; the envelope is validated.
	pub async fn list_processes(&self, params: &ProcessesQuery) -> Result<ProcessListResponse> {
		self.client.require_internal(CAPABILITY)?;
		let page: ProcessListResponse = self
			.client
			.send(ApiRequest::get(PROCESSES).query(params.to_query()))
			.await?;
		page.validate()?;
		Ok(page)
	}

	/// Appends a step to a process.
	pub async fn add_process_step(
		&self,
		process_id: &str,
		step: &ProcessStepCreate,
	) -> Result<ProcessStepView> {
		self.client.require_internal(CAPABILITY)?;
		let request = ApiRequest::post(PROCESSES)
			.segment(process_id)
			.segment("steps")
			.json(step)?;
		self.client.send(request).await
	}

	/// Runs one step. Without a request the call goes out with no body.
	pub async fn execute_step(
		&self,
		step_id: &str,
		request: Option<&ProcessExecutionRequest>,
	) -> Result<ProcessExecutionResponse> {
		self.client.require_internal(CAPABILITY)?;
		let mut call = ApiRequest::post(PROCESSES)
			.segment("steps")
			.segment(step_id)
			.segment("execute");
		if let Some(body) = request {
			call = call.json(body)?;
		}
		self.client.send(call).await
	}

	/// One step.
	pub async fn get_step(&self, step_id: &str) -> Result<ProcessStepView> {
		self.client.require_internal(CAPABILITY)?;
		self.client
			.send(ApiRequest::get(PROCESSES).segment("steps").segment(step_id))
			.await
	}
}
