use super::client::{ApiRequest, ProtocolClient};
use super::error::Result;
use super::pagination::{Paginated, Pagination, QueryParams};
use super::types::{
	InteractionCreate, InteractionListResponse, InteractionResponse, RelationshipDetail,
	RelationshipListResponse, RelationshipSummary, TrustEventListResponse,
};

const INGEST: &str = "/v1/protocol/events/ingest";
const LEGACY_INTERACTION: &str = "/v1/protocol/interaction";
const RELATIONSHIP: &str = "/v1/protocol/relationship";
const RELATIONSHIPS: &str = "/v1/protocol/relationships";
const RELATIONSHIP_SUMMARY: &str = "/v1/protocol/relationship-summary";

/// Filters for [`RelationshipsClient::list_relationships`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationshipsQuery {
	/// Graph owner; always sent.
	pub owner_id: String,
	/// Either end of the relationship.
	pub person_id: Option<String>,
	/// Source end only.
	pub source_person_id: Option<String>,
	/// Target end only.
	pub target_person_id: Option<String>,
	/// Lower bound on `strength_score`.
	pub min_strength: Option<f64>,
	/// E.g. `active`.
	pub relationship_state: Option<String>,
	/// Field to sort on.
	pub sort_by: Option<String>,
	/// `asc` or `desc`.
	pub sort_order: Option<String>,
	/// Defaults to the first page of 50.
	pub pagination: Option<Pagination>,
}

impl RelationshipsQuery {
	/// Unfiltered query for one owner.
	pub fn owner(owner_id: impl Into<String>) -> Self {
		Self {
			owner_id: owner_id.into(),
			..Self::default()
		}
	}

	fn to_query(&self) -> QueryParams {
		let mut query = QueryParams::new();
		query
			.push("owner_id", &self.owner_id)
			.push_opt("person_id", self.person_id.as_deref())
			.push_opt("source_person_id", self.source_person_id.as_deref())
			.push_opt("target_person_id", self.target_person_id.as_deref())
			.push_num("min_strength", self.min_strength)
			.push_opt("relationship_state", self.relationship_state.as_deref())
			.push_opt("sort_by", self.sort_by.as_deref())
			.push_opt("sort_order", self.sort_order.as_deref())
			.paginate(self.pagination.as_ref());
		query
	}
}

/// Relationship, interaction and trust endpoints.
#[derive(Clone)]
pub struct RelationshipsClient {
	client: ProtocolClient,
}

impl RelationshipsClient {
	/// Client sharing `client`'s contract.
	pub fn new(client: ProtocolClient) -> Self {
		Self { client }
	}

	/// Records an interaction through the contract ingest endpoint.
	///
	/// Not idempotent: callers must not blindly retry.
	pub async fn ingest_event(&self, interaction: &InteractionCreate) -> Result<InteractionResponse> {
		self.client.send(ApiRequest::post(INGEST).json(interaction)?).await
	}

	/// Pre-contract interaction route; requires the internal capability.
	pub async fn log_interaction(
		&self,
		interaction: &InteractionCreate,
	) -> Result<InteractionResponse> {
		self.client.require_internal("interaction")?;
		self.client
			.send(ApiRequest::post(LEGACY_INTERACTION).json(interaction)?)
			.await
	}

	/// Aggregate strength figures for a person.
	pub async fn relationship_summary(
		&self,
		owner_id: &str,
		source_person_id: &str,
		target_person_id: &str,
	) -> Result<RelationshipSummary> {
		let mut query = QueryParams::new();
		query
			.push("owner_id", owner_id)
			.push("source_person_id", source_person_id)
			.push("target_person_id", target_person_id);
		self.client
			.send(ApiRequest::get(RELATIONSHIP_SUMMARY).query(query))
			.await
	}

	/// One relationship with its detail.
	pub async fn get_relationship(
		&self,
		relationship_id: &str,
		owner_id: &str,
	) -> Result<RelationshipDetail> {
		let mut query = QueryParams::new();
		query.push("owner_id", owner_id);
		self.client
			.send(ApiRequest::get(RELATIONSHIP).segment(relationship_id).query(query))
			.await
	}

	/// One page of relationships; the envelope is validated.
	pub async fn list_relationships(
		&self,
		params: &RelationshipsQuery,
	) -> Result<RelationshipListResponse> {
		let page: RelationshipListResponse = self
			.client
			.send(ApiRequest::get(RELATIONSHIPS).query(params.to_query()))
			.await?;
		page.validate()?;
		Ok(page)
	}

	/// Interactions recorded on a relationship.
	pub async fn relationship_interactions(
		&self,
		relationship_id: &str,
		owner_id: &str,
		pagination: Option<&Pagination>,
	) -> Result<InteractionListResponse> {
		let mut query = QueryParams::new();
		query.push("owner_id", owner_id).paginate(pagination);
		let page: InteractionListResponse = self
			.client
			.send(
				ApiRequest::get(RELATIONSHIP)
					.segment(relationship_id)
					.segment("interactions")
					.query(query),
			)
			.await?;
		page.validate()?;
		Ok(page)
	}

	/// Trust events recorded on a relationship.
	pub async fn relationship_trust_events(
		&self,
		relationship_id: &str,
		owner_id: &str,
		pagination: Option<&Pagination>,
	) -> Result<TrustEventListResponse> {
		let mut query = QueryParams::new();
		query.push("owner_id", owner_id).paginate(pagination);
		let page: TrustEventListResponse = self
			.client
			.send(
				ApiRequest::get(RELATIONSHIP)
					.segment(relationship_id)
					.segment("trust-events")
					.query(query),
			)
			.await?;
		page.validate()?;
		Ok(page)
	}
}
