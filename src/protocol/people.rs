use log::{info, warn};

use super::client::{ApiRequest, ProtocolClient};
use super::error::{ProtocolError, Result};
use super::pagination::{Paginated, Pagination, QueryParams};
use super::types::{PersonCreate, PersonListResponse, PersonRead, PersonUpdate};

const PEOPLE: &str = "/v1/protocol/people";

/// Filters for [`PeopleClient::list_people`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeopleQuery {
	/// Graph owner; always sent.
	pub owner_id: String,
	/// Name substring.
	pub name: Option<String>,
	/// Exact email.
	pub email: Option<String>,
	/// Sent as repeated `tags` keys.
	pub tags: Vec<String>,
	/// Field to sort on.
	pub sort_by: Option<String>,
	/// `asc` or `desc`.
	pub sort_order: Option<String>,
	/// Defaults to the first page of 50.
	pub pagination: Option<Pagination>,
}

impl PeopleQuery {
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
			.push_opt("name", self.name.as_deref())
			.push_opt("email", self.email.as_deref())
			.push_all("tags", &self.tags)
			.push_opt("sort_by", self.sort_by.as_deref())
			.push_opt("sort_order", self.sort_order.as_deref())
			.paginate(self.pagination.as_ref());
		query
	}
}

/// Result of pushing an event attendee into the graph.
#[derive(Debug)]
pub enum SyncOutcome {
	/// A new person was filed.
	Created(PersonRead),
	/// The service reported a conflict: the person is already on file.
	AlreadyExists,
	/// Any other failure.
	Failed(ProtocolError),
}

/// Minimal attendee record the event side knows about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttendeeRecord {
	/// Becomes the person's only email.
	pub email: String,
	/// Legal and preferred name.
	pub name: String,
	/// Used for the headline.
	pub company: Option<String>,
	/// Primary role.
	pub role: Option<String>,
}

/// People endpoints.
#[derive(Clone)]
pub struct PeopleClient {
	client: ProtocolClient,
}

impl PeopleClient {
	/// Client sharing `client`'s contract.
	pub fn new(client: ProtocolClient) -> Self {
		Self { client }
	}

	/// `POST /v1/protocol/people`.
	pub async fn create_person(&self, person: &PersonCreate) -> Result<PersonRead> {
		self.client.send(ApiRequest::post(PEOPLE).json(person)?).await
	}

	/// One person, scoped to its owner.
	pub async fn get_person(&self, person_id: &str, owner_id: &str) -> Result<PersonRead> {
		let mut query = QueryParams::new();
		query.push("owner_id", owner_id);
		self.client
			.send(ApiRequest::get(PEOPLE).segment(person_id).query(query))
			.await
	}

	/// Partial update.
	pub async fn update_person(
		&self,
		person_id: &str,
		updates: &PersonUpdate,
		owner_id: &str,
	) -> Result<PersonRead> {
		let mut query = QueryParams::new();
		query.push("owner_id", owner_id);
		let request = ApiRequest::patch(PEOPLE)
			.segment(person_id)
			.query(query)
			.json(updates)?;
		self.client.send(request).await
	}

	/// Accepts `204`.
	pub async fn delete_person(&self, person_id: &str, owner_id: &str) -> Result<()> {
		let mut query = QueryParams::new();
		query.push("owner_id", owner_id);
		self.client
			.send_empty(ApiRequest::delete(PEOPLE).segment(person_id).query(query))
			.await
	}

	/// One page of people; the envelope is validated.
	pub async fn list_people(&self, params: &PeopleQuery) -> Result<PersonListResponse> {
		let page: PersonListResponse = self
			.client
			.send(ApiRequest::get(PEOPLE).query(params.to_query()))
			.await?;
		page.validate()?;
		Ok(page)
	}

	/// Creates a person for an event attendee. A conflict is reported as
	/// [`SyncOutcome::AlreadyExists`] rather than an error.
	pub async fn sync_attendee(&self, owner_id: &str, attendee: &AttendeeRecord) -> SyncOutcome {
		let person = PersonCreate {
			owner_id: owner_id.to_string(),
			preferred_name: Some(attendee.name.clone()),
			emails: vec![attendee.email.clone()],
			primary_role: attendee.role.clone(),
			tags: attendee.company.iter().cloned().collect(),
			..PersonCreate::default()
		};
		match self.create_person(&person).await {
			Ok(created) => {
				info!("synced attendee {}", created.person_id);
				SyncOutcome::Created(created)
			}
			Err(ProtocolError::Api(err)) if err.is_conflict() => SyncOutcome::AlreadyExists,
			Err(err) => {
				warn!("attendee sync failed: {err}");
				SyncOutcome::Failed(err)
			}
		}
	}
}
