use super::client::{ApiRequest, ProtocolClient};
use super::error::Result;
use super::pagination::{Paginated, Pagination, QueryParams};
use super::types::{
	OrganizationCreate, OrganizationListResponse, OrganizationRead, OrganizationUpdate,
};

const ORGANIZATIONS: &str = "/v1/protocol/organizations";

/// Filters for [`OrganizationsClient::list_organizations`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrganizationsQuery {
	/// Graph owner; always sent.
	pub owner_id: String,
	/// Name substring.
	pub name: Option<String>,
	/// Sent as repeated `sector_tags` keys.
	pub sector_tags: Vec<String>,
	/// Field to sort on.
	pub sort_by: Option<String>,
	/// `asc` or `desc`.
	pub sort_order: Option<String>,
	/// Defaults to the first page of 50.
	pub pagination: Option<Pagination>,
}

/// Organization endpoints.
#[derive(Clone)]
pub struct OrganizationsClient {
	client: ProtocolClient,
}

impl OrganizationsClient {
	/// Client sharing `client`'s contract.
	pub fn new(client: ProtocolClient) -> Self {
		Self { client }
	}

	/// Files a new organization.
	pub async fn create_organization(
		&self,
		organization: &OrganizationCreate,
	) -> Result<OrganizationRead> {
		self.client
			.send(ApiRequest::post(ORGANIZATIONS).json(organization)?)
			.await
	}

	/// One organization, scoped to its owner.
	pub async fn get_organization(
		&self,
		organization_id: &str,
		owner_id: &str,
	) -> Result<OrganizationRead> {
		self.client
			.send(
				ApiRequest::get(ORGANIZATIONS)
					.segment(organization_id)
					.query(owner_query(owner_id)),
			)
			.await
	}

	/// Partial update.
	pub async fn update_organization(
		&self,
		organization_id: &str,
		updates: &OrganizationUpdate,
		owner_id: &str,
	) -> Result<OrganizationRead> {
		let request = ApiRequest::patch(ORGANIZATIONS)
			.segment(organization_id)
			.query(owner_query(owner_id))
			.json(updates)?;
		self.client.send(request).await
	}

	/// Soft delete on the service side.
	pub async fn delete_organization(&self, organization_id: &str, owner_id: &str) -> Result<()> {
		self.client
			.send_empty(
				ApiRequest::delete(ORGANIZATIONS)
					.segment(organization_id)
					.query(owner_query(owner_id)),
			)
			.await
	}

	/// One page of organizations.
	pub async fn list_organizations(
		&self,
		params: &OrganizationsQuery,
	) -> Result<OrganizationListResponse> {
		let mut query = QueryParams::new();
		query
			.push("owner_id", &params.owner_id)
			.push_opt("name", params.name.as_deref())
			.push_all("sector_tags", &params.sector_tags)
			.push_opt("sort_by", params.sort_by.as_deref())
			.push_opt("sort_order", params.sort_order.as_deref())
			.paginate(params.pagination.as_ref());
		let page: OrganizationListResponse = self
			.client
			.send(ApiRequest::get(ORGANIZATIONS).query(query))
			.await?;
		page.validate()?;
		Ok(page)
	}
}

fn owner_query(owner_id: &str) -> QueryParams {
	let mut query = QueryParams::new();
	query.push("owner_id", owner_id);
	query
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::protocol::client::testing::{FakeTransport, client};

	#[test]
	fn sector_tags_repeat() {
		let transport = FakeTransport::new();
		transport.reply(200, r#"{"organizations":[],"total":0,"limit":50,"offset":0}"#);
		let organizations = OrganizationsClient::new(client(&transport));
		let params = OrganizationsQuery {
			owner_id: "owner-1".into(),
			sector_tags: vec!["fintech".into(), "ai".into()],
			..OrganizationsQuery::default()
		};
		block_on(organizations.list_organizations(&params)).unwrap();
		assert_eq!(
			transport.last_request().url.query(),
			Some("owner_id=owner-1&sector_tags=fintech&sector_tags=ai&page=1&page_size=50")
		);
	}

	#[test]
	fn organization_type_field_is_renamed() {
		let transport = FakeTransport::new();
		transport.reply(
			200,
			r#"{"organization_id":"org","owner_id":"owner-1","name":"Acme","type":"startup"}"#,
		);
		let organizations = OrganizationsClient::new(client(&transport));
		let org = block_on(organizations.get_organization("org", "owner-1")).unwrap();
		assert_eq!(org.kind.as_deref(), Some("startup"));
		assert_eq!(
			transport.last_request().url.as_str(),
			"http://api.test/v1/protocol/organizations/org?owner_id=owner-1"
		);
	}
}
