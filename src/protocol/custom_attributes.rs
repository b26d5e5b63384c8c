use super::client::{ApiRequest, ProtocolClient};
use super::error::Result;
use super::pagination::{Paginated, Pagination, QueryParams};
use super::types::{
	CustomAttributeCreate, CustomAttributeListResponse, CustomAttributeRead,
	CustomAttributeUpdate,
};

// Creation uses the singular route; everything else the plural one.
const CUSTOM_ATTRIBUTE: &str = "/v1/protocol/custom-attribute";
const CUSTOM_ATTRIBUTES: &str = "/v1/protocol/custom-attributes";

/// Filters for [`CustomAttributesClient::list_custom_attributes`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomAttributesQuery {
	/// E.g. `person` or `organization`.
	pub entity_type: Option<String>,
	/// The entity the attribute hangs off.
	pub entity_id: Option<String>,
	/// Exact key.
	pub attribute_key: Option<String>,
	/// Free-text match.
	pub search: Option<String>,
	/// Defaults to the first page of 50.
	pub pagination: Option<Pagination>,
}

/// Filters for [`CustomAttributesClient::search_custom_attributes`]. Unpaged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomAttributeSearch {
	/// E.g. `person` or `organization`.
	pub entity_type: Option<String>,
	/// The entity the attribute hangs off.
	pub entity_id: Option<String>,
	/// Exact key.
	pub attribute_key: Option<String>,
	/// Match against the stored value.
	pub value_query: Option<String>,
}

/// Custom attribute endpoints.
#[derive(Clone)]
pub struct CustomAttributesClient {
	client: ProtocolClient,
}

impl CustomAttributesClient {
	/// Client sharing `client`'s contract.
	pub fn new(client: ProtocolClient) -> Self {
		Self { client }
	}

	/// Attaches a new attribute.
	pub async fn create_custom_attribute(
		&self,
		attribute: &CustomAttributeCreate,
	) -> Result<CustomAttributeRead> {
		self.client
			.send(ApiRequest::post(CUSTOM_ATTRIBUTE).json(attribute)?)
			.await
	}

	/// One attribute.
	pub async fn get_custom_attribute(&self, attribute_id: &str) -> Result<CustomAttributeRead> {
		self.client
			.send(ApiRequest::get(CUSTOM_ATTRIBUTES).segment(attribute_id))
			.await
	}

	/// Replaces the value or its type.
	pub async fn update_custom_attribute(
		&self,
		attribute_id: &str,
		updates: &CustomAttributeUpdate,
	) -> Result<CustomAttributeRead> {
		let request = ApiRequest::patch(CUSTOM_ATTRIBUTES)
			.segment(attribute_id)
			.json(updates)?;
		self.client.send(request).await
	}

	/// Accepts `204`.
	pub async fn delete_custom_attribute(&self, attribute_id: &str) -> Result<()> {
		self.client
			.send_empty(ApiRequest::delete(CUSTOM_ATTRIBUTES).segment(attribute_id))
			.await
	}

	/// One page of attributes.
	pub async fn list_custom_attributes(
		&self,
		params: &CustomAttributesQuery,
	) -> Result<CustomAttributeListResponse> {
		let mut query = QueryParams::with_pagination(params.pagination.as_ref());
		query
			.push_opt("entity_type", params.entity_type.as_deref())
			.push_opt("entity_id", params.entity_id.as_deref())
			.push_opt("attribute_key", params.attribute_key.as_deref())
			.push_opt("search", params.search.as_deref());
		let page: CustomAttributeListResponse = self
			.client
			.send(ApiRequest::get(CUSTOM_ATTRIBUTES).query(query))
			.await?;
		page.validate()?;
		Ok(page)
	}

	/// Unpaged search across attributes.
	pub async fn search_custom_attributes(
		&self,
		params: &CustomAttributeSearch,
	) -> Result<CustomAttributeListResponse> {
		let mut query = QueryParams::new();
		query
			.push_opt("entity_type", params.entity_type.as_deref())
			.push_opt("entity_id", params.entity_id.as_deref())
			.push_opt("attribute_key", params.attribute_key.as_deref())
			.push_opt("value_query", params.value_query.as_deref());
		self.client
			.send(ApiRequest::get(CUSTOM_ATTRIBUTES).segment("search").query(query))
			.await
	}
}
